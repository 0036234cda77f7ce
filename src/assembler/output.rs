// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Object and listing files for a finished [`Assembly`].

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::core::assembler::error::FatalError;
use crate::core::assembler::listing::ListingWriter;

use super::cli::OutputFormat;
use super::Assembly;

fn output_error(path: &Path, source: io::Error) -> FatalError {
    FatalError::Output {
        path: path.display().to_string(),
        source,
    }
}

/// Create `path`, run `write` into it and flush. A failed write leaves no
/// partial file behind.
fn write_to(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), FatalError> {
    let file = File::create(path).map_err(|err| output_error(path, err))?;
    let mut out = BufWriter::new(file);
    let result = write(&mut out).and_then(|()| out.flush());
    if let Err(err) = result {
        remove_partial(path);
        return Err(output_error(path, err));
    }
    Ok(())
}

/// Delete an output file that may be incomplete.
pub fn remove_partial(path: &Path) {
    if path.exists() {
        let _ = fs::remove_file(path);
    }
}

pub fn write_image(path: &Path, assembly: &Assembly, format: OutputFormat) -> Result<(), FatalError> {
    info!("writing {} ({:?})", path.display(), format);
    write_to(path, |out| match format {
        OutputFormat::Bin => assembly.image.write_bin_file(out, assembly.fill),
        OutputFormat::Srec => assembly.image.write_s19_file(out, assembly.transfer),
        OutputFormat::Ihex => assembly.image.write_hex_file(out, assembly.transfer),
    })
}

pub fn write_listing(path: &Path, assembly: &Assembly, with_symbols: bool) -> Result<(), FatalError> {
    info!("writing listing {}", path.display());
    write_to(path, |out| render_listing(out, assembly, with_symbols))
}

/// Listing lines, totals and optionally the symbol table.
pub fn render_listing<W: Write>(out: W, assembly: &Assembly, with_symbols: bool) -> io::Result<()> {
    let mut writer = ListingWriter::new(out);
    writer.header(&assembly.title)?;
    for line in &assembly.listing {
        writer.write_line(line)?;
    }
    writer.footer(&assembly.counts)?;
    if let Some(address) = assembly.transfer {
        writer.transfer(address, assembly.symbols.find_symbol_at(address))?;
    }
    if with_symbols {
        writer.write_symbols(&assembly.symbols.sorted())?;
    }
    Ok(())
}
