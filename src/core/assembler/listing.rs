// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Listing file generation.

use std::io::Write;

use crate::core::symbol_table::{Symbol, SymbolCategory};

use super::error::PassCounts;

/// Bytes shown on one listing row; longer output continues on extra rows.
const BYTES_PER_ROW: usize = 8;

/// Data for a single listing line, collected during the final pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingLine {
    pub address: Option<u16>,
    pub bytes: Vec<u8>,
    /// Value shown in place of bytes, for EQU/SET and reservations.
    pub value: Option<u16>,
    pub line_num: u32,
    /// Include/macro nesting level.
    pub level: u8,
    pub source: String,
    /// Formatted diagnostics raised by the line.
    pub diagnostics: Vec<String>,
}

/// Writer for listing file output.
pub struct ListingWriter<W: Write> {
    out: W,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "ADDR  BYTES                    LINE  SOURCE")?;
        writeln!(self.out, "----  -----------------------  ----  ------")?;
        Ok(())
    }

    pub fn write_line(&mut self, line: &ListingLine) -> std::io::Result<()> {
        let loc = line
            .address
            .map(|addr| format!("{addr:04X}"))
            .unwrap_or_default();
        let mut rows = line.bytes.chunks(BYTES_PER_ROW);
        let bytes_col = match line.value {
            Some(value) if line.bytes.is_empty() => format!("= {value:04X}"),
            _ => rows.next().map(format_bytes).unwrap_or_default(),
        };
        let marker = if line.level > 0 { '+' } else { ' ' };
        writeln!(
            self.out,
            "{:<4}  {:<23} {}{:>4}  {}",
            loc, bytes_col, marker, line.line_num, line.source
        )?;
        let mut addr = line.address.unwrap_or(0);
        for row in rows {
            addr = addr.wrapping_add(BYTES_PER_ROW as u16);
            writeln!(self.out, "{addr:04X}  {}", format_bytes(row))?;
        }
        for diagnostic in &line.diagnostics {
            writeln!(self.out, "***** {diagnostic}")?;
        }
        Ok(())
    }

    pub fn footer(&mut self, counts: &PassCounts) -> std::io::Result<()> {
        writeln!(
            self.out,
            "\nLines: {}  Errors: {}  Warnings: {}",
            counts.lines, counts.errors, counts.warnings
        )
    }

    /// END operand, with the label found at that address.
    pub fn transfer(&mut self, address: u16, name: Option<&str>) -> std::io::Result<()> {
        match name {
            Some(name) => writeln!(self.out, "Transfer address: {address:04X} ({name})"),
            None => writeln!(self.out, "Transfer address: {address:04X}"),
        }
    }

    /// Sorted symbol table, leaving out macros and local labels.
    pub fn write_symbols(&mut self, symbols: &[&Symbol]) -> std::io::Result<()> {
        writeln!(self.out, "\nSYMBOL TABLE\n")?;
        for symbol in symbols {
            let Some(kind) = category_tag(symbol.category) else {
                continue;
            };
            writeln!(self.out, "{:<24} {kind:<3} {:04X}", symbol.name, symbol.value)?;
        }
        Ok(())
    }
}

fn category_tag(category: SymbolCategory) -> Option<&'static str> {
    let tag = match category {
        SymbolCategory::Constant => "EQU",
        SymbolCategory::Variable | SymbolCategory::VarAddress => "SET",
        SymbolCategory::Label => "",
        SymbolCategory::External | SymbolCategory::VarExternal => "EXT",
        SymbolCategory::Public => "PUB",
        SymbolCategory::PublicUndefined | SymbolCategory::Unresolved => "UND",
        SymbolCategory::Common => "COM",
        SymbolCategory::CommonMember => "CMB",
        SymbolCategory::RegisterAlias => "REG",
        SymbolCategory::Text => "TXT",
        SymbolCategory::Empty
        | SymbolCategory::Macro
        | SymbolCategory::LocalLabel
        | SymbolCategory::EmptyLocal => return None,
    };
    Some(tag)
}

/// Format bytes as hex string for listing.
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(line: &ListingLine) -> String {
        let mut out = Vec::new();
        ListingWriter::new(&mut out)
            .write_line(line)
            .expect("write listing line");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn equ_lines_show_the_value() {
        let text = render(&ListingLine {
            value: Some(0x1234),
            line_num: 1,
            source: "VALUE EQU $1234".to_string(),
            ..ListingLine::default()
        });
        assert!(text.contains("= 1234"));
        assert!(text.ends_with("VALUE EQU $1234\n"));
    }

    #[test]
    fn long_byte_runs_wrap_with_addresses() {
        let text = render(&ListingLine {
            address: Some(0x1000),
            bytes: (0u8..10).collect(),
            line_num: 7,
            level: 1,
            source: " FCB 0,1,2,3,4,5,6,7,8,9".to_string(),
            diagnostics: vec!["7: WARNING [W105] - Forced truncation".to_string()],
            ..ListingLine::default()
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1000  00 01 02 03 04 05 06 07 +   7"));
        assert_eq!(lines[1], "1008  08 09");
        assert!(lines[2].starts_with("***** "));
    }

    #[test]
    fn transfer_line_names_the_label() {
        let mut out = Vec::new();
        let mut writer = ListingWriter::new(&mut out);
        writer.transfer(0x1000, Some("START")).expect("named");
        writer.transfer(0x2000, None).expect("bare");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "Transfer address: 1000 (START)\nTransfer address: 2000\n");
    }
}
