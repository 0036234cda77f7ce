// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Image store with binary, S-record and Intel HEX output.

use std::io::{self, Write};

use crate::core::expr::ExprCategory;

/// Relocation information attached to one emitted byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRecord {
    /// Address of the first byte of the relocated field.
    pub address: u16,
    pub category: ExprCategory,
    /// Symbol the field is relative to; `None` for module-internal addresses.
    pub symbol: Option<String>,
}

/// Consumer of the pass-2 byte stream.
pub trait ByteSink {
    fn emit_byte(&mut self, address: u16, value: u8, relocation: Option<&RelocationRecord>);
}

/// Collects assembled bytes in emission order.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    entries: Vec<(u16, u8)>,
    relocations: Vec<RelocationRecord>,
}

const S19_LINE_BYTES: usize = 32;
const HEX_LINE_BYTES: usize = 32;

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of stored address/byte entries.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a single byte at the given address.
    pub fn store(&mut self, addr: u16, val: u8) {
        self.entries.push((addr, val));
    }

    /// Store a contiguous slice of bytes starting at `addr`.
    pub fn store_slice(&mut self, addr: u16, values: &[u8]) {
        for (ix, val) in values.iter().enumerate() {
            self.store(addr.wrapping_add(ix as u16), *val);
        }
    }

    /// All stored `(address, byte)` pairs in emission order.
    pub fn entries(&self) -> &[(u16, u8)] {
        &self.entries
    }

    pub fn relocations(&self) -> &[RelocationRecord] {
        &self.relocations
    }

    /// Return the (min, max) address range of emitted bytes, or `None` if empty.
    pub fn output_range(&self) -> Option<(u16, u16)> {
        let min = self.entries.iter().map(|(addr, _)| *addr).min()?;
        let max = self.entries.iter().map(|(addr, _)| *addr).max()?;
        Some((min, max))
    }

    /// Bytes sorted by address, last write wins.
    fn memory(&self) -> Vec<(u16, u8)> {
        let mut mem: Vec<Option<u8>> = vec![None; 0x10000];
        for (addr, value) in &self.entries {
            mem[*addr as usize] = Some(*value);
        }
        mem.into_iter()
            .enumerate()
            .filter_map(|(addr, value)| value.map(|v| (addr as u16, v)))
            .collect()
    }

    /// Runs of consecutive addresses, split at `limit` bytes.
    fn runs(&self, limit: usize) -> Vec<(u16, Vec<u8>)> {
        let mut runs: Vec<(u16, Vec<u8>)> = Vec::new();
        for (addr, value) in self.memory() {
            match runs.last_mut() {
                Some((start, bytes))
                    if bytes.len() < limit
                        && start.wrapping_add(bytes.len() as u16) == addr
                        && addr != 0 =>
                {
                    bytes.push(value)
                }
                _ => runs.push((addr, vec![value])),
            }
        }
        runs
    }

    /// Write a raw binary covering the emitted range, filling gaps with `fill`.
    pub fn write_bin_file<W: Write>(&self, mut out: W, fill: u8) -> io::Result<()> {
        let Some((start, end)) = self.output_range() else {
            return Ok(());
        };
        let mut mem = vec![fill; end as usize - start as usize + 1];
        for (addr, value) in &self.entries {
            mem[(*addr - start) as usize] = *value;
        }
        out.write_all(&mem)
    }

    /// Write Motorola S19 records, ending with an S9 record holding the
    /// transfer address (zero when none was given).
    pub fn write_s19_file<W: Write>(&self, mut out: W, transfer: Option<u16>) -> io::Result<()> {
        for (addr, bytes) in self.runs(S19_LINE_BYTES) {
            let count = bytes.len() as u8 + 3;
            let mut checksum = count
                .wrapping_add((addr >> 8) as u8)
                .wrapping_add(addr as u8);
            let mut data = String::with_capacity(bytes.len() * 2);
            for b in &bytes {
                checksum = checksum.wrapping_add(*b);
                data.push_str(&format!("{b:02X}"));
            }
            writeln!(out, "S1{count:02X}{addr:04X}{data}{:02X}", !checksum)?;
        }
        let go = transfer.unwrap_or(0);
        let checksum = 3u8.wrapping_add((go >> 8) as u8).wrapping_add(go as u8);
        writeln!(out, "S903{go:04X}{:02X}", !checksum)
    }

    /// Write an Intel HEX file. Records are sorted by address; `go_addr`
    /// emits a start-segment-address record.
    pub fn write_hex_file<W: Write>(&self, mut out: W, go_addr: Option<u16>) -> io::Result<()> {
        for (line_addr, bytes) in self.runs(HEX_LINE_BYTES) {
            let mut checksum = (bytes.len() as u8)
                .wrapping_add((line_addr >> 8) as u8)
                .wrapping_add((line_addr & 0xff) as u8);
            let mut hex_data = String::with_capacity(bytes.len() * 2);
            for val in &bytes {
                hex_data.push(hex_digit((val >> 4) & 0x0f));
                hex_data.push(hex_digit(val & 0x0f));
                checksum = checksum.wrapping_add(*val);
            }
            checksum = (!checksum).wrapping_add(1);
            writeln!(
                out,
                ":{:02X}{:04X}00{}{:02X}",
                bytes.len(),
                line_addr,
                hex_data,
                checksum
            )?;
        }

        if let Some(addr) = go_addr {
            let mut csum: u8 = 0;
            csum = csum.wrapping_add(4);
            csum = csum.wrapping_add(3);
            csum = csum.wrapping_add((addr >> 8) as u8);
            csum = csum.wrapping_add((addr & 0xff) as u8);
            csum = (!csum).wrapping_add(1);
            writeln!(out, ":040000030000{:04X}{:02X}", addr, csum)?;
        }

        writeln!(out, ":00000001FF")
    }
}

impl ByteSink for ImageStore {
    fn emit_byte(&mut self, address: u16, value: u8, relocation: Option<&RelocationRecord>) {
        self.store(address, value);
        if let Some(record) = relocation {
            self.relocations.push(record.clone());
        }
    }
}

fn hex_digit(val: u8) -> char {
    match val {
        0..=9 => (b'0' + val) as char,
        _ => (b'A' + (val - 10)) as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hex_byte(s: &str) -> u8 {
        u8::from_str_radix(s, 16).unwrap()
    }

    fn verify_checksum(line: &str) {
        assert!(line.starts_with(':'), "record must start with ':'");
        let bytes = &line[1..];
        let len = parse_hex_byte(&bytes[0..2]) as usize;
        let data_end = 8 + len * 2;
        let mut sum: u8 = 0;
        for idx in (0..data_end).step_by(2) {
            sum = sum.wrapping_add(parse_hex_byte(&bytes[idx..idx + 2]));
        }
        let checksum = parse_hex_byte(&bytes[data_end..data_end + 2]);
        assert_eq!(checksum, (!sum).wrapping_add(1), "checksum mismatch for {line}");
    }

    #[test]
    fn writes_hex_records_with_valid_checksums() {
        let mut image = ImageStore::new();
        image.store_slice(0x1000, &[0x01, 0x02, 0x03]);
        image.store(0x2000, 0x04);
        let mut out = Vec::new();
        image.write_hex_file(&mut out, Some(0x1000)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in &lines {
            verify_checksum(line);
        }
        assert!(lines[0].starts_with(":03100000010203"));
        assert!(lines[2].starts_with(":04000003"));
        assert_eq!(lines.last().copied(), Some(":00000001FF"));
    }

    #[test]
    fn writes_s19_with_transfer_record() {
        let mut image = ImageStore::new();
        image.store_slice(0x1000, &[0x86, 0x01, 0x20, 0xFC]);
        let mut out = Vec::new();
        image.write_s19_file(&mut out, Some(0x1000)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "S1071000860120FC45\nS9031000EC\n");
    }

    #[test]
    fn write_bin_fills_gaps() {
        let mut image = ImageStore::new();
        image.store(0x0010, 0xaa);
        image.store(0x0012, 0xbb);
        let mut out = Vec::new();
        image.write_bin_file(&mut out, 0xff).unwrap();
        assert_eq!(out, vec![0xaa, 0xff, 0xbb]);
    }

    #[test]
    fn later_writes_win_in_record_output() {
        let mut image = ImageStore::new();
        image.store(0x0100, 0x11);
        image.store(0x0100, 0x22);
        let mut out = Vec::new();
        image.write_hex_file(&mut out, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(":0101000022"));
    }

    #[test]
    fn sink_keeps_relocations() {
        let mut image = ImageStore::new();
        let record = RelocationRecord {
            address: 0x0001,
            category: ExprCategory::INTERNAL,
            symbol: None,
        };
        image.emit_byte(0x0001, 0x10, Some(&record));
        image.emit_byte(0x0002, 0x00, None);
        assert_eq!(image.relocations(), &[record]);
        assert_eq!(image.num_entries(), 2);
    }
}
