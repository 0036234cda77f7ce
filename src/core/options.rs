// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembly options shared by the command line and the `OPT` directive.

use crate::core::cpu::CpuType;
use crate::core::symbol_table::MAX_ENTRIES;

pub const DEFAULT_CPU: CpuType = CpuType::new("m6809");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmOptions {
    pub cpu: CpuType,
    /// Strict syntax: whitespace ends the operand, names are case sensitive,
    /// and a literal `0` offset is accepted before auto-increment modes.
    pub strict: bool,
    /// GNU-style number prefixes and `$` inside identifiers.
    pub gnu: bool,
    /// Undefined symbols become external references after the first pass.
    pub undef_extern: bool,
    /// Produce relocatable output; ORG is not available.
    pub relocatable: bool,
    /// Allow relative branches to wrap around the 64K address space.
    pub wrap: bool,
    /// Warn about long branches that would fit the short form.
    pub branch_hints: bool,
    /// Gap filler for binary output.
    pub fill: u8,
    /// Direct page in effect at the start of each pass (6809/6309 only).
    pub direct_page: u8,
    pub symbol_limit: usize,
}

impl Default for AsmOptions {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU,
            strict: false,
            gnu: false,
            undef_extern: false,
            relocatable: false,
            wrap: false,
            branch_hints: true,
            fill: 0xFF,
            direct_page: 0,
            symbol_limit: MAX_ENTRIES,
        }
    }
}

impl AsmOptions {
    /// Apply a boolean `OPT` switch such as `TSC` or `NOWRAP`.
    ///
    /// Returns false when the name is not a known switch.
    pub fn apply_switch(&mut self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        let (enable, base) = match upper.strip_prefix("NO") {
            Some(base) if !base.is_empty() => (false, base.to_string()),
            _ => (true, upper),
        };
        match base.as_str() {
            "TSC" => self.strict = enable,
            "GNU" => self.gnu = enable,
            "UNDEFEXT" => self.undef_extern = enable,
            "WRAP" => self.wrap = enable,
            "HINTS" => self.branch_hints = enable,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_toggle_options() {
        let mut opts = AsmOptions::default();
        assert!(opts.apply_switch("tsc"));
        assert!(opts.strict);
        assert!(opts.apply_switch("NOTSC"));
        assert!(!opts.strict);
        assert!(opts.apply_switch("NOHINTS"));
        assert!(!opts.branch_hints);
        assert!(!opts.apply_switch("BOGUS"));
        assert!(!opts.apply_switch("NO"));
    }
}
