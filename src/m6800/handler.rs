// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 CPU handler implementation.

use crate::core::cpu::CpuType;
use crate::core::family::{find_entry, CpuHandler, EncodeContext, InstructionEntry};
use crate::families::m6800::{encode_instruction, M6800Variant, FAMILY_INSTRUCTION_TABLE};

use super::module::CPU_ID;

#[derive(Debug, Default)]
pub struct M6800CpuHandler;

impl M6800CpuHandler {
    pub fn new() -> Self {
        Self
    }
}

impl CpuHandler for M6800CpuHandler {
    fn cpu(&self) -> CpuType {
        CPU_ID
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry> {
        find_entry(FAMILY_INSTRUCTION_TABLE, mnemonic)
    }

    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>) {
        encode_instruction(entry, operand, ctx, M6800Variant::M6800);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::assembler::error::{ErrorFlags, WarningFlags};
    use crate::core::options::AsmOptions;
    use crate::core::symbol_table::SymbolTable;

    fn encode_flags(line: &str) -> (Vec<u8>, ErrorFlags, WarningFlags) {
        let mut symbols = SymbolTable::new();
        let options = AsmOptions {
            cpu: CPU_ID,
            ..AsmOptions::default()
        };
        let aliases = HashMap::new();
        let (mnemonic, operand) = line.split_once(' ').unwrap_or((line, ""));
        let handler = M6800CpuHandler::new();
        let entry = handler.lookup(mnemonic).expect("mnemonic");
        let mut ctx = EncodeContext::new(&mut symbols, &options, &aliases, 0x0100, 2, 0);
        handler.encode(entry, operand.trim(), &mut ctx);
        (ctx.bytes, ctx.errors, ctx.warnings)
    }

    fn encode(line: &str) -> Vec<u8> {
        let (bytes, errors, _) = encode_flags(line);
        assert!(errors.is_empty(), "{line}: {errors:?}");
        bytes
    }

    #[test]
    fn encodes_addressing_modes() {
        assert_eq!(encode("LDAA #$41"), vec![0x86, 0x41]);
        assert_eq!(encode("LDX #$1234"), vec![0xCE, 0x12, 0x34]);
        assert_eq!(encode("LDAA $40"), vec![0x96, 0x40]);
        assert_eq!(encode("LDAA 4,X"), vec![0xA6, 0x04]);
        assert_eq!(encode("LDAA ,X"), vec![0xA6, 0x00]);
        assert_eq!(encode("STAB $1234"), vec![0xF7, 0x12, 0x34]);
        assert_eq!(encode("CLR $40"), vec![0x7F, 0x00, 0x40]);
        assert_eq!(encode("CLR 2,X"), vec![0x6F, 0x02]);
        assert_eq!(encode("TAB"), vec![0x16]);
    }

    #[test]
    fn jsr_has_no_direct_form() {
        assert_eq!(encode("JSR $40"), vec![0xBD, 0x00, 0x40]);
        assert_eq!(encode("JSR 0,X"), vec![0xAD, 0x00]);
        let (bytes, _, warnings) = encode_flags("JSR <$40");
        assert_eq!(bytes, vec![0xBD, 0x00, 0x40]);
        assert!(warnings.contains(WarningFlags::ILLOGICAL_FORCE));
    }

    #[test]
    fn rejects_out_of_range_index_and_store_immediate() {
        let (_, errors, _) = encode_flags("LDAA 300,X");
        assert!(errors.contains(ErrorFlags::RANGE));
        let (_, errors, _) = encode_flags("STAA #1");
        assert!(errors.contains(ErrorFlags::ADDRESSING_MODE));
        let (_, errors, _) = encode_flags("LDAA 1,Y");
        assert!(errors.contains(ErrorFlags::ADDRESSING_MODE));
    }

    #[test]
    fn branches_relative_to_next_instruction() {
        assert_eq!(encode("BRA $0100"), vec![0x20, 0xFE]);
        assert_eq!(encode("BSR $0110"), vec![0x8D, 0x0E]);
    }
}
