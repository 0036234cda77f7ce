// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6801 and Hitachi HD6301 CPU handler implementation.

use crate::core::cpu::CpuType;
use crate::core::family::{find_entry, CpuHandler, EncodeContext, InstructionEntry};
use crate::families::m6800::{encode_instruction, M6800Variant, FAMILY_INSTRUCTION_TABLE};

use super::instructions::{CPU_INSTRUCTION_TABLE, HD6301_INSTRUCTION_TABLE};
use super::module::{CPU_ID, HD6301_CPU_ID};

#[derive(Debug, Default)]
pub struct M6801CpuHandler {
    hd6301: bool,
}

impl M6801CpuHandler {
    pub fn new() -> Self {
        Self { hd6301: false }
    }

    pub fn hd6301() -> Self {
        Self { hd6301: true }
    }

    /// The 6801 set: additions first so they override 6800 entries.
    pub fn lookup_entry(mnemonic: &str) -> Option<&'static InstructionEntry> {
        find_entry(CPU_INSTRUCTION_TABLE, mnemonic)
            .or_else(|| find_entry(FAMILY_INSTRUCTION_TABLE, mnemonic))
    }
}

impl CpuHandler for M6801CpuHandler {
    fn cpu(&self) -> CpuType {
        if self.hd6301 {
            HD6301_CPU_ID
        } else {
            CPU_ID
        }
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry> {
        if self.hd6301 {
            if let Some(entry) = find_entry(HD6301_INSTRUCTION_TABLE, mnemonic) {
                return Some(entry);
            }
        }
        Self::lookup_entry(mnemonic)
    }

    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>) {
        let variant = if self.hd6301 {
            M6800Variant::HD6301
        } else {
            M6800Variant::M6801
        };
        encode_instruction(entry, operand, ctx, variant);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::assembler::error::ErrorFlags;
    use crate::core::options::AsmOptions;
    use crate::core::symbol_table::SymbolTable;

    fn encode_flags(handler: &M6801CpuHandler, line: &str) -> Option<(Vec<u8>, ErrorFlags)> {
        let mut symbols = SymbolTable::new();
        let options = AsmOptions {
            cpu: handler.cpu(),
            ..AsmOptions::default()
        };
        let aliases = HashMap::new();
        let (mnemonic, operand) = line.split_once(' ').unwrap_or((line, ""));
        let entry = handler.lookup(mnemonic)?;
        let mut ctx = EncodeContext::new(&mut symbols, &options, &aliases, 0x8000, 2, 0);
        handler.encode(entry, operand.trim(), &mut ctx);
        Some((ctx.bytes, ctx.errors))
    }

    fn encode(handler: &M6801CpuHandler, line: &str) -> Vec<u8> {
        let (bytes, errors) = encode_flags(handler, line).expect("mnemonic");
        assert!(errors.is_empty(), "{line}: {errors:?}");
        bytes
    }

    #[test]
    fn adds_double_accumulator_and_direct_jsr() {
        let cpu = M6801CpuHandler::new();
        assert_eq!(encode(&cpu, "LDD #$1234"), vec![0xCC, 0x12, 0x34]);
        assert_eq!(encode(&cpu, "STD $20"), vec![0xDD, 0x20]);
        assert_eq!(encode(&cpu, "JSR $20"), vec![0x9D, 0x20]);
        assert_eq!(encode(&cpu, "MUL"), vec![0x3D]);
        assert_eq!(encode(&cpu, "LDAA 1,X"), vec![0xA6, 0x01]);
        assert!(encode_flags(&cpu, "AIM #1,$20").is_none());
    }

    #[test]
    fn hd6301_bit_operations() {
        let cpu = M6801CpuHandler::hd6301();
        assert_eq!(encode(&cpu, "AIM #$FE,$20"), vec![0x71, 0xFE, 0x20]);
        assert_eq!(encode(&cpu, "OIM #$01,3,X"), vec![0x62, 0x01, 0x03]);
        assert_eq!(encode(&cpu, "XGDX"), vec![0x18]);
        let (_, errors) = encode_flags(&cpu, "TIM #1,$1234").expect("mnemonic");
        assert!(errors.contains(ErrorFlags::RANGE));
    }
}
