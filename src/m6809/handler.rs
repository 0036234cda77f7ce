// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6809 CPU handler implementation.

use crate::core::cpu::CpuType;
use crate::core::family::{find_entry, CpuHandler, EncodeContext, InstructionEntry};
use crate::families::m6809::{encode_instruction, FAMILY_INSTRUCTION_TABLE};

use super::instructions::CPU_INSTRUCTION_TABLE;
use super::module::CPU_ID;

#[derive(Debug, Default)]
pub struct M6809CpuHandler;

impl M6809CpuHandler {
    pub fn new() -> Self {
        Self
    }

    /// Native mnemonics first, then the 6800 compatibility set.
    pub fn lookup_entry(mnemonic: &str) -> Option<&'static InstructionEntry> {
        find_entry(FAMILY_INSTRUCTION_TABLE, mnemonic)
            .or_else(|| find_entry(CPU_INSTRUCTION_TABLE, mnemonic))
    }
}

impl CpuHandler for M6809CpuHandler {
    fn cpu(&self) -> CpuType {
        CPU_ID
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry> {
        Self::lookup_entry(mnemonic)
    }

    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>) {
        encode_instruction(entry, operand, ctx, false);
    }
}
