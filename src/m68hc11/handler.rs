// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 68HC11 CPU handler implementation.

use crate::core::cpu::CpuType;
use crate::core::family::{find_entry, CpuHandler, EncodeContext, InstructionEntry};
use crate::families::m6800::{encode_instruction, M6800Variant};
use crate::m6801::M6801CpuHandler;

use super::instructions::CPU_INSTRUCTION_TABLE;
use super::module::CPU_ID;

#[derive(Debug, Default)]
pub struct M68HC11CpuHandler;

impl M68HC11CpuHandler {
    pub fn new() -> Self {
        Self
    }
}

impl CpuHandler for M68HC11CpuHandler {
    fn cpu(&self) -> CpuType {
        CPU_ID
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry> {
        find_entry(CPU_INSTRUCTION_TABLE, mnemonic)
            .or_else(|| M6801CpuHandler::lookup_entry(mnemonic))
    }

    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>) {
        encode_instruction(entry, operand, ctx, M6800Variant::M68HC11);
    }
}
