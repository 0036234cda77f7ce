// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! 6800 mnemonics accepted on the 6809, expanded to native sequences.

use crate::core::family::InsnClass::{Arith8, Inherent, Store};
use crate::core::family::InstructionEntry as E;

pub static CPU_INSTRUCTION_TABLE: &[E] = &[
    // PSHS B ; op ,S+
    E::new("ABA", Inherent, &[0x34, 0x04, 0xAB, 0xE0]),
    E::new("CBA", Inherent, &[0x34, 0x04, 0xA1, 0xE0]),
    E::new("SBA", Inherent, &[0x34, 0x04, 0xA0, 0xE0]),
    E::new("CLC", Inherent, &[0x1C, 0xFE]),
    E::new("CLI", Inherent, &[0x1C, 0xEF]),
    E::new("CLV", Inherent, &[0x1C, 0xFD]),
    E::new("SEC", Inherent, &[0x1A, 0x01]),
    E::new("SEI", Inherent, &[0x1A, 0x10]),
    E::new("SEV", Inherent, &[0x1A, 0x02]),
    E::new("DES", Inherent, &[0x32, 0x7F]),
    E::new("INS", Inherent, &[0x32, 0x61]),
    E::new("DEX", Inherent, &[0x30, 0x1F]),
    E::new("INX", Inherent, &[0x30, 0x01]),
    E::new("PSHA", Inherent, &[0x34, 0x02]),
    E::new("PSHB", Inherent, &[0x34, 0x04]),
    E::new("PULA", Inherent, &[0x35, 0x02]),
    E::new("PULB", Inherent, &[0x35, 0x04]),
    E::new("TAB", Inherent, &[0x1F, 0x89, 0x4D]),
    E::new("TBA", Inherent, &[0x1F, 0x98, 0x4D]),
    E::new("TAP", Inherent, &[0x1F, 0x8A]),
    E::new("TPA", Inherent, &[0x1F, 0xA8]),
    E::new("TSX", Inherent, &[0x1F, 0x41]),
    E::new("TXS", Inherent, &[0x1F, 0x14]),
    E::new("WAI", Inherent, &[0x3C, 0xFF]),
    E::new("LDAA", Arith8, &[0x86]),
    E::new("LDAB", Arith8, &[0xC6]),
    E::new("ORAA", Arith8, &[0x8A]),
    E::new("ORAB", Arith8, &[0xCA]),
    E::new("STAA", Store, &[0x87]),
    E::new("STAB", Store, &[0xC7]),
];
