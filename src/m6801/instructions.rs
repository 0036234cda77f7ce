// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! 6801 additions to the 6800 set, and the HD6301 extras on top.

use crate::core::family::InsnClass::{Arith16, BitIndexed, Inherent, ShortBranch, Store};
use crate::core::family::InstructionEntry as E;

pub static CPU_INSTRUCTION_TABLE: &[E] = &[
    E::new("LSRD", Inherent, &[0x04]),
    E::new("ASLD", Inherent, &[0x05]),
    E::new("LSLD", Inherent, &[0x05]),
    E::new("PULX", Inherent, &[0x38]),
    E::new("ABX", Inherent, &[0x3A]),
    E::new("PSHX", Inherent, &[0x3C]),
    E::new("MUL", Inherent, &[0x3D]),
    E::new("BRN", ShortBranch, &[0x21]),
    E::new("SUBD", Arith16, &[0x83]),
    E::new("ADDD", Arith16, &[0xC3]),
    E::new("LDD", Arith16, &[0xCC]),
    E::new("STD", Store, &[0xCD]),
    E::new("JSR", Store, &[0x8D]),
];

pub static HD6301_INSTRUCTION_TABLE: &[E] = &[
    E::new("XGDX", Inherent, &[0x18]),
    E::new("SLP", Inherent, &[0x1A]),
    E::new("AIM", BitIndexed, &[0x61]),
    E::new("OIM", BitIndexed, &[0x62]),
    E::new("EIM", BitIndexed, &[0x65]),
    E::new("TIM", BitIndexed, &[0x6B]),
];
