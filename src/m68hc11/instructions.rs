// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! 68HC11 additions to the 6801 set.
//!
//! Y-register instructions live on page 18; CPD lives on page 1A. The
//! X-register instructions are flagged so Y indexing moves them to page CD.

use crate::core::family::InsnClass::{Arith16, BitBranch, BitSetClear, Inherent, Store};
use crate::core::family::{InsnFlags, InstructionEntry as E};

pub static CPU_INSTRUCTION_TABLE: &[E] = &[
    E::new("TEST", Inherent, &[0x00]),
    E::new("IDIV", Inherent, &[0x02]),
    E::new("FDIV", Inherent, &[0x03]),
    E::new("XGDX", Inherent, &[0x8F]),
    E::new("STOP", Inherent, &[0xCF]),
    E::new("INY", Inherent, &[0x18, 0x08]),
    E::new("DEY", Inherent, &[0x18, 0x09]),
    E::new("TSY", Inherent, &[0x18, 0x30]),
    E::new("TYS", Inherent, &[0x18, 0x35]),
    E::new("PULY", Inherent, &[0x18, 0x38]),
    E::new("ABY", Inherent, &[0x18, 0x3A]),
    E::new("PSHY", Inherent, &[0x18, 0x3C]),
    E::new("XGDY", Inherent, &[0x18, 0x8F]),
    E::new("BRSET", BitBranch, &[0x12]),
    E::new("BRCLR", BitBranch, &[0x13]),
    E::new("BSET", BitSetClear, &[0x14]),
    E::new("BCLR", BitSetClear, &[0x15]),
    E::new("CPX", Arith16, &[0x8C]).with_flags(InsnFlags::ALT_CD),
    E::new("LDX", Arith16, &[0xCE]).with_flags(InsnFlags::ALT_CD),
    E::new("STX", Store, &[0xCF]).with_flags(InsnFlags::ALT_CD),
    E::new("CPD", Arith16, &[0x1A, 0x83]),
    E::new("CPY", Arith16, &[0x18, 0x8C]),
    E::new("LDY", Arith16, &[0x18, 0xCE]),
    E::new("STY", Store, &[0x18, 0xCF]),
];
