// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 family encoder shared by the 6800, 6801, HD6301 and 68HC11.

mod handler;
pub mod operand;
mod table;

pub use handler::{encode_instruction, M6800Variant};
pub use operand::{parse_operand, IndexReg, Operand};
pub use table::FAMILY_INSTRUCTION_TABLE;
