// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6809 family encoder shared by the 6809 and the HD6309.

mod handler;
mod table;
pub mod indexed;
pub mod operand;
pub mod registers;

pub use handler::{encode_address, encode_instruction, AddressForms};
pub use indexed::encode_indexed;
pub use table::FAMILY_INSTRUCTION_TABLE;
pub use operand::{parse_operand, IndexBase, IndexOffset, Indexed, Operand, Step};
