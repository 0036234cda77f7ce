// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-agnostic assembler core.

pub mod assembler;
pub mod cpu;
pub mod expr;
pub mod family;
pub mod imagestore;
pub mod macro_processor;
pub mod options;
pub mod registry;
pub mod source;
pub mod symbol_table;
pub mod text_utils;
