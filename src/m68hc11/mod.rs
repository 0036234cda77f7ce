// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 68HC11 CPU support module.

mod handler;
pub mod instructions;
pub mod module;

pub use handler::M68HC11CpuHandler;
