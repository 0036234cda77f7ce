// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6809 CPU support module.

mod handler;
pub mod instructions;
pub mod module;

pub use handler::M6809CpuHandler;
