// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 CPU support module.

mod handler;
pub mod module;

pub use handler::M6800CpuHandler;
