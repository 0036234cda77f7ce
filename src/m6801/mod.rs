// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6801/6803 and Hitachi HD6301/6303 CPU support module.

mod handler;
pub mod instructions;
pub mod module;

pub use handler::M6801CpuHandler;
