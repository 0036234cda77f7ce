// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Hitachi HD6309 CPU module.

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;
use crate::core::registry::CpuModule;

use super::HD6309CpuHandler;

pub struct HD6309CpuModule;

pub const CPU_ID: CpuType = CpuType::new("hd6309");
const CPU_ALIASES: &[&str] = &["6309", "h6309"];

impl CpuModule for HD6309CpuModule {
    fn cpu_id(&self) -> CpuType {
        CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(HD6309CpuHandler::new())
    }
}
