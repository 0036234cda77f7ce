// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 CPU module.

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;
use crate::core::registry::CpuModule;

use super::M6800CpuHandler;

pub struct M6800CpuModule;

pub const CPU_ID: CpuType = CpuType::new("m6800");
const CPU_ALIASES: &[&str] = &["6800", "mc6800", "6802", "6808"];

impl CpuModule for M6800CpuModule {
    fn cpu_id(&self) -> CpuType {
        CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(M6800CpuHandler::new())
    }
}
