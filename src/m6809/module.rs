// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6809 CPU module.

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;
use crate::core::registry::CpuModule;

use super::M6809CpuHandler;

pub struct M6809CpuModule;

pub const CPU_ID: CpuType = CpuType::new("m6809");
const CPU_ALIASES: &[&str] = &["6809", "mc6809"];

impl CpuModule for M6809CpuModule {
    fn cpu_id(&self) -> CpuType {
        CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(M6809CpuHandler::new())
    }
}
