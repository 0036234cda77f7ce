// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 68HC11 CPU module.

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;
use crate::core::registry::CpuModule;

use super::M68HC11CpuHandler;

pub struct M68HC11CpuModule;

pub const CPU_ID: CpuType = CpuType::new("m68hc11");
const CPU_ALIASES: &[&str] = &["6811", "68hc11", "hc11"];

impl CpuModule for M68HC11CpuModule {
    fn cpu_id(&self) -> CpuType {
        CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(M68HC11CpuHandler::new())
    }
}
