// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6801 and Hitachi HD6301 CPU modules.

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;
use crate::core::registry::CpuModule;

use super::M6801CpuHandler;

pub struct M6801CpuModule;

pub const CPU_ID: CpuType = CpuType::new("m6801");
const CPU_ALIASES: &[&str] = &["6801", "mc6801", "6803"];

impl CpuModule for M6801CpuModule {
    fn cpu_id(&self) -> CpuType {
        CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(M6801CpuHandler::new())
    }
}

pub struct HD6301CpuModule;

pub const HD6301_CPU_ID: CpuType = CpuType::new("hd6301");
const HD6301_CPU_ALIASES: &[&str] = &["6301", "6303", "hd6303"];

impl CpuModule for HD6301CpuModule {
    fn cpu_id(&self) -> CpuType {
        HD6301_CPU_ID
    }

    fn cpu_aliases(&self) -> &'static [&'static str] {
        HD6301_CPU_ALIASES
    }

    fn handler(&self) -> Box<dyn CpuHandler> {
        Box::new(M6801CpuHandler::hd6301())
    }
}
