// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Registry mapping CPU names to their encoder modules.

use std::collections::HashMap;

use crate::core::cpu::CpuType;
use crate::core::family::CpuHandler;

/// Registration interface for a specific CPU (provides handler factory).
pub trait CpuModule {
    fn cpu_id(&self) -> CpuType;
    fn cpu_name(&self) -> &'static str {
        self.cpu_id().as_str()
    }
    fn cpu_aliases(&self) -> &'static [&'static str] {
        &[]
    }
    fn handler(&self) -> Box<dyn CpuHandler>;
}

/// Central registry of CPU modules.
pub struct ModuleRegistry {
    cpus: HashMap<CpuType, Box<dyn CpuModule>>,
    cpu_names: HashMap<String, CpuType>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            cpus: HashMap::new(),
            cpu_names: HashMap::new(),
        }
    }

    pub fn register_cpu(&mut self, module: Box<dyn CpuModule>) {
        let cpu_id = module.cpu_id();
        self.cpu_names
            .insert(normalize_cpu_name(module.cpu_name()), cpu_id);
        for alias in module.cpu_aliases() {
            self.cpu_names.insert(normalize_cpu_name(alias), cpu_id);
        }
        self.cpus.insert(cpu_id, module);
    }

    pub fn resolve_cpu_name(&self, name: &str) -> Option<CpuType> {
        self.cpu_names.get(&normalize_cpu_name(name)).copied()
    }

    pub fn handler(&self, cpu: CpuType) -> Option<Box<dyn CpuHandler>> {
        self.cpus.get(&cpu).map(|module| module.handler())
    }

    pub fn cpu_name_list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cpu_names.keys().cloned().collect();
        names.sort();
        names
    }
}

fn normalize_cpu_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
