// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Shared default registry construction for the assembler and CLI.

use crate::core::registry::ModuleRegistry;
use crate::hd6309::module::HD6309CpuModule;
use crate::m6800::module::M6800CpuModule;
use crate::m6801::module::{HD6301CpuModule, M6801CpuModule};
use crate::m6809::module::M6809CpuModule;
use crate::m68hc11::module::M68HC11CpuModule;

/// Build the registry of every supported CPU.
pub fn build_default_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_cpu(Box::new(M6809CpuModule));
    registry.register_cpu(Box::new(HD6309CpuModule));
    registry.register_cpu(Box::new(M6800CpuModule));
    registry.register_cpu(Box::new(M6801CpuModule));
    registry.register_cpu(Box::new(HD6301CpuModule));
    registry.register_cpu(Box::new(M68HC11CpuModule));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cpu::CpuType;

    #[test]
    fn default_registry_contains_expected_aliases() {
        let registry = build_default_registry();
        assert_eq!(
            registry.resolve_cpu_name("6809"),
            Some(CpuType::new("m6809"))
        );
        assert_eq!(
            registry.resolve_cpu_name("H6309"),
            Some(CpuType::new("hd6309"))
        );
        assert_eq!(
            registry.resolve_cpu_name("6303"),
            Some(CpuType::new("hd6301"))
        );
        assert_eq!(
            registry.resolve_cpu_name("68HC11"),
            Some(CpuType::new("m68hc11"))
        );
        assert_eq!(registry.resolve_cpu_name("z80"), None);
    }

    #[test]
    fn handlers_report_their_cpu() {
        let registry = build_default_registry();
        for name in ["m6809", "hd6309", "m6800", "m6801", "hd6301", "m68hc11"] {
            let cpu = registry.resolve_cpu_name(name).expect("registered");
            let handler = registry.handler(cpu).expect("handler");
            assert_eq!(handler.cpu(), cpu);
        }
    }
}
