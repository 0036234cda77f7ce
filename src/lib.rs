// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Library entry exposing assembler modules.

pub mod assembler;
pub mod core;
pub mod families;
pub mod hd6309;
pub mod m6800;
pub mod m6801;
pub mod m6809;
pub mod m68hc11;
pub mod registry_defaults;
