// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU family implementations.
//!
//! This module contains family-level encoders that implement shared operand
//! parsing and encoding for groups of related CPUs.

pub mod m6800;
pub mod m6809;
