// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Core assembler components that are CPU-agnostic.
//!
//! - [`conditional`] - Conditional assembly state machine
//! - [`listing`] - Listing file generation
//! - [`error`] - Error flags, diagnostics, and fatal errors

pub mod conditional;
pub mod error;
pub mod listing;
