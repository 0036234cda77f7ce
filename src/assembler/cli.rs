// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

use crate::core::assembler::error::FatalError;
use crate::core::options::AsmOptions;
use crate::core::registry::ModuleRegistry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Two-pass cross assembler for the Motorola 6809, Hitachi 6309,
Motorola 6800/6801, Hitachi 6301 and Motorola 68HC11.

The object file is written only when the run finished without errors.
Without -o the output name is the input name with an extension matching
the format (.bin, .s19 or .hex).";

#[derive(Parser, Debug)]
#[command(
    name = "cross09",
    version = VERSION,
    about = "Cross assembler for the 6809/6309/6800/6801/6301/68HC11",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "cpu",
        value_name = "CPU",
        default_value = "6809",
        value_parser = PossibleValuesParser::new(["6809", "6309", "6800", "6801", "6301", "6811"]),
        long_help = "Initial CPU. OPT directives in the source can switch it later."
    )]
    pub cpu: String,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        long_help = "Object file name. Defaults to the input name with the format's extension."
    )]
    pub output: Option<PathBuf>,
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Srec,
        long_help = "Object file format."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'l',
        long = "list",
        value_name = "FILE",
        long_help = "Write an assembly listing to FILE."
    )]
    pub list: Option<PathBuf>,
    #[arg(
        long = "symbols",
        action = ArgAction::SetTrue,
        requires = "list",
        long_help = "Append the sorted symbol table to the listing."
    )]
    pub symbols: bool,
    #[arg(
        long = "tsc",
        action = ArgAction::SetTrue,
        long_help = "Strict TSC syntax: blanks end the operand and names are case sensitive."
    )]
    pub tsc: bool,
    #[arg(
        long = "gnu",
        action = ArgAction::SetTrue,
        long_help = "Accept GNU-style number prefixes and '$' inside identifiers."
    )]
    pub gnu: bool,
    #[arg(
        long = "undef-extern",
        action = ArgAction::SetTrue,
        long_help = "Treat symbols still undefined after pass 1 as external references."
    )]
    pub undef_extern: bool,
    #[arg(
        long = "relocatable",
        action = ArgAction::SetTrue,
        long_help = "Relocatable mode: ORG is rejected and EXTERN/PUBLIC/COMMON are available."
    )]
    pub relocatable: bool,
    #[arg(
        long = "fill",
        value_name = "BYTE",
        value_parser = parse_fill_byte,
        default_value = "$FF",
        long_help = "Gap filler for binary output ($hex, 0xhex or decimal)."
    )]
    pub fill: u8,
    #[arg(
        long = "wrap",
        action = ArgAction::SetTrue,
        long_help = "Allow relative branches to wrap around the 64K address space."
    )]
    pub wrap: bool,
    #[arg(
        long = "no-branch-hints",
        action = ArgAction::SetTrue,
        long_help = "Do not warn about long branches that would fit the short form."
    )]
    pub no_branch_hints: bool,
    #[arg(
        short = 'I',
        long = "include",
        value_name = "DIR",
        action = ArgAction::Append,
        long_help = "Add a directory to the INCLUDE/BINARY search path. Can be repeated."
    )]
    pub include_dirs: Vec<PathBuf>,
    #[arg(
        long = "diagnostics",
        value_enum,
        default_value_t = DiagnosticsFormat::Text,
        long_help = "Diagnostic output format on stderr."
    )]
    pub diagnostics: DiagnosticsFormat,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        long_help = "Increase log verbosity (-v info, -vv debug, -vvv trace)."
    )]
    pub verbose: u8,
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Bin,
    #[default]
    Srec,
    Ihex,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Bin => "bin",
            OutputFormat::Srec => "s19",
            OutputFormat::Ihex => "hex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DiagnosticsFormat {
    #[default]
    Text,
    Json,
}

/// Parse a fill byte given as `$FF`, `0xFF` or decimal.
pub fn parse_fill_byte(text: &str) -> Result<u8, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u8::from_str_radix(hex, 16)
    } else if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        u8::from_str_radix(hex, 16)
    } else {
        text.parse::<u8>()
    };
    parsed.map_err(|_| format!("invalid fill byte '{text}'"))
}

impl Cli {
    /// Assembly options selected on the command line.
    pub fn asm_options(&self, registry: &ModuleRegistry) -> Result<AsmOptions, FatalError> {
        let cpu = registry
            .resolve_cpu_name(&self.cpu)
            .ok_or_else(|| FatalError::UnknownCpu(self.cpu.clone()))?;
        Ok(AsmOptions {
            cpu,
            strict: self.tsc,
            gnu: self.gnu,
            undef_extern: self.undef_extern,
            relocatable: self.relocatable,
            wrap: self.wrap,
            branch_hints: !self.no_branch_hints,
            fill: self.fill,
            ..AsmOptions::default()
        })
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.format.extension()))
    }
}
