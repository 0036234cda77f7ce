// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error flags, diagnostics, and fatal conditions for the assembler.

use std::fmt;
use std::io;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Recoverable per-line errors. Each bit maps to a stable code 1..=13.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ErrorFlags: u32 {
        const EXPRESSION = 1 << 0;
        const ADDRESSING_MODE = 1 << 1;
        const UNDEFINED = 1 << 2;
        const MULTIPLY_DEFINED = 1 << 3;
        const RANGE = 1 << 4;
        const MISSING_LABEL = 1 << 5;
        const UNKNOWN_OPTION = 1 << 6;
        const RESOURCE = 1 << 7;
        const ILLEGAL_NESTING = 1 << 8;
        const RELOCATION_MODE = 1 << 9;
        const USER = 1 << 10;
        const ILLEGAL_MNEMONIC = 1 << 11;
        const PHASE = 1 << 12;
    }
}

bitflags! {
    /// Per-line warnings. Each bit maps to a stable code 101..=109.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct WarningFlags: u16 {
        const BRANCH_OPTIMIZE = 1 << 0;
        const TEXT_UNDEFINED = 1 << 1;
        const ADDRESS_REUSED = 1 << 2;
        const AMBIGUOUS_MNEMONIC = 1 << 3;
        const FORCED_TRUNCATION = 1 << 4;
        const IMMEDIATE_TRUNCATION = 1 << 5;
        const ILLOGICAL_FORCE = 1 << 6;
        const RELATIVE_WRAP = 1 << 7;
        const USER = 1 << 8;
    }
}

impl ErrorFlags {
    /// Stable numeric code of a single flag.
    pub fn code(self) -> u16 {
        self.bits().trailing_zeros() as u16 + 1
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::EXPRESSION => "Error in expression",
            Self::ADDRESSING_MODE => "Illegal addressing mode",
            Self::UNDEFINED => "Undefined symbol",
            Self::MULTIPLY_DEFINED => "Multiply defined symbol",
            Self::RANGE => "Value out of range",
            Self::MISSING_LABEL => "Missing label",
            Self::UNKNOWN_OPTION => "Unknown option",
            Self::RESOURCE => "Resource exhausted",
            Self::ILLEGAL_NESTING => "Illegal nesting",
            Self::RELOCATION_MODE => "Not allowed in this relocation mode",
            Self::USER => "User error",
            Self::ILLEGAL_MNEMONIC => "Illegal mnemonic",
            Self::PHASE => "Phasing error, value changed between passes",
            _ => "Multiple errors",
        }
    }
}

impl WarningFlags {
    pub fn code(self) -> u16 {
        self.bits().trailing_zeros() as u16 + 101
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::BRANCH_OPTIMIZE => "Long branch within short branch range could be optimized",
            Self::TEXT_UNDEFINED => "Undefined symbolic text",
            Self::ADDRESS_REUSED => "Code was already output at this address",
            Self::AMBIGUOUS_MNEMONIC => "Ambiguous mnemonic resolved as 6800 accumulator form",
            Self::FORCED_TRUNCATION => "Value truncated by forced addressing",
            Self::IMMEDIATE_TRUNCATION => "Immediate value truncated",
            Self::ILLOGICAL_FORCE => "Illogical forcing ignored",
            Self::RELATIVE_WRAP => "Relative branch wraps around 64K",
            Self::USER => "User warning",
            _ => "Multiple warnings",
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic message with location and context.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub(crate) line: u32,
    pub(crate) code: u16,
    pub(crate) severity: Severity,
    pub(crate) message: String,
    pub(crate) file: Option<String>,
    pub(crate) source: Option<String>,
}

impl Diagnostic {
    pub fn new(line: u32, severity: Severity, code: u16, message: impl Into<String>) -> Self {
        Self {
            line,
            code,
            severity,
            message: message.into(),
            file: None,
            source: None,
        }
    }

    /// Diagnostic for a single error flag with an optional detail.
    pub fn from_error(line: u32, flag: ErrorFlags, param: Option<&str>) -> Self {
        Self::new(
            line,
            Severity::Error,
            flag.code(),
            format_error(flag.message(), param),
        )
    }

    pub fn from_warning(line: u32, flag: WarningFlags, param: Option<&str>) -> Self {
        Self::new(
            line,
            Severity::Warning,
            flag.code(),
            format_error(flag.message(), param),
        )
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    /// Short code such as `E003` or `W101`.
    pub fn code_str(&self) -> String {
        match self.severity {
            Severity::Error => format!("E{:03}", self.code),
            Severity::Warning => format!("W{:03}", self.code),
        }
    }

    pub fn format(&self) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        format!(
            "{}: {} [{}] - {}",
            self.line,
            sev,
            self.code_str(),
            self.message
        )
    }

    pub fn format_with_context(&self) -> String {
        let sev = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        let mut out = match &self.file {
            Some(file) => format!("{file}:{}: {sev} [{}]\n", self.line, self.code_str()),
            None => format!("{}: {sev} [{}]\n", self.line, self.code_str()),
        };
        if let Some(source) = &self.source {
            out.push_str(&format!("{:>5} | {}\n", self.line, source));
        }
        out.push_str(&format!("{sev}: {}", self.message));
        out
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Conditions that abort the run.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("symbol table full ({limit} entries)")]
    SymbolTableFull { limit: usize },
    #[error("macro table full ({limit} definitions)")]
    MacroTableFull { limit: usize },
    #[error("relocation table full ({limit} records)")]
    RelocationTableFull { limit: usize },
    #[error("cannot read {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown CPU: {0}")]
    UnknownCpu(String),
}

/// Pass statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassCounts {
    pub lines: u32,
    pub errors: u32,
    pub warnings: u32,
}

impl PassCounts {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Format an error message with an optional parameter.
pub fn format_error(msg: &str, param: Option<&str>) -> String {
    match param {
        Some(p) => format!("{msg}: {p}"),
        None => msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_format_includes_line_and_severity() {
        let diag = Diagnostic::from_error(12, ErrorFlags::UNDEFINED, Some("FOO"));
        assert_eq!(diag.format(), "12: ERROR [E003] - Undefined symbol: FOO");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorFlags::EXPRESSION.code(), 1);
        assert_eq!(ErrorFlags::PHASE.code(), 13);
        assert_eq!(WarningFlags::BRANCH_OPTIMIZE.code(), 101);
        assert_eq!(WarningFlags::USER.code(), 109);
    }

    #[test]
    fn flags_iterate_per_bit() {
        let flags = ErrorFlags::RANGE | ErrorFlags::UNDEFINED;
        let codes: Vec<u16> = flags.iter().map(ErrorFlags::code).collect();
        assert_eq!(codes, vec![3, 5]);
    }

    #[test]
    fn format_with_context_renders_source_line() {
        let diag = Diagnostic::from_warning(8, WarningFlags::IMMEDIATE_TRUNCATION, None)
            .with_file(Some("example.asm".to_string()))
            .with_source(Some(" LDA #300".to_string()));
        let expected = [
            "example.asm:8: WARNING [W106]",
            "    8 |  LDA #300",
            "WARNING: Immediate value truncated",
        ]
        .join("\n");
        assert_eq!(diag.format_with_context(), expected);
    }
}
