// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Conditional assembly state management.

use thiserror::Error;

use crate::core::text_utils::split_top_level;

/// Default nesting limit for IF blocks.
pub const MAX_CONDITIONAL_DEPTH: usize = 64;

/// State of one open IF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalState {
    /// Lines are assembled.
    Active,
    /// The block is skipped up to its ENDIF, ELSE included.
    SkipUntilEndif,
    /// The condition was false; ELSE switches the block on.
    SkipUntilElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConditionalError {
    #[error("conditional nesting deeper than {0}")]
    TooDeep(usize),
    #[error("ELSE without IF")]
    ElseWithoutIf,
    #[error("ENDIF without IF")]
    EndifWithoutIf,
}

/// A conditional-assembly directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalDirective {
    /// `IF expr`: assemble when nonzero.
    If,
    /// `IFN expr`: assemble when zero.
    IfNot,
    /// `IFC a,b`: assemble when the two strings match.
    IfSame,
    IfNotSame,
    /// `IFD name`: assemble when the symbol is already defined.
    IfDefined,
    IfNotDefined,
    Else,
    EndIf,
}

impl ConditionalDirective {
    /// Recognize a directive mnemonic, in any case.
    pub fn parse(mnemonic: &str) -> Option<Self> {
        let directive = match mnemonic.to_ascii_uppercase().as_str() {
            "IF" => Self::If,
            "IFN" => Self::IfNot,
            "IFC" => Self::IfSame,
            "IFNC" => Self::IfNotSame,
            "IFD" | "IFDEF" => Self::IfDefined,
            "IFND" | "IFNDEF" => Self::IfNotDefined,
            "ELSE" => Self::Else,
            "ENDIF" | "ENDC" | "FIN" => Self::EndIf,
            _ => return None,
        };
        Some(directive)
    }

    /// Only the expression and definition tests take an `, n` skip count.
    pub fn accepts_skip_count(self) -> bool {
        matches!(
            self,
            Self::If | Self::IfNot | Self::IfDefined | Self::IfNotDefined
        )
    }

    /// Split `expr, n` into the condition and the line count when this is
    /// the skip-count form. That form never touches the block stack.
    pub fn skip_count<'a>(self, operand: &'a str) -> Option<(&'a str, &'a str)> {
        if !self.accepts_skip_count() {
            return None;
        }
        match split_top_level(operand).as_slice() {
            [condition, count] => Some((*condition, *count)),
            _ => None,
        }
    }
}

/// Compare the two comma-separated operands of IFC/IFNC.
///
/// Surrounding double quotes are not part of the compared text.
pub fn strings_match(operand: &str) -> bool {
    let (left, right) = match split_top_level(operand).as_slice() {
        [left, right] => (*left, *right),
        [only] => (*only, ""),
        _ => return false,
    };
    unquote(left.trim()) == unquote(right.trim())
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Stack of open conditional blocks.
#[derive(Debug, Clone)]
pub struct ConditionalStack {
    stack: Vec<ConditionalState>,
    limit: usize,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::with_limit(MAX_CONDITIONAL_DEPTH)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            stack: Vec::new(),
            limit,
        }
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn last(&self) -> Option<ConditionalState> {
        self.stack.last().copied()
    }

    /// Open a block. Inside a skipped region the condition is not looked at.
    pub fn push_if(&mut self, condition: bool) -> Result<(), ConditionalError> {
        if self.stack.len() >= self.limit {
            return Err(ConditionalError::TooDeep(self.limit));
        }
        let state = if self.skipping() {
            ConditionalState::SkipUntilEndif
        } else if condition {
            ConditionalState::Active
        } else {
            ConditionalState::SkipUntilElse
        };
        self.stack.push(state);
        Ok(())
    }

    pub fn else_branch(&mut self) -> Result<(), ConditionalError> {
        let top = self
            .stack
            .last_mut()
            .ok_or(ConditionalError::ElseWithoutIf)?;
        *top = match *top {
            ConditionalState::Active => ConditionalState::SkipUntilEndif,
            ConditionalState::SkipUntilElse => ConditionalState::Active,
            ConditionalState::SkipUntilEndif => ConditionalState::SkipUntilEndif,
        };
        Ok(())
    }

    pub fn endif(&mut self) -> Result<(), ConditionalError> {
        self.stack
            .pop()
            .map(|_| ())
            .ok_or(ConditionalError::EndifWithoutIf)
    }

    pub fn skipping(&self) -> bool {
        self.stack
            .iter()
            .any(|state| *state != ConditionalState::Active)
    }
}

impl Default for ConditionalStack {
    fn default() -> Self {
        Self::new()
    }
}
