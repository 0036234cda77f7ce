// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Shared text utilities for line splitting and operand scanning.

/// Check if a byte is a valid identifier start character.
#[inline]
pub fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'.'
}

/// Check if a byte is a valid identifier continuation character.
///
/// `$` is only part of an identifier in GNU-compatible syntax.
#[inline]
pub fn is_ident_char(c: u8, gnu: bool) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || (gnu && c == b'$')
}

/// Check if a byte is whitespace (space or tab).
#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Skip a quoted item starting at `idx` and return the index after it.
///
/// A single quote introduces a character constant (`'c` with an optional
/// closing quote). A double quote runs to the matching double quote.
fn skip_quoted(bytes: &[u8], idx: usize) -> usize {
    match bytes[idx] {
        b'\'' => {
            let mut end = (idx + 2).min(bytes.len());
            if bytes.get(end) == Some(&b'\'') {
                end += 1;
            }
            end
        }
        b'"' => {
            let mut end = idx + 1;
            while end < bytes.len() && bytes[end] != b'"' {
                end += 1;
            }
            (end + 1).min(bytes.len())
        }
        _ => idx + 1,
    }
}

/// Label, mnemonic and the raw remainder of one source line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub label: Option<&'a str>,
    pub mnemonic: Option<&'a str>,
    pub rest: &'a str,
}

/// Split a source line into its label, mnemonic and remainder.
///
/// A label starts in column one, or is any leading token ending in `:`.
/// Full-line comments (`*` or `;` in column one) produce empty fields.
pub fn split_fields(line: &str) -> LineFields<'_> {
    let bytes = line.as_bytes();
    let mut fields = LineFields::default();
    match bytes.first() {
        None => return fields,
        Some(b'*') | Some(b';') => return fields,
        _ => {}
    }

    let mut idx = 0usize;
    if !is_space(bytes[0]) {
        while idx < bytes.len() && !is_space(bytes[idx]) && bytes[idx] != b':' && bytes[idx] != b'='
        {
            idx += 1;
        }
        fields.label = Some(&line[..idx]);
        if bytes.get(idx) == Some(&b':') {
            idx += 1;
        }
    }

    while idx < bytes.len() && is_space(bytes[idx]) {
        idx += 1;
    }
    if idx >= bytes.len() || bytes[idx] == b';' {
        return fields;
    }

    let start = idx;
    if bytes[idx] == b'=' {
        idx += 1;
    } else {
        while idx < bytes.len() && !is_space(bytes[idx]) {
            idx += 1;
        }
    }
    let mut mnemonic = &line[start..idx];
    if fields.label.is_none() && mnemonic.len() > 1 && mnemonic.ends_with(':') {
        fields.label = Some(&mnemonic[..mnemonic.len() - 1]);
        while idx < bytes.len() && is_space(bytes[idx]) {
            idx += 1;
        }
        let start = idx;
        while idx < bytes.len() && !is_space(bytes[idx]) {
            idx += 1;
        }
        mnemonic = &line[start..idx];
    }
    if !mnemonic.is_empty() {
        fields.mnemonic = Some(mnemonic);
    }
    while idx < bytes.len() && is_space(bytes[idx]) {
        idx += 1;
    }
    fields.rest = &line[idx..];
    fields
}

/// Cut the operand field out of the text following the mnemonic.
///
/// The field ends at an unquoted `;`, or at whitespace. Outside strict mode
/// whitespace inside parentheses or brackets does not end the field.
pub fn operand_field(rest: &str, strict: bool) -> &str {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\'' | b'"' => {
                idx = skip_quoted(bytes, idx);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b';' => break,
            c if is_space(c) && (strict || depth == 0) => break,
            _ => {}
        }
        idx += 1;
    }
    &rest[..idx]
}

/// Split a field at commas that are not inside quotes or parentheses.
pub fn split_top_level(field: &str) -> Vec<&str> {
    let bytes = field.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\'' | b'"' => {
                idx = skip_quoted(bytes, idx);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&field[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    parts.push(&field[start..]);
    parts
}

/// Split at the last top-level comma, returning `(offset, register)`.
pub fn split_last_comma(field: &str) -> Option<(&str, &str)> {
    let parts = split_top_level(field);
    if parts.len() < 2 {
        return None;
    }
    let right = parts[parts.len() - 1];
    let left = &field[..field.len() - right.len() - 1];
    Some((left, right))
}

/// A simple cursor for scanning text byte-by-byte.
pub struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the input.
    pub fn new(input: &'a str) -> Self {
        Self {
            text: input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }

    /// Skip spaces and tabs.
    pub fn skip_ws(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Peek at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Peek `offset` bytes ahead of the current position.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consume and return the current byte.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume `c` if it is the next byte.
    pub fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds and return them.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// Try to consume an identifier, returning it if found.
    pub fn take_ident(&mut self, gnu: bool) -> Option<&'a str> {
        let first = self.peek()?;
        if !is_ident_start(first) {
            return None;
        }
        let start = self.pos;
        self.pos += 1;
        while self.peek().is_some_and(|c| is_ident_char(c, gnu)) {
            self.pos += 1;
        }
        Some(&self.text[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ident_char() {
        assert!(is_ident_start(b'_'));
        assert!(!is_ident_start(b'0'));
        assert!(is_ident_char(b'0', false));
        assert!(!is_ident_char(b'$', false));
        assert!(is_ident_char(b'$', true));
        assert!(!is_ident_char(b' ', true));
    }

    #[test]
    fn split_fields_handles_label_column() {
        let f = split_fields("START LDA #1  load");
        assert_eq!(f.label, Some("START"));
        assert_eq!(f.mnemonic, Some("LDA"));
        assert_eq!(f.rest, "#1  load");

        let f = split_fields("  rts");
        assert_eq!(f.label, None);
        assert_eq!(f.mnemonic, Some("rts"));

        let f = split_fields("loop: bra loop");
        assert_eq!(f.label, Some("loop"));
        assert_eq!(f.mnemonic, Some("bra"));

        let f = split_fields(" done: nop");
        assert_eq!(f.label, Some("done"));
        assert_eq!(f.mnemonic, Some("nop"));
    }

    #[test]
    fn split_fields_skips_comment_lines() {
        assert_eq!(split_fields("* a comment"), LineFields::default());
        assert_eq!(split_fields("; another"), LineFields::default());
        assert_eq!(split_fields(""), LineFields::default());
        let f = split_fields("  ; indented comment");
        assert_eq!(f.mnemonic, None);
    }

    #[test]
    fn split_fields_accepts_equals_without_spaces() {
        let f = split_fields("SIZE=10");
        assert_eq!(f.label, Some("SIZE"));
        assert_eq!(f.mnemonic, Some("="));
        assert_eq!(f.rest, "10");
    }

    #[test]
    fn operand_field_stops_at_whitespace_and_comment() {
        assert_eq!(operand_field("#1 comment", false), "#1");
        assert_eq!(operand_field("5,X;c", false), "5,X");
        assert_eq!(operand_field("(1 + 2)*3 rest", false), "(1 + 2)*3");
        assert_eq!(operand_field("(1 + 2)*3 rest", true), "(1");
        assert_eq!(operand_field("#'  x", false), "#' ");
        assert_eq!(operand_field("#'; x", false), "#';");
    }

    #[test]
    fn split_top_level_respects_quotes_and_parens() {
        assert_eq!(split_top_level("1,(2,3),','"), vec!["1", "(2,3)", "','"]);
        assert_eq!(split_last_comma("[5,X]"), None);
        assert_eq!(split_last_comma("A,X"), Some(("A", "X")));
        assert_eq!(split_last_comma(",--S"), Some(("", "--S")));
    }

    #[test]
    fn test_cursor_take_ident() {
        let mut cursor = Cursor::new("  foo bar$x");
        cursor.skip_ws();
        assert_eq!(cursor.take_ident(false), Some("foo"));
        cursor.skip_ws();
        assert_eq!(cursor.take_ident(false), Some("bar"));
        assert_eq!(cursor.rest(), "$x");
    }
}
