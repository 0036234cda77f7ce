// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Macro processor: MACRO/ENDM capture, `&` substitution, expansion and
//! DUP/ENDD repetition over the line arena.
//!
//! Bodies are not copied at definition time. A definition records where its
//! body starts in the arena and how many lines it has; invocation walks those
//! lines, substitutes parameters and text symbols, and evaluates the
//! conditionals of the body with a private stack so `EXITM` inside a
//! suppressed block is ignored.

use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;

use crate::core::assembler::conditional::{ConditionalDirective, ConditionalStack};
use crate::core::source::{LineArena, LineId};
use crate::core::text_utils::{operand_field, split_fields, split_top_level, Cursor};

/// Default cap on the number of macro definitions.
pub const MAX_MACROS: usize = 4096;
/// Maximum depth of macro invocations inside macro expansions.
pub const MAX_MACRO_DEPTH: u8 = 32;
/// Valid DUP repeat counts.
pub const DUP_RANGE: std::ops::RangeInclusive<i64> = 1..=255;
/// `&0` is the label, `&1`..`&9` the arguments.
const ARG_SLOTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("macro table full ({0} entries)")]
    TableFull(usize),
}

/// A captured macro body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroDef {
    pub first_line: Option<LineId>,
    pub count: usize,
    /// The body refers to `&0`, so the invocation label is not defined.
    pub uses_label: bool,
}

#[derive(Debug, Clone)]
pub struct MacroTable {
    macros: HashMap<String, MacroDef>,
    limit: usize,
    case_sensitive: bool,
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroTable {
    pub fn new() -> Self {
        Self::with_limit(MAX_MACROS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            macros: HashMap::new(),
            limit,
            case_sensitive: false,
        }
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    fn key<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if self.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_ascii_uppercase())
        }
    }

    pub fn define(&mut self, name: &str, def: MacroDef) -> Result<(), MacroError> {
        let key = self.key(name).into_owned();
        if !self.macros.contains_key(&key) && self.macros.len() >= self.limit {
            return Err(MacroError::TableFull(self.limit));
        }
        self.macros.insert(key, def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MacroDef> {
        self.macros.get(self.key(name).as_ref())
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// Text symbols defined with TEXT, substituted as `&name`.
#[derive(Debug, Clone, Default)]
pub struct TextSymbols {
    texts: HashMap<String, String>,
    case_sensitive: bool,
}

impl TextSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_ascii_uppercase()
        }
    }

    pub fn define(&mut self, name: &str, text: &str) {
        let key = self.key(name);
        self.texts.insert(key, text.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.texts.get(&self.key(name)).map(String::as_str)
    }
}

/// Positional parameters of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroArgs {
    slots: Vec<String>,
}

impl MacroArgs {
    /// Split the operand field of an invocation into `&1`..`&9`.
    pub fn new(label: Option<&str>, operand: &str) -> Self {
        let mut slots = vec![label.unwrap_or_default().to_string()];
        if !operand.trim().is_empty() {
            slots.extend(
                split_top_level(operand)
                    .into_iter()
                    .take(ARG_SLOTS - 1)
                    .map(|arg| arg.trim().to_string()),
            );
        }
        Self { slots }
    }

    /// Parameter `n`, empty when the call supplied fewer arguments.
    pub fn get(&self, n: usize) -> &str {
        self.slots.get(n).map(String::as_str).unwrap_or("")
    }
}

/// Result of substituting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted<'a> {
    pub text: Cow<'a, str>,
    /// An `&name` inside a macro body named no text symbol.
    pub undefined_text: bool,
}

/// Replace `&n` parameters (inside macros) and `&name` text symbols.
///
/// `\&` yields a literal `&`. Outside macros an `&` that names no text
/// symbol is left alone, since it is also the bitwise-and operator.
pub fn substitute<'a>(
    line: &'a str,
    args: Option<&MacroArgs>,
    texts: &TextSymbols,
) -> Substituted<'a> {
    if !line.contains('&') {
        return Substituted {
            text: Cow::Borrowed(line),
            undefined_text: false,
        };
    }
    let mut out = String::with_capacity(line.len() + 16);
    let mut undefined_text = false;
    let mut cur = Cursor::new(line);
    let mut copied = 0usize;
    while let Some(c) = cur.peek() {
        let at = cur.pos();
        if c == b'\\' && cur.peek_at(1) == Some(b'&') {
            out.push_str(&line[copied..at]);
            out.push('&');
            cur.set_pos(at + 2);
            copied = cur.pos();
            continue;
        }
        if c != b'&' {
            cur.next();
            continue;
        }
        cur.next();
        match cur.peek() {
            Some(d) if d.is_ascii_digit() && args.is_some() => {
                cur.next();
                out.push_str(&line[copied..at]);
                out.push_str(args.map_or("", |a| a.get((d - b'0') as usize)));
                copied = cur.pos();
            }
            _ => {
                let Some(name) = cur.take_ident(false) else {
                    continue;
                };
                if let Some(text) = texts.get(name) {
                    out.push_str(&line[copied..at]);
                    out.push_str(text);
                    copied = cur.pos();
                } else if args.is_some() {
                    undefined_text = true;
                }
            }
        }
    }
    if copied == 0 && out.is_empty() {
        return Substituted {
            text: Cow::Borrowed(line),
            undefined_text,
        };
    }
    out.push_str(&line[copied..]);
    Substituted {
        text: Cow::Owned(out),
        undefined_text,
    }
}

/// Lines between an opening directive and its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub first: Option<LineId>,
    pub count: usize,
    /// The terminating line; `None` when the source ran out first.
    pub end: Option<LineId>,
    /// An opener of the same kind appeared inside the body.
    pub nested: bool,
    pub uses_label: bool,
}

/// Collect the body following `start` up to a line whose mnemonic is one of
/// `terminators`. `openers` are the mnemonics that would nest.
pub fn capture_body(
    arena: &LineArena,
    start: LineId,
    openers: &[&str],
    terminators: &[&str],
) -> Capture {
    let mut capture = Capture {
        first: None,
        count: 0,
        end: None,
        nested: false,
        uses_label: false,
    };
    let mut cursor = arena.next(start);
    while let Some(id) = cursor {
        let text = &arena.get(id).text;
        let fields = split_fields(text);
        if let Some(mnemonic) = fields.mnemonic {
            if terminators.iter().any(|t| mnemonic.eq_ignore_ascii_case(t)) {
                capture.end = Some(id);
                return capture;
            }
            if openers.iter().any(|o| mnemonic.eq_ignore_ascii_case(o)) {
                capture.nested = true;
            }
        }
        capture.uses_label |= text.contains("&0");
        capture.first.get_or_insert(id);
        capture.count += 1;
        cursor = arena.next(id);
    }
    capture
}

/// Iterate the `count` lines starting at `first`.
pub fn body_lines(
    arena: &LineArena,
    first: Option<LineId>,
    count: usize,
) -> impl Iterator<Item = LineId> + '_ {
    std::iter::successors(first, move |id| arena.next(*id)).take(count)
}

/// Conditions inside macro bodies are evaluated by the assembler.
pub trait ConditionEvaluator {
    /// Truth value of an opening conditional directive's operand.
    fn condition(&mut self, directive: ConditionalDirective, operand: &str) -> bool;

    /// Value of a skip count; `None` when it cannot be evaluated.
    fn count(&mut self, text: &str) -> Option<i64>;
}

/// Lines produced by one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub lines: Vec<String>,
    pub undefined_text: bool,
    /// Unbalanced conditionals inside the body.
    pub nesting_error: bool,
}

/// Expand a macro body with `args`.
pub fn expand_macro(
    arena: &LineArena,
    def: &MacroDef,
    args: &MacroArgs,
    texts: &TextSymbols,
    strict: bool,
    evaluator: &mut dyn ConditionEvaluator,
) -> Expansion {
    let mut expansion = Expansion::default();
    let mut conditionals = ConditionalStack::new();
    let mut skip_lines = 0i64;
    let mut exited = false;
    for id in body_lines(arena, def.first_line, def.count) {
        let substituted = substitute(&arena.get(id).text, Some(args), texts);
        if skip_lines > 0 {
            skip_lines -= 1;
            continue;
        }
        let text = substituted.text;
        let fields = split_fields(&text);
        let mnemonic = fields.mnemonic.unwrap_or("");
        if let Some(directive) = ConditionalDirective::parse(mnemonic) {
            let operand = operand_field(fields.rest, strict);
            let skip_form = directive.skip_count(operand);
            let result = match (directive, skip_form) {
                (ConditionalDirective::Else, _) => conditionals.else_branch(),
                (ConditionalDirective::EndIf, _) => conditionals.endif(),
                (_, Some(_)) if conditionals.skipping() => Ok(()),
                _ if conditionals.skipping() => conditionals.push_if(false),
                (_, Some((condition, count))) => {
                    if !evaluator.condition(directive, condition) {
                        skip_lines = evaluator.count(count).unwrap_or(0).max(0);
                    }
                    Ok(())
                }
                (_, None) => {
                    let take = evaluator.condition(directive, operand);
                    conditionals.push_if(take)
                }
            };
            if result.is_err() {
                expansion.nesting_error = true;
            }
            continue;
        }
        if conditionals.skipping() {
            continue;
        }
        if mnemonic.eq_ignore_ascii_case("EXITM") {
            exited = true;
            break;
        }
        expansion.undefined_text |= substituted.undefined_text;
        expansion.lines.push(text.into_owned());
    }
    if !exited && !conditionals.is_empty() {
        expansion.nesting_error = true;
    }
    expansion
}

/// Texts of a DUP body repeated `times` times.
pub fn expand_dup(
    arena: &LineArena,
    first: Option<LineId>,
    count: usize,
    times: usize,
) -> Vec<String> {
    let body: Vec<&str> = body_lines(arena, first, count)
        .map(|id| arena.get(id).text.as_ref())
        .collect();
    let mut lines = Vec::with_capacity(body.len() * times);
    for _ in 0..times {
        lines.extend(body.iter().map(|line| line.to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{LineArena, LineFlags, SourceLine};

    struct FixedConditions;

    impl ConditionEvaluator for FixedConditions {
        fn condition(&mut self, directive: ConditionalDirective, operand: &str) -> bool {
            match directive {
                ConditionalDirective::IfSame => {
                    crate::core::assembler::conditional::strings_match(operand)
                }
                _ => operand.trim() != "0",
            }
        }

        fn count(&mut self, text: &str) -> Option<i64> {
            text.trim().parse().ok()
        }
    }

    fn arena_with(lines: &[&str]) -> (LineArena, LineId) {
        let mut arena = LineArena::new();
        let file = arena.add_file("test.asm");
        let mut first = None;
        for (idx, text) in lines.iter().enumerate() {
            let id = arena.push_back(SourceLine::new(
                text,
                file,
                idx as u32 + 1,
                0,
                LineFlags::empty(),
            ));
            first.get_or_insert(id);
        }
        (arena, first.expect("lines"))
    }

    fn define(arena: &LineArena, start: LineId) -> MacroDef {
        let capture = capture_body(arena, start, &["MACRO"], &["ENDM"]);
        assert!(capture.end.is_some());
        MacroDef {
            first_line: capture.first,
            count: capture.count,
            uses_label: capture.uses_label,
        }
    }

    fn expand(def: &MacroDef, arena: &LineArena, label: Option<&str>, operand: &str) -> Expansion {
        let args = MacroArgs::new(label, operand);
        expand_macro(arena, def, &args, &TextSymbols::new(), false, &mut FixedConditions)
    }

    #[test]
    fn substitutes_positional_parameters() {
        let (arena, start) = arena_with(&["MYMAC MACRO", " LDA &1", " ENDM"]);
        let def = define(&arena, start);
        assert_eq!(def.count, 1);
        assert!(!def.uses_label);
        assert_eq!(expand(&def, &arena, None, "#$20").lines, vec![" LDA #$20"]);
        assert_eq!(expand(&def, &arena, None, "").lines, vec![" LDA "]);
    }

    #[test]
    fn label_and_escape() {
        let (arena, start) = arena_with(&["M MACRO", "&0 EQU *", " FCC /\\&1/", " ENDM"]);
        let def = define(&arena, start);
        assert!(def.uses_label);
        let out = expand(&def, &arena, Some("HERE"), "X");
        assert_eq!(out.lines, vec!["HERE EQU *", " FCC /&1/"]);
    }

    #[test]
    fn text_symbols_and_undefined_names() {
        let mut texts = TextSymbols::new();
        texts.define("greeting", "HELLO");
        let plain = substitute(" FCC /&GREETING/", None, &texts);
        assert_eq!(plain.text, " FCC /HELLO/");
        let untouched = substitute(" LDA #X&Y", None, &texts);
        assert!(matches!(untouched.text, Cow::Borrowed(_)));
        assert!(!untouched.undefined_text);
        let args = MacroArgs::new(None, "");
        let inside = substitute(" LDA #X&Y", Some(&args), &texts);
        assert!(inside.undefined_text);
    }

    #[test]
    fn conditionals_and_exitm() {
        let (arena, start) = arena_with(&[
            "M MACRO",
            " IFC &1,STOP",
            " EXITM",
            " ENDIF",
            " IF 0",
            " EXITM",
            " ELSE",
            " NOP",
            " ENDIF",
            " RTS",
            " ENDM",
        ]);
        let def = define(&arena, start);
        assert_eq!(expand(&def, &arena, None, "STOP").lines.len(), 0);
        let out = expand(&def, &arena, None, "GO");
        assert_eq!(out.lines, vec![" NOP", " RTS"]);
        assert!(!out.nesting_error);
    }

    #[test]
    fn skip_count_form_and_unbalanced_body() {
        let (arena, start) = arena_with(&["M MACRO", " IF 0,2", " NOP", " NOP", " RTS", " ENDM"]);
        let def = define(&arena, start);
        assert_eq!(expand(&def, &arena, None, "").lines, vec![" RTS"]);

        let (arena, start) = arena_with(&["M MACRO", " IF 1", " NOP", " ENDM"]);
        let def = define(&arena, start);
        assert!(expand(&def, &arena, None, "").nesting_error);
    }

    #[test]
    fn skip_count_inside_suppressed_block_is_ignored() {
        let (arena, start) = arena_with(&[
            "M MACRO",
            " IF 0",
            " IF 1,1",
            " NOP",
            " ENDIF",
            " RTS",
            " ENDM",
        ]);
        let def = define(&arena, start);
        let out = expand(&def, &arena, None, "");
        assert_eq!(out.lines, vec![" RTS"]);
        assert!(!out.nesting_error);
    }

    #[test]
    fn dup_body_repeats() {
        let (arena, start) = arena_with(&[" DUP 3", " NOP", " DUP 2", " ENDD"]);
        let capture = capture_body(&arena, start, &["DUP"], &["ENDD"]);
        assert!(capture.nested);
        assert_eq!(capture.count, 2);
        let lines = expand_dup(&arena, capture.first, 1, 3);
        assert_eq!(lines, vec![" NOP", " NOP", " NOP"]);
    }

    #[test]
    fn table_is_capped() {
        let mut table = MacroTable::with_limit(1);
        let def = MacroDef {
            first_line: None,
            count: 0,
            uses_label: false,
        };
        table.define("a", def).expect("first");
        table.define("A", def).expect("redefinition");
        assert_eq!(table.define("b", def), Err(MacroError::TableFull(1)));
        assert!(table.get("a").is_some());
    }
}
