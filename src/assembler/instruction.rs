// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction lines: mnemonic resolution and dispatch to the active CPU.

use crate::core::family::InstructionEntry;

use super::*;

/// The 6800 spelling `LDA A #1`: an accumulator name standing alone
/// before the operand. Returns the register and the remaining text.
fn accumulator_form(rest: &str) -> Option<(char, &str)> {
    let mut chars = rest.chars();
    let reg = chars.next()?.to_ascii_uppercase();
    if reg != 'A' && reg != 'B' {
        return None;
    }
    let tail = chars.as_str();
    match tail.chars().next() {
        None => Some((reg, tail)),
        Some(c) if c.is_whitespace() => Some((reg, tail.trim_start())),
        Some(_) => None,
    }
}

/// Find the table entry for `mnemonic`, trying the accumulator-suffixed
/// form first. Returns the entry, the operand text and whether the split
/// spelling was used.
fn resolve_mnemonic<'r>(
    handler: &dyn CpuHandler,
    mnemonic: &str,
    rest: &'r str,
) -> Option<(&'static InstructionEntry, &'r str, bool)> {
    if let Some((reg, tail)) = accumulator_form(rest) {
        let joined = format!("{mnemonic}{reg}");
        if let Some(entry) = handler.lookup(&joined) {
            return Some((entry, tail, true));
        }
    }
    handler.lookup(mnemonic).map(|entry| (entry, rest, false))
}

impl Session<'_> {
    pub(super) fn instruction(&mut self, upper: &str, rest: &str, res: &mut LineResult) {
        let handler = Rc::clone(&self.handler);
        let Some((entry, tail, split)) = resolve_mnemonic(handler.as_ref(), upper, rest) else {
            res.errors |= ErrorFlags::ILLEGAL_MNEMONIC;
            res.detail = Some(upper.to_string());
            return;
        };
        if split && is_6809_family(self.options.cpu) {
            res.warnings |= WarningFlags::AMBIGUOUS_MNEMONIC;
        }
        let operand = operand_field(tail, self.options.strict);
        self.with_ctx(res, |ctx| handler.encode(entry, operand, ctx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_must_stand_alone() {
        assert_eq!(accumulator_form("A #1"), Some(('A', "#1")));
        assert_eq!(accumulator_form("b"), Some(('B', "")));
        assert_eq!(accumulator_form("A,X"), None);
        assert_eq!(accumulator_form("ADDR"), None);
        assert_eq!(accumulator_form(""), None);
    }

    #[test]
    fn split_spelling_resolves_on_6800() {
        let registry = build_default_registry();
        let cpu = registry.resolve_cpu_name("6800").expect("6800");
        let handler = registry.handler(cpu).expect("handler");
        let (entry, tail, split) =
            resolve_mnemonic(handler.as_ref(), "LDA", "A #1").expect("LDAA");
        assert_eq!(entry.mnemonic, "LDAA");
        assert_eq!(tail, "#1");
        assert!(split);
        assert!(resolve_mnemonic(handler.as_ref(), "XYZ", "").is_none());
    }

    #[test]
    fn register_operands_are_not_split_on_6809() {
        let registry = build_default_registry();
        let cpu = registry.resolve_cpu_name("6809").expect("6809");
        let handler = registry.handler(cpu).expect("handler");
        let (entry, tail, split) =
            resolve_mnemonic(handler.as_ref(), "TFR", "A,B").expect("TFR");
        assert_eq!(entry.mnemonic, "TFR");
        assert_eq!(tail, "A,B");
        assert!(!split);
    }
}
