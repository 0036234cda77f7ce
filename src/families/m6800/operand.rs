// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand syntax of the Motorola 6800 family.

use crate::core::family::{strip_force, Forced};
use crate::core::text_utils::split_last_comma;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexReg {
    X,
    /// 68HC11 only.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand<'a> {
    Immediate(&'a str),
    /// `offset,X`; an empty offset means zero.
    Indexed { index: IndexReg, offset: &'a str },
    Address { forced: Forced, text: &'a str },
}

pub fn index_register(name: &str, has_y: bool) -> Option<IndexReg> {
    match name.trim().to_ascii_uppercase().as_str() {
        "X" => Some(IndexReg::X),
        "Y" if has_y => Some(IndexReg::Y),
        _ => None,
    }
}

/// Classify an operand field; `None` for syntax no mode accepts.
pub fn parse_operand(field: &str, has_y: bool) -> Option<Operand<'_>> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    if let Some(text) = field.strip_prefix('#') {
        return Some(Operand::Immediate(text));
    }
    if let Some((offset, reg)) = split_last_comma(field) {
        let index = index_register(reg, has_y)?;
        let (_, offset) = strip_force(offset);
        return Some(Operand::Indexed {
            index,
            offset: offset.trim(),
        });
    }
    let (forced, text) = strip_force(field);
    Some(Operand::Address { forced, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_operands() {
        assert_eq!(parse_operand("#$10", false), Some(Operand::Immediate("$10")));
        assert_eq!(
            parse_operand(",X", false),
            Some(Operand::Indexed {
                index: IndexReg::X,
                offset: ""
            })
        );
        assert_eq!(parse_operand("4,Y", false), None);
        assert_eq!(
            parse_operand("4,y", true),
            Some(Operand::Indexed {
                index: IndexReg::Y,
                offset: "4"
            })
        );
        assert_eq!(
            parse_operand(">LABEL", false),
            Some(Operand::Address {
                forced: Forced::Extended,
                text: "LABEL"
            })
        );
        assert_eq!(parse_operand("1,S", false), None);
    }
}
