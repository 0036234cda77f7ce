// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand syntax of the 6809 family.

use crate::core::family::{strip_force, EncodeContext, Forced};
use crate::core::text_utils::split_last_comma;

use super::registers::accumulator_offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBase {
    X,
    Y,
    U,
    S,
    /// HD6309 only.
    W,
    /// `n,PC`: literal offset from the program counter.
    Pc,
    /// `label,PCR`: offset computed to reach `label`.
    Pcr,
}

/// Auto increment/decrement of the index register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    None,
    Inc1,
    Inc2,
    Dec1,
    Dec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOffset<'a> {
    None,
    /// Accumulator offset, holding the low nibble of the postbyte.
    Accumulator(u8),
    Expr {
        forced: Forced,
        text: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed<'a> {
    pub indirect: bool,
    pub offset: IndexOffset<'a>,
    pub base: IndexBase,
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Immediate(&'a str),
    /// Direct or extended address.
    Address { forced: Forced, text: &'a str },
    Indexed(Indexed<'a>),
    /// `[address]`, extended indirect.
    Indirect(&'a str),
}

/// Classify an operand field. `None` means the syntax matches no
/// addressing mode of the CPU.
pub fn parse_operand<'a>(
    field: &'a str,
    ctx: &EncodeContext<'_>,
    h6309: bool,
) -> Option<Operand<'a>> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    if let Some(imm) = field.strip_prefix('#') {
        return Some(Operand::Immediate(imm));
    }
    if let Some(inner) = field.strip_prefix('[') {
        let inner = inner.strip_suffix(']')?;
        if split_last_comma(inner).is_some() {
            return parse_indexed(inner, true, ctx, h6309).map(Operand::Indexed);
        }
        let (_, text) = strip_force(inner);
        return Some(Operand::Indirect(text));
    }
    if split_last_comma(field).is_some() {
        return parse_indexed(field, false, ctx, h6309).map(Operand::Indexed);
    }
    let (forced, text) = strip_force(field);
    Some(Operand::Address { forced, text })
}

fn parse_indexed<'a>(
    text: &'a str,
    indirect: bool,
    ctx: &EncodeContext<'_>,
    h6309: bool,
) -> Option<Indexed<'a>> {
    let (left, right) = split_last_comma(text)?;
    let right = right.trim();
    let (step, reg_text) = if let Some(r) = right.strip_prefix("--") {
        (Step::Dec2, r)
    } else if let Some(r) = right.strip_prefix('-') {
        (Step::Dec1, r)
    } else if let Some(r) = right.strip_suffix("++") {
        (Step::Inc2, r)
    } else if let Some(r) = right.strip_suffix('+') {
        (Step::Inc1, r)
    } else {
        (Step::None, right)
    };
    let base = match ctx.register_name(reg_text).as_str() {
        "X" => IndexBase::X,
        "Y" => IndexBase::Y,
        "U" => IndexBase::U,
        "S" => IndexBase::S,
        "W" if h6309 => IndexBase::W,
        "PC" => IndexBase::Pc,
        "PCR" => IndexBase::Pcr,
        _ => return None,
    };
    match (base, step) {
        (_, Step::None) => {}
        (IndexBase::Pc | IndexBase::Pcr, _) => return None,
        (IndexBase::W, Step::Inc1 | Step::Dec1) => return None,
        (_, Step::Inc1 | Step::Dec1) if indirect => return None,
        _ => {}
    }

    let left = left.trim();
    let mut offset = if left.is_empty() {
        IndexOffset::None
    } else if let Some(code) = accumulator_offset(&ctx.register_name(left), h6309) {
        IndexOffset::Accumulator(code)
    } else {
        let (forced, text) = strip_force(left);
        IndexOffset::Expr { forced, text }
    };

    if step != Step::None && offset != IndexOffset::None {
        match offset {
            IndexOffset::Expr {
                forced: Forced::Auto,
                text,
            } if ctx.options.strict && text.trim() == "0" => offset = IndexOffset::None,
            _ => return None,
        }
    }
    match (base, offset) {
        (IndexBase::Pc | IndexBase::Pcr, IndexOffset::None | IndexOffset::Accumulator(_)) => {
            return None
        }
        (IndexBase::W, IndexOffset::Accumulator(_)) => return None,
        _ => {}
    }
    Some(Indexed {
        indirect,
        offset,
        base,
        step,
    })
}
