// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Indexed-mode postbyte encoding.

use crate::core::assembler::error::{ErrorFlags, WarningFlags};
use crate::core::expr::Value;
use crate::core::family::{EncodeContext, Forced};

use super::operand::{IndexBase, IndexOffset, Indexed, Step};

const INDIRECT: u8 = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetSize {
    Zero,
    Five,
    Eight,
    Sixteen,
}

fn offset_size(
    ctx: &mut EncodeContext<'_>,
    v: &Value,
    forced: Forced,
    indirect: bool,
) -> OffsetSize {
    match forced {
        Forced::Short if !indirect => {
            if ctx.relocatable(v) {
                ctx.error(ErrorFlags::RELOCATION_MODE);
            }
            if v.known() && !(-16..=15).contains(&v.value) {
                ctx.warn(WarningFlags::FORCED_TRUNCATION);
            }
            OffsetSize::Five
        }
        Forced::Short | Forced::Direct => {
            if forced == Forced::Short {
                ctx.warn(WarningFlags::ILLOGICAL_FORCE);
            }
            if v.known() && !(-128..=127).contains(&v.value) {
                ctx.warn(WarningFlags::FORCED_TRUNCATION);
            }
            OffsetSize::Eight
        }
        Forced::Extended => OffsetSize::Sixteen,
        Forced::Auto => {
            if v.unknown || !v.certain || ctx.relocatable(v) {
                OffsetSize::Sixteen
            } else if v.value == 0 {
                OffsetSize::Zero
            } else if !indirect && (-16..=15).contains(&v.value) {
                OffsetSize::Five
            } else if (-128..=127).contains(&v.value) {
                OffsetSize::Eight
            } else {
                OffsetSize::Sixteen
            }
        }
    }
}

/// Emit the postbyte and offset bytes of an indexed operand.
///
/// The opcode (and any operand byte that precedes the postbyte) must already
/// be in `ctx`; PC-relative offsets are measured from the instruction end.
pub fn encode_indexed(ctx: &mut EncodeContext<'_>, ix: &Indexed<'_>) {
    let ind = if ix.indirect { INDIRECT } else { 0 };
    let rr = match ix.base {
        IndexBase::X => 0x00,
        IndexBase::Y => 0x20,
        IndexBase::U => 0x40,
        IndexBase::S => 0x60,
        IndexBase::W => return encode_w(ctx, ix),
        IndexBase::Pc | IndexBase::Pcr => return encode_pc(ctx, ix),
    };
    match ix.offset {
        IndexOffset::None => {
            let mode = match ix.step {
                Step::None => 0x84,
                Step::Inc1 => 0x80,
                Step::Inc2 => 0x81,
                Step::Dec1 => 0x82,
                Step::Dec2 => 0x83,
            };
            ctx.emit(mode | rr | ind);
        }
        IndexOffset::Accumulator(code) => ctx.emit(0x80 | rr | ind | code),
        IndexOffset::Expr { forced, text } => {
            let v = ctx.eval_str(text);
            match offset_size(ctx, &v, forced, ix.indirect) {
                OffsetSize::Zero => ctx.emit(0x84 | rr | ind),
                OffsetSize::Five => ctx.emit(rr | (v.value as u8 & 0x1F)),
                OffsetSize::Eight => {
                    ctx.emit(0x88 | rr | ind);
                    ctx.emit_byte_value(&v);
                }
                OffsetSize::Sixteen => {
                    ctx.emit(0x89 | rr | ind);
                    ctx.emit_word_value(&v);
                }
            }
        }
    }
}

fn encode_w(ctx: &mut EncodeContext<'_>, ix: &Indexed<'_>) {
    let (plain, wrapped) = match (ix.offset, ix.step) {
        (IndexOffset::None, Step::None) => (0x8F, 0x90),
        (IndexOffset::None, Step::Inc2) => (0xCF, 0xD0),
        (IndexOffset::None, Step::Dec2) => (0xEF, 0xF0),
        (IndexOffset::Expr { forced, text }, Step::None) => {
            let v = ctx.eval_str(text);
            if matches!(forced, Forced::Short | Forced::Direct) {
                ctx.warn(WarningFlags::ILLOGICAL_FORCE);
            }
            let zero = forced == Forced::Auto
                && v.known()
                && v.certain
                && v.value == 0
                && !ctx.relocatable(&v);
            if zero {
                ctx.emit(if ix.indirect { 0x90 } else { 0x8F });
            } else {
                ctx.emit(if ix.indirect { 0xB0 } else { 0xAF });
                ctx.emit_word_value(&v);
            }
            return;
        }
        _ => {
            ctx.error(ErrorFlags::ADDRESSING_MODE);
            return;
        }
    };
    ctx.emit(if ix.indirect { wrapped } else { plain });
}

fn encode_pc(ctx: &mut EncodeContext<'_>, ix: &Indexed<'_>) {
    let IndexOffset::Expr { forced, text } = ix.offset else {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        return;
    };
    let ind = if ix.indirect { INDIRECT } else { 0 };
    let v = ctx.eval_str(text);
    let before = ctx.bytes.len() as u16;
    if forced == Forced::Short {
        ctx.warn(WarningFlags::ILLOGICAL_FORCE);
    }

    if ix.base == IndexBase::Pc {
        let long = match forced {
            Forced::Direct => false,
            Forced::Extended => true,
            _ => {
                v.unknown || !v.certain || ctx.relocatable(&v) || !(-128..=127).contains(&v.value)
            }
        };
        if long {
            ctx.emit(0x8D | ind);
            ctx.emit_word_value(&v);
        } else {
            ctx.emit(0x8C | ind);
            ctx.emit_byte_value(&v);
        }
        return;
    }

    let long = if ctx.options.relocatable && v.is_external() {
        true
    } else {
        match forced {
            Forced::Direct => false,
            Forced::Extended => true,
            _ => {
                let short_end = ctx.pc.wrapping_add(before + 2) as i64;
                v.unknown || !v.certain || !(-128..=127).contains(&(v.value - short_end))
            }
        }
    };
    if long {
        ctx.emit(0x8D | ind);
        ctx.emit_relative(&v, before + 3, true);
    } else {
        ctx.emit(0x8C | ind);
        ctx.emit_relative(&v, before + 2, false);
    }
}
