// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 family handler implementation.

use crate::core::assembler::error::ErrorFlags;
use crate::core::expr::Value;
use crate::core::family::{EncodeContext, Forced, InsnClass, InsnFlags, InstructionEntry, Opcode};
use crate::core::text_utils::split_top_level;

use super::operand::{parse_operand, IndexReg, Operand};

/// Members of the family, used where encodings diverge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum M6800Variant {
    M6800,
    M6801,
    HD6301,
    M68HC11,
}

impl M6800Variant {
    pub fn has_y(self) -> bool {
        self == Self::M68HC11
    }
}

/// Indexed opcode with the 68HC11 page prefix for the index register used.
///
/// Page 18 instructions switch to page 1A when indexed by X; Y indexing
/// selects page CD for the X-register and page 1A instructions, page 18
/// for everything else.
fn indexed_opcode(entry: &InstructionEntry, delta: u8, index: IndexReg) -> Opcode {
    let op = entry.opcode_at(delta);
    let prefix: &'static [u8] = match index {
        IndexReg::Y
            if entry.flags.contains(InsnFlags::ALT_CD) || matches!(op.prefix, [0x1A]) =>
        {
            &[0xCD]
        }
        IndexReg::Y => &[0x18],
        IndexReg::X if matches!(op.prefix, [0x18]) => &[0x1A],
        IndexReg::X => op.prefix,
    };
    Opcode {
        prefix,
        byte: op.byte,
    }
}

/// Unsigned 8-bit index offset; an empty offset is zero.
fn emit_index_offset(ctx: &mut EncodeContext<'_>, text: &str) {
    let v = if text.is_empty() {
        Value::constant(0)
    } else {
        ctx.eval_str(text)
    };
    if ctx.final_pass() && v.known() && !ctx.relocatable(&v) && !(0..=0xFF).contains(&v.value) {
        ctx.error(ErrorFlags::RANGE);
    }
    ctx.emit_byte_value(&v);
}

/// Address of an instruction that only has a direct-page form.
fn emit_direct_only(ctx: &mut EncodeContext<'_>, forced: Forced, text: &str) {
    if forced == Forced::Extended {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
    }
    let v = ctx.eval_str(text);
    if ctx.final_pass() && v.known() && !ctx.relocatable(&v) && !(0..=0xFF).contains(&v.value) {
        ctx.error(ErrorFlags::RANGE);
    }
    ctx.emit_direct(&v);
}

/// Encode one instruction of the 6800 family classes.
pub fn encode_instruction(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    variant: M6800Variant,
) {
    let has_y = variant.has_y();
    match entry.class {
        InsnClass::Inherent => ctx.emit_slice(entry.opcode),
        InsnClass::ShortBranch => {
            let target = ctx.eval_str(field);
            ctx.emit_slice(entry.opcode);
            ctx.emit_relative(&target, entry.opcode.len() as u16 + 1, false);
        }
        InsnClass::Arith8 | InsnClass::Arith16 | InsnClass::Store => {
            encode_general(entry, field, ctx, has_y)
        }
        InsnClass::MemoryIndexed => match parse_operand(field, has_y) {
            Some(Operand::Indexed { index, offset }) => {
                indexed_opcode(entry, 0, index).emit(ctx);
                emit_index_offset(ctx, offset);
            }
            Some(Operand::Address { forced, text }) => {
                let v = ctx.eval_str(text);
                ctx.wants_direct(&v, forced, false);
                entry.opcode_at(0x10).emit(ctx);
                ctx.emit_word_value(&v);
            }
            Some(Operand::Immediate(_)) | None => ctx.error(ErrorFlags::ADDRESSING_MODE),
        },
        InsnClass::BitIndexed => encode_bit_indexed(entry, field, ctx),
        InsnClass::BitSetClear => encode_bit_set(entry, field, ctx, false),
        InsnClass::BitBranch => encode_bit_set(entry, field, ctx, true),
        _ => ctx.error(ErrorFlags::ILLEGAL_MNEMONIC),
    }
}

fn encode_general(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    has_y: bool,
) {
    match parse_operand(field, has_y) {
        None => ctx.error(ErrorFlags::ADDRESSING_MODE),
        Some(Operand::Immediate(text)) => {
            if entry.class == InsnClass::Store {
                ctx.error(ErrorFlags::ADDRESSING_MODE);
                return;
            }
            entry.opcode_at(0).emit(ctx);
            let v = ctx.eval_str(text);
            if entry.class == InsnClass::Arith8 {
                ctx.emit_immediate8(&v);
            } else {
                ctx.emit_immediate16(&v);
            }
        }
        Some(Operand::Indexed { index, offset }) => {
            indexed_opcode(entry, 0x20, index).emit(ctx);
            emit_index_offset(ctx, offset);
        }
        Some(Operand::Address { forced, text }) => {
            let v = ctx.eval_str(text);
            let direct = !entry.flags.contains(InsnFlags::NO_DIRECT);
            if ctx.wants_direct(&v, forced, direct) {
                entry.opcode_at(0x10).emit(ctx);
                ctx.emit_direct(&v);
            } else {
                entry.opcode_at(0x30).emit(ctx);
                ctx.emit_word_value(&v);
            }
        }
    }
}

/// HD6301 `AIM #mask,address` and `AIM #mask,offset,X`.
fn encode_bit_indexed(entry: &InstructionEntry, field: &str, ctx: &mut EncodeContext<'_>) {
    let field = field.trim();
    let parts = split_top_level(field);
    let Some(mask_text) = parts.first().and_then(|m| m.trim().strip_prefix('#')) else {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        return;
    };
    if parts.len() < 2 {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        return;
    }
    let mask = ctx.eval_str(mask_text);
    match parse_operand(&field[parts[0].len() + 1..], false) {
        Some(Operand::Indexed { index, offset }) => {
            indexed_opcode(entry, 0, index).emit(ctx);
            ctx.emit_immediate8(&mask);
            emit_index_offset(ctx, offset);
        }
        Some(Operand::Address { forced, text }) => {
            entry.opcode_at(0x10).emit(ctx);
            ctx.emit_immediate8(&mask);
            emit_direct_only(ctx, forced, text);
        }
        Some(Operand::Immediate(_)) | None => ctx.error(ErrorFlags::ADDRESSING_MODE),
    }
}

/// 68HC11 `BSET address,#mask` and `BRSET address,#mask,target`, with
/// `offset,X` or `offset,Y` allowed for the address.
fn encode_bit_set(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    branch: bool,
) {
    let field = field.trim();
    let mut parts = split_top_level(field);
    let target = if branch { parts.pop() } else { None };
    let mask_text = parts.pop();
    let Some(mask_text) = mask_text.filter(|_| !parts.is_empty()) else {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        return;
    };
    let address_len = parts.iter().map(|p| p.len() + 1).sum::<usize>() - 1;
    let address = &field[..address_len];
    let mask_text = mask_text.trim();
    let mask_text = mask_text.strip_prefix('#').unwrap_or(mask_text);
    let mask = ctx.eval_str(mask_text);
    let target = target.map(|t| ctx.eval_str(t));
    match parse_operand(address, true) {
        Some(Operand::Indexed { index, offset }) => {
            let delta = if branch { 0x0C } else { 0x08 };
            indexed_opcode(entry, delta, index).emit(ctx);
            emit_index_offset(ctx, offset);
        }
        Some(Operand::Address { forced, text }) => {
            entry.opcode_at(0).emit(ctx);
            emit_direct_only(ctx, forced, text);
        }
        Some(Operand::Immediate(_)) | None => {
            ctx.error(ErrorFlags::ADDRESSING_MODE);
            return;
        }
    }
    ctx.emit_immediate8(&mask);
    if let Some(target) = target {
        let len = ctx.bytes.len() as u16 + 1;
        ctx.emit_relative(&target, len, false);
    }
}
