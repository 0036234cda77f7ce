// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Class-driven encoding for instructions shared by the 6809 and HD6309.

use crate::core::assembler::error::ErrorFlags;
use crate::core::expr::Value;
use crate::core::family::{EncodeContext, InsnClass, InsnFlags, InstructionEntry, Opcode};
use crate::core::text_utils::split_top_level;

use super::indexed::encode_indexed;
use super::operand::{parse_operand, Operand};
use super::registers::{pair_code, stack_bit};

/// Opcodes of the memory-addressing forms of one instruction.
#[derive(Debug, Clone, Copy)]
pub struct AddressForms {
    pub direct: Option<Opcode>,
    pub indexed: Opcode,
    pub extended: Opcode,
}

/// Emit a memory operand. `lead` is an immediate byte placed between the
/// opcode and the address (the mask of AIM-style instructions).
pub fn encode_address(
    ctx: &mut EncodeContext<'_>,
    forms: &AddressForms,
    operand: Operand<'_>,
    lead: Option<&Value>,
) {
    match operand {
        Operand::Immediate(_) => ctx.error(ErrorFlags::ADDRESSING_MODE),
        Operand::Address { forced, text } => {
            let v = ctx.eval_str(text);
            match forms.direct {
                Some(direct) if ctx.wants_direct(&v, forced, true) => {
                    direct.emit(ctx);
                    emit_lead(ctx, lead);
                    ctx.emit_direct(&v);
                }
                direct => {
                    if direct.is_none() {
                        ctx.wants_direct(&v, forced, false);
                    }
                    forms.extended.emit(ctx);
                    emit_lead(ctx, lead);
                    ctx.emit_word_value(&v);
                }
            }
        }
        Operand::Indexed(ix) => {
            forms.indexed.emit(ctx);
            emit_lead(ctx, lead);
            encode_indexed(ctx, &ix);
        }
        Operand::Indirect(text) => {
            forms.indexed.emit(ctx);
            emit_lead(ctx, lead);
            ctx.emit(0x9F);
            let v = ctx.eval_str(text);
            ctx.emit_word_value(&v);
        }
    }
}

fn emit_lead(ctx: &mut EncodeContext<'_>, lead: Option<&Value>) {
    if let Some(value) = lead {
        ctx.emit_immediate8(value);
    }
}

/// Encode one instruction of the shared 6809/6309 classes.
pub fn encode_instruction(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    h6309: bool,
) {
    match entry.class {
        InsnClass::Inherent => ctx.emit_slice(entry.opcode),
        InsnClass::ImmediateByte => match field.trim().strip_prefix('#') {
            Some(text) => {
                ctx.emit_slice(entry.opcode);
                let v = ctx.eval_str(text);
                ctx.emit_immediate8(&v);
            }
            None => ctx.error(ErrorFlags::ADDRESSING_MODE),
        },
        InsnClass::Lea => match parse_operand(field, ctx, h6309) {
            Some(Operand::Indexed(ix)) => {
                ctx.emit_slice(entry.opcode);
                encode_indexed(ctx, &ix);
            }
            Some(Operand::Indirect(text)) => {
                ctx.emit_slice(entry.opcode);
                ctx.emit(0x9F);
                let v = ctx.eval_str(text);
                ctx.emit_word_value(&v);
            }
            _ => ctx.error(ErrorFlags::ADDRESSING_MODE),
        },
        InsnClass::ShortBranch => {
            let target = ctx.eval_str(field);
            ctx.emit_slice(entry.opcode);
            ctx.emit_relative(&target, entry.opcode.len() as u16 + 1, false);
        }
        InsnClass::LongBranch => {
            let target = ctx.eval_str(field);
            ctx.emit_slice(entry.opcode);
            ctx.emit_relative(&target, entry.opcode.len() as u16 + 2, true);
            ctx.hint_long_branch(&target);
        }
        InsnClass::Arith8 | InsnClass::Arith16 | InsnClass::Arith32 | InsnClass::Store => {
            encode_general(entry, field, ctx, h6309)
        }
        InsnClass::Memory => match parse_operand(field, ctx, h6309) {
            Some(Operand::Immediate(_)) | None => ctx.error(ErrorFlags::ADDRESSING_MODE),
            Some(operand) => {
                let forms = AddressForms {
                    direct: Some(entry.opcode_at(0)),
                    indexed: entry.opcode_at(0x60),
                    extended: entry.opcode_at(0x70),
                };
                encode_address(ctx, &forms, operand, None);
            }
        },
        InsnClass::StackList => encode_stack(entry, field, ctx),
        InsnClass::RegisterPair => encode_pair(entry, field, ctx, h6309),
        _ => ctx.error(ErrorFlags::ILLEGAL_MNEMONIC),
    }
}

fn encode_general(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    h6309: bool,
) {
    let Some(operand) = parse_operand(field, ctx, h6309) else {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        return;
    };
    if let Operand::Immediate(text) = operand {
        match entry.class {
            InsnClass::Arith8 => {
                entry.opcode_at(0).emit(ctx);
                let v = ctx.eval_str(text);
                ctx.emit_immediate8(&v);
            }
            InsnClass::Arith16 => {
                entry.opcode_at(0).emit(ctx);
                let v = ctx.eval_str(text);
                ctx.emit_immediate16(&v);
            }
            InsnClass::Arith32 => {
                // LDQ immediate has its own unprefixed opcode.
                ctx.emit(0xCD);
                let v = ctx.eval_str(text);
                ctx.emit_immediate32(&v);
            }
            _ => ctx.error(ErrorFlags::ADDRESSING_MODE),
        }
        return;
    }
    let forms = AddressForms {
        direct: (!entry.flags.contains(InsnFlags::NO_DIRECT)).then(|| entry.opcode_at(0x10)),
        indexed: entry.opcode_at(0x20),
        extended: entry.opcode_at(0x30),
    };
    encode_address(ctx, &forms, operand, None);
}

fn encode_stack(entry: &InstructionEntry, field: &str, ctx: &mut EncodeContext<'_>) {
    let stack = if entry.base() & 0x02 == 0 { "S" } else { "U" };
    let field = field.trim();
    ctx.emit_slice(entry.opcode);
    if let Some(text) = field.strip_prefix('#') {
        let v = ctx.eval_str(text);
        ctx.emit_immediate8(&v);
        return;
    }
    if field.is_empty() {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        ctx.emit(0);
        return;
    }
    let mut mask = 0u8;
    for part in split_top_level(field) {
        match stack_bit(&ctx.register_name(part), stack) {
            Some(bit) => mask |= bit,
            None => ctx.error(ErrorFlags::ADDRESSING_MODE),
        }
    }
    ctx.emit(mask);
}

fn encode_pair(
    entry: &InstructionEntry,
    field: &str,
    ctx: &mut EncodeContext<'_>,
    h6309: bool,
) {
    let parts = split_top_level(field.trim());
    let codes = match parts.as_slice() {
        [src, dst] => (
            pair_code(&ctx.register_name(src), h6309),
            pair_code(&ctx.register_name(dst), h6309),
        ),
        _ => (None, None),
    };
    let (Some((src, src_width)), Some((dst, dst_width))) = codes else {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
        ctx.emit_slice(entry.opcode);
        ctx.emit(0);
        return;
    };
    if !h6309 && src_width != dst_width {
        ctx.error(ErrorFlags::ADDRESSING_MODE);
    }
    ctx.emit_slice(entry.opcode);
    ctx.emit(src << 4 | dst);
}
