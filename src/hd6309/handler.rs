// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Hitachi HD6309 CPU handler implementation.

use crate::core::assembler::error::{ErrorFlags, WarningFlags};
use crate::core::cpu::CpuType;
use crate::core::family::{
    find_entry, strip_force, CpuHandler, EncodeContext, Forced, InsnClass, InstructionEntry,
};
use crate::core::text_utils::split_top_level;
use crate::families::m6809::registers::pair_code;
use crate::families::m6809::{
    encode_address, encode_instruction, parse_operand, AddressForms, Operand,
};
use crate::m6809::M6809CpuHandler;

use super::instructions::CPU_INSTRUCTION_TABLE;
use super::module::CPU_ID;

#[derive(Debug, Default)]
pub struct HD6309CpuHandler;

impl HD6309CpuHandler {
    pub fn new() -> Self {
        Self
    }
}

impl CpuHandler for HD6309CpuHandler {
    fn cpu(&self) -> CpuType {
        CPU_ID
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry> {
        find_entry(CPU_INSTRUCTION_TABLE, mnemonic)
            .or_else(|| M6809CpuHandler::lookup_entry(mnemonic))
    }

    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>) {
        match entry.class {
            InsnClass::BitMemory => encode_bit_memory(entry, operand, ctx),
            InsnClass::BitTransfer => encode_bit_transfer(entry, operand, ctx),
            InsnClass::BlockTransfer => encode_block_transfer(entry, operand, ctx),
            _ => encode_instruction(entry, operand, ctx, true),
        }
    }
}

/// `AIM #mask,address`
fn encode_bit_memory(entry: &InstructionEntry, field: &str, ctx: &mut EncodeContext<'_>) {
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
    let address = &field[parts[0].len() + 1..];
    let mask = ctx.eval_str(mask_text);
    let operand = match parse_operand(address, ctx, true) {
        Some(Operand::Immediate(_)) | None => {
            ctx.error(ErrorFlags::ADDRESSING_MODE);
            return;
        }
        Some(operand) => operand,
    };
    let forms = AddressForms {
        direct: Some(entry.opcode_at(0)),
        indexed: entry.opcode_at(0x60),
        extended: entry.opcode_at(0x70),
    };
    encode_address(ctx, &forms, operand, Some(&mask));
}

fn bit_register(name: &str) -> Option<u8> {
    match name {
        "CC" => Some(0),
        "A" => Some(1),
        "B" => Some(2),
        _ => None,
    }
}

fn bit_number(ctx: &mut EncodeContext<'_>, text: &str) -> u8 {
    let v = ctx.eval_str(text);
    if v.known() && !(0..=7).contains(&v.value) {
        ctx.error(ErrorFlags::RANGE);
    }
    (v.value & 7) as u8
}

/// Opcode followed by `operands` zero bytes, keeping the size of a
/// malformed instruction.
fn emit_placeholder(entry: &InstructionEntry, operands: usize, ctx: &mut EncodeContext<'_>) {
    ctx.error(ErrorFlags::ADDRESSING_MODE);
    ctx.emit_slice(entry.opcode);
    ctx.emit_slice(&[0; 2][..operands]);
}

/// `BAND reg,source_bit,dest_bit,direct`
fn encode_bit_transfer(entry: &InstructionEntry, field: &str, ctx: &mut EncodeContext<'_>) {
    let parts = split_top_level(field.trim());
    let [reg, src, dst, address] = parts.as_slice() else {
        return emit_placeholder(entry, 2, ctx);
    };
    let Some(reg) = bit_register(&ctx.register_name(reg)) else {
        return emit_placeholder(entry, 2, ctx);
    };
    let src = bit_number(ctx, src);
    let dst = bit_number(ctx, dst);
    let (forced, text) = strip_force(address);
    if forced == Forced::Extended || forced == Forced::Short {
        return emit_placeholder(entry, 2, ctx);
    }
    let v = ctx.eval_str(text);
    if v.known() && (v.word() >> 8) as u8 != ctx.dp {
        ctx.warn(WarningFlags::FORCED_TRUNCATION);
    }
    ctx.emit_slice(entry.opcode);
    ctx.emit(reg << 6 | src << 3 | dst);
    ctx.emit_direct(&v);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stride {
    Fixed,
    Up,
    Down,
}

fn block_register(ctx: &EncodeContext<'_>, text: &str) -> Option<(u8, Stride)> {
    let text = text.trim();
    let (name, stride) = if let Some(name) = text.strip_suffix('+') {
        (name, Stride::Up)
    } else if let Some(name) = text.strip_suffix('-') {
        (name, Stride::Down)
    } else {
        (text, Stride::Fixed)
    };
    match pair_code(&ctx.register_name(name), true) {
        Some((code, 2)) if code <= 4 => Some((code, stride)),
        _ => None,
    }
}

/// `TFM r0+,r1+` and the other three stride combinations.
fn encode_block_transfer(entry: &InstructionEntry, field: &str, ctx: &mut EncodeContext<'_>) {
    let parts = split_top_level(field.trim());
    let pair = match parts.as_slice() {
        [src, dst] => block_register(ctx, src).zip(block_register(ctx, dst)),
        _ => None,
    };
    let Some(((src, src_stride), (dst, dst_stride))) = pair else {
        return emit_placeholder(entry, 1, ctx);
    };
    let delta = match (src_stride, dst_stride) {
        (Stride::Up, Stride::Up) => 0,
        (Stride::Down, Stride::Down) => 1,
        (Stride::Up, Stride::Fixed) => 2,
        (Stride::Fixed, Stride::Up) => 3,
        _ => return emit_placeholder(entry, 1, ctx),
    };
    entry.opcode_at(delta).emit(ctx);
    ctx.emit(src << 4 | dst);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::options::AsmOptions;
    use crate::core::symbol_table::SymbolTable;

    fn encode_flags(line: &str) -> (Vec<u8>, ErrorFlags) {
        let mut symbols = SymbolTable::new();
        let options = AsmOptions {
            cpu: CPU_ID,
            ..AsmOptions::default()
        };
        let aliases = HashMap::new();
        let (mnemonic, operand) = line.split_once(' ').unwrap_or((line, ""));
        let handler = HD6309CpuHandler::new();
        let entry = handler.lookup(mnemonic).expect("mnemonic");
        let mut ctx = EncodeContext::new(&mut symbols, &options, &aliases, 0x2000, 2, 0);
        handler.encode(entry, operand.trim(), &mut ctx);
        (ctx.bytes, ctx.errors)
    }

    fn encode(line: &str) -> Vec<u8> {
        let (bytes, errors) = encode_flags(line);
        assert!(errors.is_empty(), "{line}: {errors:?}");
        bytes
    }

    #[test]
    fn extends_the_6809_set() {
        assert_eq!(encode("LDA #1"), vec![0x86, 0x01]);
        assert_eq!(encode("SEXW"), vec![0x14]);
        assert_eq!(encode("CLRD"), vec![0x10, 0x4F]);
        assert_eq!(encode("LDW #$1234"), vec![0x10, 0x86, 0x12, 0x34]);
        assert_eq!(encode("LDE $10"), vec![0x11, 0x96, 0x10]);
        assert_eq!(encode("DIVD #3"), vec![0x11, 0x8D, 0x03]);
        assert_eq!(
            encode("LDQ #$12345678"),
            vec![0xCD, 0x12, 0x34, 0x56, 0x78]
        );
        assert_eq!(encode("STQ $1234"), vec![0x10, 0xFD, 0x12, 0x34]);
    }

    #[test]
    fn register_pairs_allow_mixed_widths() {
        assert_eq!(encode("TFR A,W"), vec![0x1F, 0x86]);
        assert_eq!(encode("ADDR D,X"), vec![0x10, 0x30, 0x01]);
    }

    #[test]
    fn w_indexing() {
        assert_eq!(encode("LDA ,W"), vec![0xA6, 0x8F]);
        assert_eq!(encode("LDA ,W++"), vec![0xA6, 0xCF]);
    }

    #[test]
    fn bit_memory_forms() {
        assert_eq!(encode("AIM #$F0,$20"), vec![0x02, 0xF0, 0x20]);
        assert_eq!(encode("OIM #1,2,X"), vec![0x61, 0x01, 0x02]);
        assert_eq!(encode("TIM #$80,$1234"), vec![0x7B, 0x80, 0x12, 0x34]);
    }

    #[test]
    fn bit_transfer_postbyte() {
        assert_eq!(encode("BAND A,1,2,$40"), vec![0x11, 0x30, 0x4A, 0x40]);
        let (bytes, errors) = encode_flags("LDBT X,1,2,$40");
        assert!(errors.contains(ErrorFlags::ADDRESSING_MODE));
        assert_eq!(bytes.len(), 4);
        let (_, errors) = encode_flags("BOR B,8,0,$40");
        assert!(errors.contains(ErrorFlags::RANGE));
    }

    #[test]
    fn block_transfer_strides() {
        assert_eq!(encode("TFM X+,Y+"), vec![0x11, 0x38, 0x12]);
        assert_eq!(encode("TFM X-,Y-"), vec![0x11, 0x39, 0x12]);
        assert_eq!(encode("TFM D+,U"), vec![0x11, 0x3A, 0x03]);
        assert_eq!(encode("TFM S,X+"), vec![0x11, 0x3B, 0x41]);
        let (bytes, errors) = encode_flags("TFM X,Y");
        assert!(errors.contains(ErrorFlags::ADDRESSING_MODE));
        assert_eq!(bytes, vec![0x11, 0x38, 0x00]);
    }
}
