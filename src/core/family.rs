// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction encoding framework shared by every CPU.
//!
//! A CPU is a [`CpuHandler`]: a mnemonic table plus an encoder that turns an
//! operand field into bytes. The handler writes into an [`EncodeContext`],
//! which evaluates expressions, collects bytes and relocation requests, and
//! records per-line errors and warnings.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::core::assembler::error::{ErrorFlags, WarningFlags};
use crate::core::cpu::CpuType;
use crate::core::expr::{
    value_fits_byte, value_fits_word, EvalEnv, Evaluator, ExprCategory, ExprError, Value,
};
use crate::core::options::AsmOptions;
use crate::core::symbol_table::{SymbolId, SymbolTable};
use crate::core::text_utils::Cursor;

/// Operand shape of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsnClass {
    /// No operand; the opcode bytes are the whole instruction.
    Inherent,
    /// `#imm8` only (ANDCC, CWAI, LDMD).
    ImmediateByte,
    /// Indexed addressing only (LEAX).
    Lea,
    ShortBranch,
    LongBranch,
    /// Immediate with an 8-bit operand, direct at +0x10, indexed at +0x20,
    /// extended at +0x30.
    Arith8,
    /// As [`InsnClass::Arith8`] with a 16-bit immediate.
    Arith16,
    /// As [`InsnClass::Arith8`] with a 32-bit immediate (LDQ).
    Arith32,
    /// Memory access without an immediate form (STA, JSR).
    Store,
    /// Read-modify-write: direct at the base opcode, indexed +0x60,
    /// extended +0x70.
    Memory,
    /// 6800 read-modify-write: indexed at the base opcode, extended +0x10.
    MemoryIndexed,
    /// Register list postbyte (PSHS).
    StackList,
    /// Register pair postbyte (TFR, EXG, ADDR).
    RegisterPair,
    /// `#imm,address` with direct base opcode (6309 AIM).
    BitMemory,
    /// `#imm,address` with indexed base opcode, direct +0x10 (6301 AIM).
    BitIndexed,
    /// `reg,srcbit,dstbit,direct` (6309 BAND).
    BitTransfer,
    /// `r+,r+` style block moves (6309 TFM).
    BlockTransfer,
    /// `address,#mask` (68HC11 BSET).
    BitSetClear,
    /// `address,#mask,target` (68HC11 BRSET).
    BitBranch,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InsnFlags: u8 {
        /// No direct-page form exists.
        const NO_DIRECT = 0x01;
        /// 68HC11: the Y-indexed form uses the 0xCD prefix.
        const ALT_CD = 0x02;
    }
}

/// One mnemonic of a CPU instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionEntry {
    pub mnemonic: &'static str,
    pub class: InsnClass,
    pub opcode: &'static [u8],
    pub flags: InsnFlags,
}

impl InstructionEntry {
    pub const fn new(mnemonic: &'static str, class: InsnClass, opcode: &'static [u8]) -> Self {
        Self {
            mnemonic,
            class,
            opcode,
            flags: InsnFlags::empty(),
        }
    }

    pub const fn with_flags(mut self, flags: InsnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Page prefix bytes, everything but the last opcode byte.
    pub fn prefix(&self) -> &'static [u8] {
        &self.opcode[..self.opcode.len().saturating_sub(1)]
    }

    /// Last opcode byte.
    pub fn base(&self) -> u8 {
        self.opcode.last().copied().unwrap_or(0)
    }
}

/// An opcode as emitted: page prefix bytes plus the final opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub prefix: &'static [u8],
    pub byte: u8,
}

impl Opcode {
    pub fn len(&self) -> usize {
        self.prefix.len() + 1
    }

    pub fn emit(&self, ctx: &mut EncodeContext<'_>) {
        ctx.emit_slice(self.prefix);
        ctx.emit(self.byte);
    }
}

impl InstructionEntry {
    /// Opcode for the mode found `delta` above the base opcode.
    pub fn opcode_at(&self, delta: u8) -> Opcode {
        Opcode {
            prefix: self.prefix(),
            byte: self.base().wrapping_add(delta),
        }
    }
}

/// Case-insensitive table lookup.
pub fn find_entry(
    table: &'static [InstructionEntry],
    mnemonic: &str,
) -> Option<&'static InstructionEntry> {
    table
        .iter()
        .find(|entry| entry.mnemonic.eq_ignore_ascii_case(mnemonic))
}

/// Width forcing prefix on an address operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forced {
    Auto,
    /// `<`: direct page or 8-bit offset.
    Direct,
    /// `<<`: 5-bit indexed offset.
    Short,
    /// `>`: extended address or 16-bit offset.
    Extended,
}

/// Split a leading `<<`, `<` or `>` prefix off an operand.
pub fn strip_force(text: &str) -> (Forced, &str) {
    let text = text.trim_start();
    if let Some(rest) = text.strip_prefix("<<") {
        (Forced::Short, rest)
    } else if let Some(rest) = text.strip_prefix('<') {
        (Forced::Direct, rest)
    } else if let Some(rest) = text.strip_prefix('>') {
        (Forced::Extended, rest)
    } else {
        (Forced::Auto, text)
    }
}

/// A relocation requested for the byte at `offset` of the line's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRelocation {
    pub offset: usize,
    pub category: ExprCategory,
    pub symbol: Option<SymbolId>,
}

/// Per-line encoding state handed to CPU handlers and data directives.
pub struct EncodeContext<'a> {
    pub symbols: &'a mut SymbolTable,
    pub options: &'a AsmOptions,
    pub aliases: &'a HashMap<String, String>,
    /// Logical address of the first byte of this line.
    pub pc: u16,
    pub pass: u8,
    pub dp: u8,
    pub bytes: Vec<u8>,
    pub relocations: Vec<PendingRelocation>,
    pub errors: ErrorFlags,
    pub warnings: WarningFlags,
    pub undefined: Option<String>,
    /// Set when the symbol table overflowed; the run has to stop.
    pub table_full: Option<usize>,
}

impl<'a> EncodeContext<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        options: &'a AsmOptions,
        aliases: &'a HashMap<String, String>,
        pc: u16,
        pass: u8,
        dp: u8,
    ) -> Self {
        Self {
            symbols,
            options,
            aliases,
            pc,
            pass,
            dp,
            bytes: Vec::new(),
            relocations: Vec::new(),
            errors: ErrorFlags::empty(),
            warnings: WarningFlags::empty(),
            undefined: None,
            table_full: None,
        }
    }

    pub fn final_pass(&self) -> bool {
        self.pass >= 2
    }

    pub fn error(&mut self, flag: ErrorFlags) {
        self.errors |= flag;
    }

    pub fn warn(&mut self, flag: WarningFlags) {
        self.warnings |= flag;
    }

    fn env(&self) -> EvalEnv {
        EvalEnv {
            pc: self.pc,
            gnu: self.options.gnu,
        }
    }

    fn note_value(&mut self, value: &Value) {
        if value.unknown && self.final_pass() {
            self.errors |= ErrorFlags::UNDEFINED;
            if self.undefined.is_none() {
                self.undefined = value.undefined.clone();
            }
        }
    }

    fn note_error(&mut self, err: ExprError) -> Value {
        match err {
            ExprError::TableFull(limit) => {
                self.table_full = Some(limit);
                self.errors |= ErrorFlags::RESOURCE;
            }
            _ => self.errors |= ErrorFlags::EXPRESSION,
        }
        let mut value = Value::constant(0);
        value.certain = false;
        value
    }

    /// Evaluate a complete expression field. Errors are recorded and an
    /// uncertain zero is returned.
    pub fn eval_str(&mut self, text: &str) -> Value {
        let env = self.env();
        let result = Evaluator::new(self.symbols, env).evaluate_str(text.trim());
        match result {
            Ok(value) => {
                self.note_value(&value);
                value
            }
            Err(err) => self.note_error(err),
        }
    }

    /// Evaluate the expression at the cursor, leaving the cursor after it.
    pub fn eval_cursor(&mut self, cur: &mut Cursor<'_>) -> Value {
        let env = self.env();
        let result = Evaluator::new(self.symbols, env).evaluate(cur);
        match result {
            Ok(value) => {
                self.note_value(&value);
                value
            }
            Err(err) => self.note_error(err),
        }
    }

    /// True when the value needs a relocation record in this mode.
    pub fn relocatable(&self, value: &Value) -> bool {
        self.options.relocatable && value.is_relocatable()
    }

    /// Canonical register name, alias definitions applied.
    pub fn register_name(&self, text: &str) -> String {
        let upper = text.trim().to_ascii_uppercase();
        match self.aliases.get(&upper) {
            Some(reg) => reg.clone(),
            None => upper,
        }
    }

    pub fn emit(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn emit_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn emit_u16(&mut self, word: u16) {
        self.bytes.extend_from_slice(&word.to_be_bytes());
    }

    fn push_relocation(&mut self, category: ExprCategory, symbol: Option<SymbolId>) {
        self.relocations.push(PendingRelocation {
            offset: self.bytes.len(),
            category,
            symbol,
        });
    }

    /// Emit an 8-bit operand, recording a single-byte relocation if needed.
    pub fn emit_byte_value(&mut self, value: &Value) {
        if self.relocatable(value) {
            self.push_relocation(
                value.category() | ExprCategory::SINGLE_BYTE,
                value.external_symbol(),
            );
        }
        self.emit(value.value as u8);
    }

    /// Emit an immediate byte, warning when the value does not fit.
    pub fn emit_immediate8(&mut self, value: &Value) {
        if value.known() && !value_fits_byte(value.value) {
            self.warn(WarningFlags::IMMEDIATE_TRUNCATION);
        }
        self.emit_byte_value(value);
    }

    /// Emit a 16-bit operand, recording a relocation if needed.
    pub fn emit_word_value(&mut self, value: &Value) {
        if self.relocatable(value) {
            self.push_relocation(value.category(), value.external_symbol());
        }
        self.emit_u16(value.value as u16);
    }

    pub fn emit_immediate16(&mut self, value: &Value) {
        if value.known() && !value_fits_word(value.value) {
            self.warn(WarningFlags::IMMEDIATE_TRUNCATION);
        }
        self.emit_word_value(value);
    }

    pub fn emit_immediate32(&mut self, value: &Value) {
        if value.known() && !(-(1i64 << 31)..(1i64 << 32)).contains(&value.value) {
            self.warn(WarningFlags::IMMEDIATE_TRUNCATION);
        }
        if self.relocatable(value) {
            self.error(ErrorFlags::RELOCATION_MODE);
        }
        self.bytes
            .extend_from_slice(&(value.value as u32).to_be_bytes());
    }

    /// Decide between direct-page and extended addressing for `value`.
    ///
    /// Automatic selection needs a certain, absolute value on the current
    /// direct page.
    pub fn wants_direct(&mut self, value: &Value, forced: Forced, available: bool) -> bool {
        match forced {
            Forced::Direct if available => {
                if value.known() && (value.word() >> 8) as u8 != self.dp {
                    self.warn(WarningFlags::FORCED_TRUNCATION);
                }
                true
            }
            Forced::Direct => {
                self.warn(WarningFlags::ILLOGICAL_FORCE);
                false
            }
            Forced::Extended => false,
            Forced::Short => {
                self.warn(WarningFlags::ILLOGICAL_FORCE);
                self.auto_direct(value, available)
            }
            Forced::Auto => self.auto_direct(value, available),
        }
    }

    fn auto_direct(&self, value: &Value, available: bool) -> bool {
        available
            && value.known()
            && value.certain
            && !self.relocatable(value)
            && (0..=0xFFFF).contains(&value.value)
            && (value.value >> 8) as u8 == self.dp
    }

    /// Emit the low byte of a direct-page address.
    pub fn emit_direct(&mut self, value: &Value) {
        self.emit_byte_value(value);
    }

    /// Emit a PC-relative displacement to `target`.
    ///
    /// `instr_len` is the full instruction length, so the displacement is
    /// measured from the next instruction.
    pub fn emit_relative(&mut self, target: &Value, instr_len: u16, long: bool) {
        let next = self.pc.wrapping_add(instr_len) as i64;
        if self.options.relocatable && target.is_external() {
            if !long {
                self.error(ErrorFlags::RELOCATION_MODE);
                self.emit(0);
                return;
            }
            self.push_relocation(
                ExprCategory::EXTERNAL | ExprCategory::EXT_OFFSET,
                target.external_symbol(),
            );
            self.emit_u16(target.value.wrapping_sub(next) as u16);
            return;
        }
        let mut offset = if target.unknown {
            0
        } else {
            target.value - next
        };
        let (lo, hi) = if long {
            (-32768i64, 32767i64)
        } else {
            (-128i64, 127i64)
        };
        if self.final_pass() && !target.unknown && !(lo..=hi).contains(&offset) {
            let wrapped = (offset + 0x8000).rem_euclid(0x10000) - 0x8000;
            if self.options.wrap && (lo..=hi).contains(&wrapped) {
                if target.certain {
                    self.warn(WarningFlags::RELATIVE_WRAP);
                } else {
                    self.error(ErrorFlags::RANGE);
                }
                offset = wrapped;
            } else {
                self.error(ErrorFlags::RANGE);
            }
        }
        if long {
            self.emit_u16(offset as u16);
        } else {
            self.emit(offset as u8);
        }
    }

    /// Warn when a long branch to a certain target fits a short branch.
    pub fn hint_long_branch(&mut self, target: &Value) {
        if !self.options.branch_hints || !target.certain || target.unknown || target.is_external()
        {
            return;
        }
        let offset = target.value - (self.pc.wrapping_add(2) as i64);
        if (-128..=127).contains(&offset) {
            self.warn(WarningFlags::BRANCH_OPTIMIZE);
        }
    }
}

/// A CPU-specific instruction encoder.
pub trait CpuHandler {
    fn cpu(&self) -> CpuType;

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstructionEntry>;

    /// Encode `entry` with the given operand field into `ctx`.
    fn encode(&self, entry: &InstructionEntry, operand: &str, ctx: &mut EncodeContext<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ctx<R>(
        options: AsmOptions,
        pc: u16,
        f: impl FnOnce(&mut EncodeContext<'_>) -> R,
    ) -> R {
        let mut symbols = SymbolTable::new();
        let aliases = HashMap::new();
        let mut ctx = EncodeContext::new(&mut symbols, &options, &aliases, pc, 2, 0);
        f(&mut ctx)
    }

    #[test]
    fn relative_offsets_and_range() {
        with_ctx(AsmOptions::default(), 0x1000, |ctx| {
            let target = ctx.eval_str("$1000");
            ctx.emit_relative(&target, 2, false);
            assert_eq!(ctx.bytes, vec![0xFE]);
            let far = ctx.eval_str("$1100");
            ctx.emit_relative(&far, 2, false);
            assert!(ctx.errors.contains(ErrorFlags::RANGE));
        });
    }

    #[test]
    fn short_branch_limits() {
        with_ctx(AsmOptions::default(), 0x1000, |ctx| {
            let fwd = ctx.eval_str("$1002+127");
            ctx.emit_relative(&fwd, 2, false);
            let back = ctx.eval_str("$1002-128");
            ctx.emit_relative(&back, 2, false);
            assert!(ctx.errors.is_empty());
            assert_eq!(ctx.bytes, vec![0x7F, 0x80]);
            let over = ctx.eval_str("$1002+128");
            ctx.emit_relative(&over, 2, false);
            assert!(ctx.errors.contains(ErrorFlags::RANGE));
        });
    }

    #[test]
    fn wraparound_needs_option() {
        let options = AsmOptions {
            wrap: true,
            ..AsmOptions::default()
        };
        with_ctx(options, 0x0010, |ctx| {
            let target = ctx.eval_str("$FFF0");
            ctx.emit_relative(&target, 2, false);
            assert!(ctx.errors.is_empty());
            assert!(ctx.warnings.contains(WarningFlags::RELATIVE_WRAP));
            assert_eq!(ctx.bytes, vec![(-0x22i8) as u8]);
        });
    }

    #[test]
    fn direct_page_selection() {
        with_ctx(AsmOptions::default(), 0, |ctx| {
            let zp = ctx.eval_str("$0040");
            assert!(ctx.wants_direct(&zp, Forced::Auto, true));
            assert!(!ctx.wants_direct(&zp, Forced::Auto, false));
            assert!(!ctx.wants_direct(&zp, Forced::Extended, true));
            let high = ctx.eval_str("$1240");
            assert!(!ctx.wants_direct(&high, Forced::Auto, true));
            assert!(ctx.wants_direct(&high, Forced::Direct, true));
            assert!(ctx.warnings.contains(WarningFlags::FORCED_TRUNCATION));
            ctx.dp = 0x12;
            assert!(ctx.wants_direct(&high, Forced::Auto, true));
        });
    }

    #[test]
    fn force_prefixes() {
        assert_eq!(strip_force("<<5"), (Forced::Short, "5"));
        assert_eq!(strip_force("<LABEL"), (Forced::Direct, "LABEL"));
        assert_eq!(strip_force(">$10"), (Forced::Extended, "$10"));
        assert_eq!(strip_force("VALUE"), (Forced::Auto, "VALUE"));
    }

    #[test]
    fn immediate_truncation_warns() {
        with_ctx(AsmOptions::default(), 0, |ctx| {
            let v = ctx.eval_str("300");
            ctx.emit_immediate8(&v);
            assert!(ctx.warnings.contains(WarningFlags::IMMEDIATE_TRUNCATION));
            assert_eq!(ctx.bytes, vec![0x2C]);
        });
    }

    #[test]
    fn undefined_symbols_are_errors_in_final_pass() {
        with_ctx(AsmOptions::default(), 0, |ctx| {
            let v = ctx.eval_str("NOWHERE+1");
            assert!(v.unknown);
            assert!(ctx.errors.contains(ErrorFlags::UNDEFINED));
            assert_eq!(ctx.undefined.as_deref(), Some("NOWHERE"));
        });
    }
}
