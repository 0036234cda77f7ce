// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembler directives: symbol definitions, data, storage and options.

use super::*;

/// Expression kind accepted by FCB/FDB/FCDW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataWidth {
    Byte,
    Word,
    Long,
}

impl Session<'_> {
    /// Handle `upper` as a directive. Returns false when it is not one.
    pub(super) fn directive(
        &mut self,
        label: Option<&str>,
        upper: &str,
        rest: &str,
        res: &mut LineResult,
    ) -> Result<bool, FatalError> {
        let strict = self.options.strict;
        let operand = operand_field(rest, strict);
        match upper {
            "EQU" | "=" => self.equate(label, operand, false, res)?,
            "SET" => self.equate(label, operand, true, res)?,
            "TEXT" => self.text(label, rest, res)?,
            "REG" => self.register_alias(label, operand, res)?,
            "COMMON" => self.common_block(label, res)?,
            "ENDCOM" => match self.common.take() {
                Some((id, size)) => {
                    self.symbols.get_mut(id).value = size;
                    res.value = Some(size);
                }
                None => res.errors |= ErrorFlags::ILLEGAL_NESTING,
            },
            "ORG" => {
                if self.options.relocatable {
                    res.errors |= ErrorFlags::RELOCATION_MODE;
                } else {
                    let value = self.eval(operand, res);
                    self.pc = value.word();
                    self.phase = 0;
                }
                self.define_label(label, res)?;
            }
            "PHASE" => {
                let value = self.eval(operand, res);
                self.phase = value.word().wrapping_sub(self.pc);
                self.define_label(label, res)?;
            }
            "DEPHASE" => {
                self.phase = 0;
                self.define_label(label, res)?;
            }
            "RMB" | "DS" => self.reserve(label, operand, 1, res)?,
            "RMD" => self.reserve(label, operand, 2, res)?,
            _ => {
                if !self.is_general_directive(upper) {
                    return Ok(false);
                }
                self.define_label(label, res)?;
                self.general(upper, rest, operand, res)?;
            }
        }
        Ok(true)
    }

    fn is_general_directive(&self, upper: &str) -> bool {
        matches!(
            upper,
            "FCB" | "DB" | "BYTE" | "FDB" | "DW" | "FCW" | "WORD" | "FCDW" | "DL" | "LONG"
                | "FCC" | "FCS" | "RZB" | "ZMB" | "FILL" | "ALIGN" | "SETDP" | "DIRECT"
                | "END" | "EXTERN" | "EXT" | "XREF" | "PUBLIC" | "GLOBAL" | "XDEF"
                | "ERROR" | "WARNING" | "OPT" | "NAM" | "TTL" | "TITLE" | "STTL" | "PAGE"
                | "SPC" | "LIST" | "NOLIST"
        )
    }

    /// Directives that take no label of their own; the label is defined
    /// at the current address before they run.
    fn general(
        &mut self,
        upper: &str,
        rest: &str,
        operand: &str,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        match upper {
            "FCB" | "DB" | "BYTE" => self.data(operand, DataWidth::Byte, res),
            "FDB" | "DW" | "FCW" | "WORD" => self.data(operand, DataWidth::Word, res),
            "FCDW" | "DL" | "LONG" => self.data(operand, DataWidth::Long, res),
            "FCC" => self.string_constant(rest, false, res),
            "FCS" => self.string_constant(rest, true, res),
            "RZB" | "ZMB" => {
                let count = self.eval(operand, res);
                if let Some(count) = self.byte_count(&count, res) {
                    res.bytes.resize(res.bytes.len() + count, 0);
                }
            }
            "FILL" => self.fill(operand, res),
            "ALIGN" => {
                let align = self.eval(operand, res);
                if align.known() {
                    if !(1..=0x8000).contains(&align.value) {
                        res.errors |= ErrorFlags::RANGE;
                    } else {
                        let n = align.value as u32;
                        let pad = (n - self.logical_pc() as u32 % n) % n;
                        res.bytes.resize(pad as usize, self.options.fill);
                    }
                }
            }
            "SETDP" | "DIRECT" => self.set_direct_page(upper, operand, res),
            "END" => {
                if !operand.is_empty() {
                    let go = self.eval(operand, res);
                    if go.known() {
                        self.transfer = Some(go.word());
                        res.value = Some(go.word());
                    }
                }
                self.ended = true;
            }
            "EXTERN" | "EXT" | "XREF" => self.declare_list(operand, true, res)?,
            "PUBLIC" | "GLOBAL" | "XDEF" => self.declare_list(operand, false, res)?,
            "ERROR" => {
                res.errors |= ErrorFlags::USER;
                res.message = Some(rest.trim().to_string());
            }
            "WARNING" => {
                res.warnings |= WarningFlags::USER;
                res.message = Some(rest.trim().to_string());
            }
            "OPT" => self.opt(operand, res)?,
            "NAM" | "TTL" | "TITLE" => self.title = rest.trim().to_string(),
            "LIST" => self.listing_on = true,
            "NOLIST" => self.listing_on = false,
            _ => {}
        }
        Ok(())
    }

    /// EQU and SET.
    fn equate(
        &mut self,
        label: Option<&str>,
        operand: &str,
        variable: bool,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            res.errors |= ErrorFlags::MISSING_LABEL;
            return Ok(());
        };
        let value = self.eval(operand, res);
        if value.unknown {
            // Pass 1 leaves the name undefined so later uses stay uncertain.
            return Ok(());
        }
        res.value = Some(value.word());
        if is_local_label(name) {
            self.symbols.define_local(name, value.word());
            return Ok(());
        }
        let category = match (variable, value.is_external(), value.is_relocatable()) {
            (false, true, _) => {
                res.errors |= ErrorFlags::EXPRESSION;
                return Ok(());
            }
            (false, false, true) => SymbolCategory::Label,
            (false, false, false) => SymbolCategory::Constant,
            (true, true, _) => SymbolCategory::VarExternal,
            (true, false, true) => SymbolCategory::VarAddress,
            (true, false, false) => SymbolCategory::Variable,
        };
        let id = self.symbol_id(name)?;
        let previous = self.symbols.get(id).clone();
        if !variable
            && self.pass > 1
            && previous.category.is_defined()
            && previous.value != value.word()
        {
            res.errors |= ErrorFlags::PHASE;
            res.detail = Some(name.to_string());
        }
        if self
            .symbols
            .define_value(id, category, value.word())
            .is_err()
        {
            res.errors |= ErrorFlags::MULTIPLY_DEFINED;
            res.detail = Some(name.to_string());
            return Ok(());
        }
        self.symbols.set_uncertain(id, !value.certain);
        Ok(())
    }

    fn text(
        &mut self,
        label: Option<&str>,
        rest: &str,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            res.errors |= ErrorFlags::MISSING_LABEL;
            return Ok(());
        };
        let raw = rest.trim();
        let body = raw
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(raw);
        let id = self.symbol_id(name)?;
        if self
            .symbols
            .define_special(id, SymbolCategory::Text, 0)
            .is_err()
        {
            res.errors |= ErrorFlags::MULTIPLY_DEFINED;
            return Ok(());
        }
        self.texts.define(name, body);
        Ok(())
    }

    fn register_alias(
        &mut self,
        label: Option<&str>,
        operand: &str,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            res.errors |= ErrorFlags::MISSING_LABEL;
            return Ok(());
        };
        if operand.is_empty() {
            res.errors |= ErrorFlags::EXPRESSION;
            return Ok(());
        }
        let id = self.symbol_id(name)?;
        if self
            .symbols
            .define_special(id, SymbolCategory::RegisterAlias, 0)
            .is_err()
        {
            res.errors |= ErrorFlags::MULTIPLY_DEFINED;
            return Ok(());
        }
        self.aliases
            .insert(name.to_ascii_uppercase(), operand.to_ascii_uppercase());
        Ok(())
    }

    fn common_block(&mut self, label: Option<&str>, res: &mut LineResult) -> Result<(), FatalError> {
        if !self.options.relocatable {
            res.errors |= ErrorFlags::RELOCATION_MODE;
            return Ok(());
        }
        if self.common.is_some() {
            res.errors |= ErrorFlags::ILLEGAL_NESTING;
            return Ok(());
        }
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            res.errors |= ErrorFlags::MISSING_LABEL;
            return Ok(());
        };
        let id = self.symbol_id(name)?;
        if self
            .symbols
            .define_special(id, SymbolCategory::Common, 0)
            .is_err()
        {
            res.errors |= ErrorFlags::MULTIPLY_DEFINED;
            return Ok(());
        }
        self.common = Some((id, 0));
        Ok(())
    }

    /// RMB/DS/RMD, or a member definition inside a COMMON block.
    fn reserve(
        &mut self,
        label: Option<&str>,
        operand: &str,
        unit: u16,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let count = self.eval(operand, res);
        let size = if !count.known() {
            0
        } else if !(0..=0xFFFF).contains(&(count.value * unit as i64)) {
            res.errors |= ErrorFlags::RANGE;
            0
        } else {
            count.word().wrapping_mul(unit)
        };
        if let Some((parent, offset)) = self.common {
            if let Some(name) = label.filter(|name| !name.is_empty()) {
                let id = self.symbol_id(name)?;
                if self
                    .symbols
                    .define_common_member(id, parent, offset)
                    .is_err()
                {
                    res.errors |= ErrorFlags::MULTIPLY_DEFINED;
                    res.detail = Some(name.to_string());
                }
            }
            res.value = Some(offset);
            self.common = Some((parent, offset.wrapping_add(size)));
            return Ok(());
        }
        self.define_label(label, res)?;
        res.reserve = size;
        Ok(())
    }

    fn byte_count(&mut self, count: &Value, res: &mut LineResult) -> Option<usize> {
        if !count.known() {
            return None;
        }
        if !(0..=0xFFFF).contains(&count.value) {
            res.errors |= ErrorFlags::RANGE;
            return None;
        }
        Some(count.value as usize)
    }

    fn data(&mut self, operand: &str, width: DataWidth, res: &mut LineResult) {
        if operand.is_empty() {
            res.errors |= ErrorFlags::EXPRESSION;
            return;
        }
        let items = split_top_level(operand);
        self.with_ctx(res, |ctx| {
            for item in items {
                emit_data_item(ctx, item.trim(), width);
            }
        });
    }

    /// FCC/FCS: a delimited string, optionally followed by `,expr` bytes.
    fn string_constant(&mut self, rest: &str, set_last: bool, res: &mut LineResult) {
        let field = rest.trim_start();
        let Some(delim) = field.chars().next() else {
            res.errors |= ErrorFlags::EXPRESSION;
            return;
        };
        let body = &field[delim.len_utf8()..];
        let Some(close) = body.find(delim) else {
            res.errors |= ErrorFlags::EXPRESSION;
            return;
        };
        let mut text: Vec<u8> = body[..close].bytes().collect();
        if set_last {
            if let Some(last) = text.last_mut() {
                *last |= 0x80;
            }
        }
        res.bytes.extend(text);
        let tail = &body[close + delim.len_utf8()..];
        if let Some(items) = tail.strip_prefix(',') {
            let items = operand_field(items, self.options.strict);
            if !items.is_empty() {
                self.data(items, DataWidth::Byte, res);
            }
        }
    }

    fn fill(&mut self, operand: &str, res: &mut LineResult) {
        let parts = split_top_level(operand);
        let [value, count] = parts.as_slice() else {
            res.errors |= ErrorFlags::EXPRESSION;
            return;
        };
        let value = self.eval(value, res);
        let count = self.eval(count, res);
        if value.known() && !value_fits_byte(value.value) {
            res.errors |= ErrorFlags::RANGE;
        }
        if let Some(count) = self.byte_count(&count, res) {
            res.bytes.resize(res.bytes.len() + count, value.value as u8);
        }
    }

    fn set_direct_page(&mut self, upper: &str, operand: &str, res: &mut LineResult) {
        if !is_6809_family(self.options.cpu) {
            res.errors |= ErrorFlags::ILLEGAL_MNEMONIC;
            res.detail = Some(upper.to_string());
            return;
        }
        let page = self.eval(operand, res);
        if !page.known() {
            return;
        }
        if !(0..=0xFF).contains(&page.value) {
            res.errors |= ErrorFlags::RANGE;
            return;
        }
        self.dp = page.value as u8;
        res.value = Some(page.value as u16);
    }

    fn declare_list(
        &mut self,
        operand: &str,
        external: bool,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        if !self.options.relocatable {
            res.errors |= ErrorFlags::RELOCATION_MODE;
            return Ok(());
        }
        for name in split_top_level(operand) {
            let name = name.trim();
            if name.is_empty() {
                res.errors |= ErrorFlags::EXPRESSION;
                continue;
            }
            let id = self.symbol_id(name)?;
            let declared = if external {
                self.symbols.declare_external(id)
            } else {
                self.symbols.declare_public(id)
            };
            if declared.is_err() {
                res.errors |= ErrorFlags::MULTIPLY_DEFINED;
                res.detail = Some(name.to_string());
            }
        }
        Ok(())
    }

    fn opt(&mut self, operand: &str, res: &mut LineResult) -> Result<(), FatalError> {
        for item in split_top_level(operand) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if let Some(expr) = item
                .split_once('=')
                .filter(|(key, _)| key.trim().eq_ignore_ascii_case("FILL"))
                .map(|(_, expr)| expr)
            {
                let fill = self.eval(expr, res);
                if fill.known() && !value_fits_byte(fill.value) {
                    res.errors |= ErrorFlags::RANGE;
                } else if fill.known() {
                    self.options.fill = fill.value as u8;
                }
                continue;
            }
            if let Some(cpu) = self.registry.resolve_cpu_name(item) {
                self.select_cpu(cpu)?;
                continue;
            }
            if self.options.apply_switch(item) {
                self.apply_case_mode();
                continue;
            }
            debug!("unknown option {item}");
            res.errors |= ErrorFlags::UNKNOWN_OPTION;
            res.detail = Some(item.to_string());
        }
        Ok(())
    }
}

fn emit_data_item(ctx: &mut EncodeContext<'_>, item: &str, width: DataWidth) {
    if width == DataWidth::Byte && item.len() >= 2 && item.starts_with('"') && item.ends_with('"')
    {
        ctx.emit_slice(item[1..item.len() - 1].as_bytes());
        return;
    }
    if item.is_empty() {
        ctx.error(ErrorFlags::EXPRESSION);
        return;
    }
    let value = ctx.eval_str(item);
    match width {
        DataWidth::Byte => {
            if value.known() && !value_fits_byte(value.value) {
                ctx.error(ErrorFlags::RANGE);
            }
            ctx.emit_byte_value(&value);
        }
        DataWidth::Word => {
            if value.known() && !value_fits_word(value.value) {
                ctx.error(ErrorFlags::RANGE);
            }
            ctx.emit_word_value(&value);
        }
        DataWidth::Long => ctx.emit_immediate32(&value),
    }
}
