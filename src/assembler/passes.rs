// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Pass sequencing and per-line processing.
//!
//! Both passes walk the arena in link order. Lines spliced in after the
//! current line (macro, DUP and INCLUDE expansions) are picked up by the
//! same walk.

use super::*;

impl Session<'_> {
    pub(super) fn run(mut self, name: &str, text: &str) -> Result<Assembly, FatalError> {
        let file = self.arena.add_file(name);
        self.arena.load_text(file, text);
        for pass in 1..=2 {
            self.start_pass(pass)?;
            self.run_pass()?;
            if pass == 1 {
                self.between_passes();
            }
        }
        self.finish_run();
        debug!(
            "assembled {name}: {} lines, {} errors, {} warnings",
            self.counts.lines, self.counts.errors, self.counts.warnings
        );
        Ok(Assembly {
            image: self.image,
            diagnostics: self.diagnostics,
            symbols: self.symbols,
            transfer: self.transfer,
            listing: self.listing,
            counts: self.counts,
            fill: self.options.fill,
            title: self.title,
        })
    }

    fn start_pass(&mut self, pass: u8) -> Result<(), FatalError> {
        debug!("starting pass {pass}");
        self.pass = pass;
        self.options = self.initial.clone();
        self.apply_case_mode();
        self.select_cpu(self.initial.cpu)?;
        self.dp = if is_6809_family(self.options.cpu) {
            self.options.direct_page
        } else {
            0
        };
        self.symbols.start_pass();
        self.conditionals.clear();
        self.pc = 0;
        self.phase = 0;
        self.skip_lines = 0;
        self.common = None;
        self.transfer = None;
        self.ended = false;
        self.listing_on = true;
        self.counts = PassCounts::new();
        Ok(())
    }

    fn run_pass(&mut self) -> Result<(), FatalError> {
        let mut cursor = self.arena.first();
        while let Some(id) = cursor {
            self.process_line(id)?;
            if let Some(limit) = self.table_full.take() {
                return Err(FatalError::SymbolTableFull { limit });
            }
            if self.ended {
                break;
            }
            cursor = self.arena.next(id);
        }
        Ok(())
    }

    fn between_passes(&mut self) {
        if self.options.undef_extern || self.initial.undef_extern {
            let names = self.symbols.externalize_undefined();
            if !names.is_empty() {
                debug!("treating {} undefined symbols as external", names.len());
            }
        }
    }

    /// End-of-run checks on state that spans lines.
    fn finish_run(&mut self) {
        if !self.conditionals.is_empty() {
            self.run_error(ErrorFlags::ILLEGAL_NESTING, Some("IF without ENDIF"));
        }
        if self.common.is_some() {
            self.run_error(ErrorFlags::ILLEGAL_NESTING, Some("COMMON without ENDCOM"));
        }
        let pending: Vec<String> = self
            .symbols
            .entries()
            .iter()
            .filter(|sym| sym.category == SymbolCategory::PublicUndefined)
            .map(|sym| sym.name.clone())
            .collect();
        for name in pending {
            self.run_error(ErrorFlags::UNDEFINED, Some(&name));
        }
    }

    fn run_error(&mut self, flag: ErrorFlags, param: Option<&str>) {
        let (line, file) = self.last_line.clone().unwrap_or_default();
        self.diagnostics
            .push(Diagnostic::from_error(line, flag, param).with_file(Some(file)));
        self.counts.errors += 1;
    }

    fn process_line(&mut self, id: LineId) -> Result<(), FatalError> {
        let line = self.arena.get(id).clone();
        let mut res = LineResult::default();
        if self.pass > 1 {
            if let Some((errors, warnings)) = self.structural.get(&id) {
                res.errors |= *errors;
                res.warnings |= *warnings;
            }
        }
        if line.flags.contains(LineFlags::MACRO_DEF) {
            return self.finish_line(&line, res);
        }
        if self.skip_lines > 0 {
            self.skip_lines -= 1;
            return self.finish_line(&line, res);
        }

        let text = if line.flags.contains(LineFlags::SUBSTITUTED) {
            line.text.to_string()
        } else {
            crate::core::macro_processor::substitute(&line.text, None, &self.texts)
                .text
                .into_owned()
        };
        let fields = split_fields(&text);
        let mnemonic = fields.mnemonic.unwrap_or("");
        if let Some(directive) = ConditionalDirective::parse(mnemonic) {
            self.conditional(directive, fields.rest, &mut res);
            return self.finish_line(&line, res);
        }
        if self.conditionals.skipping() {
            return self.finish_line(&line, res);
        }
        let upper = mnemonic.to_ascii_uppercase();
        self.dispatch(id, &line, &fields, &upper, &mut res)?;
        self.finish_line(&line, res)
    }

    fn dispatch(
        &mut self,
        id: LineId,
        line: &SourceLine,
        fields: &LineFields<'_>,
        upper: &str,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let name = fields.mnemonic.unwrap_or("");
        if line.flags.contains(LineFlags::MACRO_INVOCATION) {
            let uses_label = self.macros.get(name).is_some_and(|def| def.uses_label);
            if !uses_label {
                self.define_label(fields.label, res)?;
            }
            return Ok(());
        }
        if self.common.is_some() && !matches!(upper, "" | "RMB" | "DS" | "RMD" | "ENDCOM") {
            res.errors |= ErrorFlags::RELOCATION_MODE;
            return Ok(());
        }
        match upper {
            "MACRO" => return self.define_macro(id, fields.label, res),
            "DUP" => return self.dup_block(id, line, fields, res),
            "INCLUDE" | "LIB" => return self.include(id, line, fields, res),
            "BINARY" | "BIN" => return self.binary(id, line, fields, res),
            "ENDM" | "EXITM" | "ENDD" => {
                res.errors |= ErrorFlags::ILLEGAL_NESTING;
                return self.define_label(fields.label, res);
            }
            _ => {}
        }
        if let Some(def) = self.macros.get(name).copied() {
            return self.invoke_macro(id, line, fields, def, res);
        }
        if self.directive(fields.label, upper, fields.rest, res)? {
            return Ok(());
        }
        self.define_label(fields.label, res)?;
        if !upper.is_empty() {
            self.instruction(upper, fields.rest, res);
        }
        Ok(())
    }

    fn conditional(&mut self, directive: ConditionalDirective, rest: &str, res: &mut LineResult) {
        let operand = operand_field(rest, self.options.strict);
        let skip_form = directive.skip_count(operand);
        let result = match directive {
            ConditionalDirective::Else => self.conditionals.else_branch(),
            ConditionalDirective::EndIf => self.conditionals.endif(),
            _ if self.conditionals.skipping() => match skip_form {
                Some(_) => Ok(()),
                None => self.conditionals.push_if(false),
            },
            _ => {
                let mut conditions = self.conditions();
                let (outcome, skip) = match skip_form {
                    Some((condition, count)) => {
                        let skip = if conditions.condition(directive, condition) {
                            0
                        } else {
                            conditions.count(count).unwrap_or(0).max(0)
                        };
                        (None, skip)
                    }
                    None => (Some(conditions.condition(directive, operand)), 0),
                };
                res.errors |= conditions.errors;
                if res.undefined.is_none() {
                    res.undefined = conditions.undefined.take();
                }
                self.skip_lines = skip;
                match outcome {
                    Some(take) => self.conditionals.push_if(take),
                    None => Ok(()),
                }
            }
        };
        if result.is_err() {
            res.errors |= ErrorFlags::ILLEGAL_NESTING;
        }
    }

    pub(super) fn define_label(
        &mut self,
        label: Option<&str>,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            return Ok(());
        };
        let address = self.logical_pc();
        res.show_address = true;
        if is_local_label(name) {
            self.symbols.define_local(name, address);
            return Ok(());
        }
        let id = self.symbol_id(name)?;
        match self.symbols.define_label(id, address, self.pass) {
            Ok(()) => {}
            Err(SymbolError::Phase) => {
                debug!("phase error: {name} moved to ${address:04X}");
                res.errors |= ErrorFlags::PHASE;
                res.detail = Some(name.to_string());
            }
            Err(_) => {
                res.errors |= ErrorFlags::MULTIPLY_DEFINED;
                res.detail = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Insert expansion lines after `after`, attributed to `origin`.
    fn splice_lines(
        &mut self,
        after: LineId,
        origin: &SourceLine,
        lines: Vec<String>,
        flags: LineFlags,
    ) {
        let mut cursor = after;
        for text in lines {
            let line = SourceLine::new(
                &text,
                origin.file,
                origin.line_no,
                origin.level + 1,
                flags | LineFlags::MACRO_EXPANSION,
            );
            cursor = self.arena.insert_after(cursor, line);
        }
    }

    fn mark_body(&mut self, first: Option<LineId>, count: usize, end: Option<LineId>) {
        let ids: Vec<LineId> = body_lines(&self.arena, first, count).chain(end).collect();
        for id in ids {
            self.arena.set_flags(id, LineFlags::MACRO_DEF);
        }
    }

    fn define_macro(
        &mut self,
        id: LineId,
        label: Option<&str>,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        if self.pass > 1 {
            return Ok(());
        }
        let capture = capture_body(&self.arena, id, &["MACRO"], &["ENDM"]);
        self.mark_body(capture.first, capture.count, capture.end);
        if capture.nested || capture.end.is_none() {
            self.structural(id, res, ErrorFlags::ILLEGAL_NESTING, WarningFlags::empty());
        }
        let Some(name) = label.filter(|name| !name.is_empty()) else {
            self.structural(id, res, ErrorFlags::MISSING_LABEL, WarningFlags::empty());
            return Ok(());
        };
        let sym = self.symbol_id(name)?;
        let index = self.macros.len() as u16;
        if self
            .symbols
            .define_special(sym, SymbolCategory::Macro, index)
            .is_err()
        {
            self.structural(id, res, ErrorFlags::MULTIPLY_DEFINED, WarningFlags::empty());
            return Ok(());
        }
        let def = MacroDef {
            first_line: capture.first,
            count: capture.count,
            uses_label: capture.uses_label,
        };
        self.macros.define(name, def).map_err(|err| match err {
            MacroError::TableFull(limit) => FatalError::MacroTableFull { limit },
        })?;
        debug!("defined macro {name} ({} lines)", capture.count);
        Ok(())
    }

    fn invoke_macro(
        &mut self,
        id: LineId,
        line: &SourceLine,
        fields: &LineFields<'_>,
        def: MacroDef,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        if self.pass > 1 {
            // Defined after its first use: pass 1 could not expand it.
            res.errors |= ErrorFlags::ILLEGAL_MNEMONIC;
            res.detail = fields.mnemonic.map(str::to_string);
            return Ok(());
        }
        if line.level >= MAX_MACRO_DEPTH {
            self.structural(id, res, ErrorFlags::ILLEGAL_NESTING, WarningFlags::empty());
            return Ok(());
        }
        let args = MacroArgs::new(fields.label, operand_field(fields.rest, self.options.strict));
        let strict = self.options.strict;
        let pc = self.logical_pc();
        let mut conditions = Conditions {
            symbols: &mut self.symbols,
            options: &self.options,
            aliases: &self.aliases,
            pc,
            pass: self.pass,
            dp: self.dp,
            errors: ErrorFlags::empty(),
            undefined: None,
        };
        let expansion = expand_macro(
            &self.arena,
            &def,
            &args,
            &self.texts,
            strict,
            &mut conditions,
        );
        let mut errors = conditions.errors & !ErrorFlags::UNDEFINED;
        let mut warnings = WarningFlags::empty();
        if expansion.nesting_error {
            errors |= ErrorFlags::ILLEGAL_NESTING;
        }
        if expansion.undefined_text {
            warnings |= WarningFlags::TEXT_UNDEFINED;
        }
        if !errors.is_empty() || !warnings.is_empty() {
            self.structural(id, res, errors, warnings);
        }
        debug!(
            "expanding macro {} at line {} ({} lines)",
            fields.mnemonic.unwrap_or_default(),
            line.line_no,
            expansion.lines.len()
        );
        self.arena.set_flags(id, LineFlags::MACRO_INVOCATION);
        self.splice_lines(id, line, expansion.lines, LineFlags::SUBSTITUTED);
        if !def.uses_label {
            self.define_label(fields.label, res)?;
        }
        Ok(())
    }

    fn dup_block(
        &mut self,
        id: LineId,
        line: &SourceLine,
        fields: &LineFields<'_>,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        self.define_label(fields.label, res)?;
        let capture = capture_body(&self.arena, id, &["DUP"], &["ENDD"]);
        self.mark_body(capture.first, capture.count, capture.end);
        self.arena.set_flags(id, LineFlags::MACRO_INVOCATION);
        let Some(end) = capture.end.filter(|_| !capture.nested) else {
            self.structural(id, res, ErrorFlags::ILLEGAL_NESTING, WarningFlags::empty());
            return Ok(());
        };
        if line.level >= MAX_MACRO_DEPTH {
            self.structural(id, res, ErrorFlags::ILLEGAL_NESTING, WarningFlags::empty());
            return Ok(());
        }
        let operand = operand_field(fields.rest, self.options.strict);
        let mut scratch = LineResult::default();
        let count = self.eval(operand, &mut scratch);
        if !count.known() {
            self.structural(id, res, ErrorFlags::UNDEFINED, WarningFlags::empty());
            res.undefined = count.undefined;
            return Ok(());
        }
        if !scratch.errors.is_empty() {
            self.structural(id, res, scratch.errors, WarningFlags::empty());
            return Ok(());
        }
        if !DUP_RANGE.contains(&count.value) {
            self.structural(id, res, ErrorFlags::RANGE, WarningFlags::empty());
            return Ok(());
        }
        let lines = expand_dup(&self.arena, capture.first, capture.count, count.value as usize);
        debug!("DUP {} at line {}", count.value, line.line_no);
        let inherited = line.flags & LineFlags::SUBSTITUTED;
        self.splice_lines(end, line, lines, inherited);
        Ok(())
    }

    fn include(
        &mut self,
        id: LineId,
        line: &SourceLine,
        fields: &LineFields<'_>,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        self.define_label(fields.label, res)?;
        let Some(name) = file_operand(fields.rest) else {
            self.structural(id, res, ErrorFlags::EXPRESSION, WarningFlags::empty());
            return Ok(());
        };
        if line.level >= MAX_MACRO_DEPTH {
            self.structural(id, res, ErrorFlags::ILLEGAL_NESTING, WarningFlags::empty());
            return Ok(());
        }
        let including = self.arena.file_name(line.file).to_string();
        let (resolved, text) = self
            .provider
            .read_text(name, Some(&including))
            .map_err(|source| FatalError::Source {
                path: name.to_string(),
                source,
            })?;
        info!("including {resolved}");
        let file = self.arena.add_file(&resolved);
        self.arena.set_flags(id, LineFlags::MACRO_INVOCATION);
        self.arena
            .splice_text(id, file, &text, line.level + 1, LineFlags::empty());
        Ok(())
    }

    fn binary(
        &mut self,
        id: LineId,
        line: &SourceLine,
        fields: &LineFields<'_>,
        res: &mut LineResult,
    ) -> Result<(), FatalError> {
        self.define_label(fields.label, res)?;
        let Some(name) = file_operand(fields.rest) else {
            self.structural(id, res, ErrorFlags::EXPRESSION, WarningFlags::empty());
            return Ok(());
        };
        let including = self.arena.file_name(line.file).to_string();
        let (resolved, bytes) = self
            .provider
            .read_binary(name, Some(&including))
            .map_err(|source| FatalError::Source {
                path: name.to_string(),
                source,
            })?;
        info!("binary {resolved}: {} bytes", bytes.len());
        let lines = bytes
            .chunks(16)
            .map(|chunk| {
                let items: Vec<String> = chunk.iter().map(|b| format!("${b:02X}")).collect();
                format!(" FCB {}", items.join(","))
            })
            .collect();
        self.arena.set_flags(id, LineFlags::MACRO_INVOCATION);
        self.splice_lines(id, line, lines, LineFlags::INVISIBLE);
        Ok(())
    }

    /// Advance the location counter; in pass 2 also emit bytes, report
    /// diagnostics and record the listing line.
    fn finish_line(&mut self, line: &SourceLine, mut res: LineResult) -> Result<(), FatalError> {
        let base = self.pc;
        let logical = self.logical_pc();
        if self.pass > 1 {
            self.counts.lines += 1;
            self.emit(base, &mut res)?;
            self.report(line, &res, logical);
        }
        let size = (res.bytes.len() as u16).wrapping_add(res.reserve);
        self.pc = base.wrapping_add(size);
        Ok(())
    }

    fn emit(&mut self, base: u16, res: &mut LineResult) -> Result<(), FatalError> {
        for (offset, byte) in res.bytes.iter().enumerate() {
            let address = base.wrapping_add(offset as u16);
            let (word, bit) = (address as usize / 64, address as usize % 64);
            if self.written[word] & (1 << bit) != 0 {
                res.warnings |= WarningFlags::ADDRESS_REUSED;
            }
            self.written[word] |= 1 << bit;
            let record = res
                .relocations
                .iter()
                .find(|reloc| reloc.offset == offset)
                .map(|reloc| RelocationRecord {
                    address,
                    category: reloc.category,
                    symbol: reloc.symbol.map(|id| self.symbols.get(id).name.clone()),
                });
            if record.is_some() && self.image.relocations().len() >= MAX_RELOCATIONS {
                return Err(FatalError::RelocationTableFull {
                    limit: MAX_RELOCATIONS,
                });
            }
            self.image.emit_byte(address, *byte, record.as_ref());
        }
        Ok(())
    }

    fn report(&mut self, line: &SourceLine, res: &LineResult, logical: u16) {
        let file = self.arena.file_name(line.file).to_string();
        let mut rendered = Vec::new();
        for flag in res.errors.iter() {
            let param = if flag == ErrorFlags::UNDEFINED {
                res.undefined.as_deref()
            } else if flag == ErrorFlags::USER {
                res.message.as_deref()
            } else {
                res.detail.as_deref()
            };
            let diag = Diagnostic::from_error(line.line_no, flag, param);
            rendered.push(diag.format());
            self.diagnostics.push(
                diag.with_file(Some(file.clone()))
                    .with_source(Some(line.text.to_string())),
            );
            self.counts.errors += 1;
        }
        for flag in res.warnings.iter() {
            let param = (flag == WarningFlags::USER)
                .then(|| res.message.as_deref())
                .flatten();
            let diag = Diagnostic::from_warning(line.line_no, flag, param);
            rendered.push(diag.format());
            self.diagnostics.push(
                diag.with_file(Some(file.clone()))
                    .with_source(Some(line.text.to_string())),
            );
            self.counts.warnings += 1;
        }
        self.last_line = Some((line.line_no, file));
        if line.flags.contains(LineFlags::INVISIBLE) || !self.listing_on {
            return;
        }
        let show = res.show_address || !res.bytes.is_empty() || res.reserve > 0;
        self.listing.push(ListingLine {
            address: show.then_some(logical),
            bytes: res.bytes.clone(),
            value: res.value,
            line_num: line.line_no,
            level: line.level,
            source: line.text.to_string(),
            diagnostics: rendered,
        });
    }
}

/// File name operand of INCLUDE/BINARY: quoted, or up to the first blank.
fn file_operand(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => rest.split_whitespace().next().unwrap_or_default(),
    };
    (!name.is_empty()).then_some(name)
}
