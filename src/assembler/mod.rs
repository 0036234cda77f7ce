// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two-pass assembler session.
//!
//! An [`Assembler`] holds the configuration of a run; every call to
//! [`Assembler::assemble_source`] builds a fresh [`Session`] that owns all
//! mutable state (symbols, macros, the line arena, the location counter) so
//! independent assemblies never share anything.
//!
//! Pass 1 expands macros, DUP blocks and included files into the line arena
//! and establishes label addresses. Pass 2 walks the same lines again,
//! emits bytes and relocations into the [`ImageStore`], and produces the
//! diagnostics and the listing.

pub mod cli;
mod directives;
mod instruction;
pub mod output;
mod passes;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use log::{debug, info};

use crate::core::assembler::conditional::{
    strings_match, ConditionalDirective, ConditionalStack,
};
use crate::core::assembler::error::{
    Diagnostic, ErrorFlags, FatalError, PassCounts, Severity, WarningFlags,
};
use crate::core::assembler::listing::ListingLine;
use crate::core::cpu::CpuType;
use crate::core::expr::{value_fits_byte, value_fits_word, Value};
use crate::core::family::{CpuHandler, EncodeContext, PendingRelocation};
use crate::core::imagestore::{ByteSink, ImageStore, RelocationRecord};
use crate::core::macro_processor::{
    body_lines, capture_body, expand_dup, expand_macro, ConditionEvaluator, MacroArgs, MacroDef,
    MacroError, MacroTable, TextSymbols, DUP_RANGE, MAX_MACRO_DEPTH,
};
use crate::core::options::AsmOptions;
use crate::core::registry::ModuleRegistry;
use crate::core::source::{LineArena, LineFlags, LineId, SourceLine, SourceProvider};
use crate::core::symbol_table::{
    is_local_label, Symbol, SymbolCategory, SymbolError, SymbolId, SymbolTable,
};
use crate::core::text_utils::{operand_field, split_fields, split_top_level, LineFields};
use crate::registry_defaults::build_default_registry;

/// Cap on relocation records of one run.
pub const MAX_RELOCATIONS: usize = 16384;

/// Assembler configuration plus the file access used by INCLUDE/BINARY.
pub struct Assembler {
    options: AsmOptions,
    provider: Box<dyn SourceProvider>,
    registry: ModuleRegistry,
}

impl Assembler {
    pub fn new(options: AsmOptions, provider: impl SourceProvider + 'static) -> Self {
        Self {
            options,
            provider: Box::new(provider),
            registry: build_default_registry(),
        }
    }

    pub fn options(&self) -> &AsmOptions {
        &self.options
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Assemble `text` as the main file `name`.
    pub fn assemble_source(&self, name: &str, text: &str) -> Result<Assembly, FatalError> {
        let session = Session::new(&self.options, &self.registry, self.provider.as_ref())?;
        session.run(name, text)
    }

    /// Load the main file through the source provider and assemble it.
    pub fn assemble_file(&self, path: impl AsRef<Path>) -> Result<Assembly, FatalError> {
        let name = path.as_ref().to_string_lossy().into_owned();
        let (resolved, text) =
            self.provider
                .read_text(&name, None)
                .map_err(|source| FatalError::Source {
                    path: name.clone(),
                    source,
                })?;
        self.assemble_source(&resolved, &text)
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct Assembly {
    pub image: ImageStore,
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
    /// Address given on the END line.
    pub transfer: Option<u16>,
    pub listing: Vec<ListingLine>,
    pub counts: PassCounts,
    /// Fill byte in effect at the end of the run.
    pub fill: u8,
    pub title: String,
}

impl Assembly {
    pub fn relocations(&self) -> &[RelocationRecord] {
        self.image.relocations()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity() == severity)
            .count()
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.lookup(name).map(|id| self.symbols.get(id))
    }

    /// Value of a defined symbol.
    pub fn symbol_value(&self, name: &str) -> Option<u16> {
        self.symbol(name)
            .filter(|sym| sym.category.is_defined())
            .map(|sym| sym.value)
    }
}

/// Everything one source line produced.
#[derive(Debug, Default)]
struct LineResult {
    bytes: Vec<u8>,
    relocations: Vec<PendingRelocation>,
    /// Bytes reserved without output (RMB).
    reserve: u16,
    errors: ErrorFlags,
    warnings: WarningFlags,
    undefined: Option<String>,
    /// Text of ERROR/WARNING directives.
    message: Option<String>,
    /// Extra detail for the other diagnostics.
    detail: Option<String>,
    /// Value shown in the listing (EQU, SET, SETDP).
    value: Option<u16>,
    show_address: bool,
}

/// Mutable state of one assembly run.
struct Session<'a> {
    registry: &'a ModuleRegistry,
    provider: &'a dyn SourceProvider,
    initial: AsmOptions,
    options: AsmOptions,
    handler: Rc<dyn CpuHandler>,
    arena: LineArena,
    symbols: SymbolTable,
    macros: MacroTable,
    texts: TextSymbols,
    aliases: HashMap<String, String>,
    conditionals: ConditionalStack,
    pass: u8,
    /// Physical location counter.
    pc: u16,
    /// Logical minus physical address, set by PHASE.
    phase: u16,
    dp: u8,
    skip_lines: i64,
    /// Open COMMON block and the size collected so far.
    common: Option<(SymbolId, u16)>,
    transfer: Option<u16>,
    ended: bool,
    listing_on: bool,
    title: String,
    image: ImageStore,
    written: Vec<u64>,
    /// Errors found while expanding lines in pass 1, reported in pass 2.
    structural: HashMap<LineId, (ErrorFlags, WarningFlags)>,
    diagnostics: Vec<Diagnostic>,
    listing: Vec<ListingLine>,
    counts: PassCounts,
    table_full: Option<usize>,
    last_line: Option<(u32, String)>,
}

fn handler_for(
    registry: &ModuleRegistry,
    cpu: CpuType,
) -> Result<Rc<dyn CpuHandler>, FatalError> {
    registry
        .handler(cpu)
        .map(Rc::from)
        .ok_or_else(|| FatalError::UnknownCpu(cpu.to_string()))
}

fn is_6809_family(cpu: CpuType) -> bool {
    cpu == crate::m6809::module::CPU_ID || cpu == crate::hd6309::module::CPU_ID
}

impl<'a> Session<'a> {
    fn new(
        options: &AsmOptions,
        registry: &'a ModuleRegistry,
        provider: &'a dyn SourceProvider,
    ) -> Result<Self, FatalError> {
        let handler = handler_for(registry, options.cpu)?;
        Ok(Self {
            registry,
            provider,
            initial: options.clone(),
            options: options.clone(),
            handler,
            arena: LineArena::new(),
            symbols: SymbolTable::with_limit(options.symbol_limit),
            macros: MacroTable::new(),
            texts: TextSymbols::new(),
            aliases: HashMap::new(),
            conditionals: ConditionalStack::new(),
            pass: 0,
            pc: 0,
            phase: 0,
            dp: 0,
            skip_lines: 0,
            common: None,
            transfer: None,
            ended: false,
            listing_on: true,
            title: String::new(),
            image: ImageStore::new(),
            written: vec![0; 0x10000 / 64],
            structural: HashMap::new(),
            diagnostics: Vec::new(),
            listing: Vec::new(),
            counts: PassCounts::new(),
            table_full: None,
            last_line: None,
        })
    }

    fn logical_pc(&self) -> u16 {
        self.pc.wrapping_add(self.phase)
    }

    fn symbol_id(&mut self, name: &str) -> Result<SymbolId, FatalError> {
        self.symbols.lookup_or_insert(name).map_err(|err| match err {
            SymbolError::TableFull(limit) => FatalError::SymbolTableFull { limit },
            _ => FatalError::SymbolTableFull {
                limit: self.options.symbol_limit,
            },
        })
    }

    /// Names follow the TSC setting: strict mode is case sensitive.
    fn apply_case_mode(&mut self) {
        let strict = self.options.strict;
        self.symbols.set_case_sensitive(strict);
        self.macros.set_case_sensitive(strict);
        self.texts.set_case_sensitive(strict);
    }

    fn select_cpu(&mut self, cpu: CpuType) -> Result<(), FatalError> {
        if cpu != self.options.cpu {
            info!("switching CPU to {cpu}");
        }
        self.handler = handler_for(self.registry, cpu)?;
        self.options.cpu = cpu;
        if !is_6809_family(cpu) {
            self.dp = 0;
        }
        Ok(())
    }

    /// Run `f` with an encoding context for the current line and merge
    /// its output into `res`.
    fn with_ctx<R>(
        &mut self,
        res: &mut LineResult,
        f: impl FnOnce(&mut EncodeContext<'_>) -> R,
    ) -> R {
        let pc = self.logical_pc();
        let mut ctx = EncodeContext::new(
            &mut self.symbols,
            &self.options,
            &self.aliases,
            pc,
            self.pass,
            self.dp,
        );
        let out = f(&mut ctx);
        let EncodeContext {
            bytes,
            relocations,
            errors,
            warnings,
            undefined,
            table_full,
            ..
        } = ctx;
        let base = res.bytes.len();
        res.relocations
            .extend(relocations.into_iter().map(|reloc| PendingRelocation {
                offset: reloc.offset + base,
                ..reloc
            }));
        res.bytes.extend(bytes);
        res.errors |= errors;
        res.warnings |= warnings;
        if res.undefined.is_none() {
            res.undefined = undefined;
        }
        if table_full.is_some() {
            self.table_full = table_full;
        }
        out
    }

    fn eval(&mut self, text: &str, res: &mut LineResult) -> Value {
        self.with_ctx(res, |ctx| ctx.eval_str(text))
    }

    /// Record an error found while expanding a line in pass 1, so pass 2
    /// can report it.
    fn structural(
        &mut self,
        id: LineId,
        res: &mut LineResult,
        errors: ErrorFlags,
        warnings: WarningFlags,
    ) {
        res.errors |= errors;
        res.warnings |= warnings;
        let entry = self.structural.entry(id).or_default();
        entry.0 |= errors;
        entry.1 |= warnings;
    }

    fn conditions(&mut self) -> Conditions<'_> {
        let pc = self.logical_pc();
        Conditions {
            symbols: &mut self.symbols,
            options: &self.options,
            aliases: &self.aliases,
            pc,
            pass: self.pass,
            dp: self.dp,
            errors: ErrorFlags::empty(),
            undefined: None,
        }
    }
}

/// Evaluates IF-family conditions against the session's symbols.
struct Conditions<'s> {
    symbols: &'s mut SymbolTable,
    options: &'s AsmOptions,
    aliases: &'s HashMap<String, String>,
    pc: u16,
    pass: u8,
    dp: u8,
    errors: ErrorFlags,
    undefined: Option<String>,
}

impl Conditions<'_> {
    fn value(&mut self, text: &str) -> Value {
        let mut ctx = EncodeContext::new(
            &mut *self.symbols,
            self.options,
            self.aliases,
            self.pc,
            self.pass,
            self.dp,
        );
        let value = ctx.eval_str(text);
        self.errors |= ctx.errors;
        if self.undefined.is_none() {
            self.undefined = ctx.undefined.take();
        }
        value
    }

    /// Defined and reached in this pass, or declared external.
    fn defined(&self, name: &str) -> bool {
        self.symbols
            .lookup(name.trim())
            .map(|id| self.symbols.get(id))
            .is_some_and(|sym| {
                (sym.category.is_defined() && sym.passed())
                    || sym.category == SymbolCategory::External
            })
    }
}

impl ConditionEvaluator for Conditions<'_> {
    fn condition(&mut self, directive: ConditionalDirective, operand: &str) -> bool {
        match directive {
            ConditionalDirective::If => self.value(operand).value != 0,
            ConditionalDirective::IfNot => self.value(operand).value == 0,
            ConditionalDirective::IfSame => strings_match(operand),
            ConditionalDirective::IfNotSame => !strings_match(operand),
            ConditionalDirective::IfDefined => self.defined(operand),
            ConditionalDirective::IfNotDefined => !self.defined(operand),
            ConditionalDirective::Else | ConditionalDirective::EndIf => false,
        }
    }

    fn count(&mut self, text: &str) -> Option<i64> {
        let value = self.value(text);
        value.known().then_some(value.value)
    }
}
