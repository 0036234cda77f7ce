// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Symbol store: global symbols, numeric local labels, and the category
//! rules that govern redefinition.

use std::collections::BTreeMap;

use bitflags::bitflags;
use thiserror::Error;

/// Default number of global symbols before the table is considered full.
pub const MAX_ENTRIES: usize = 66000;

/// Kind of a symbol, driving how definitions and references are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory {
    /// Referenced but never given a value yet.
    Empty,
    /// `EQU` with an absolute value.
    Constant,
    /// `SET` with an absolute value.
    Variable,
    /// Address label.
    Label,
    /// `SET` with a relocatable value.
    VarAddress,
    /// `EXTERN` declaration.
    External,
    /// `SET` with an external value.
    VarExternal,
    /// Referenced before definition in the current pass.
    Unresolved,
    /// Public symbol with a definition.
    Public,
    /// Declared `PUBLIC` but not defined yet.
    PublicUndefined,
    Macro,
    Text,
    RegisterAlias,
    Common,
    CommonMember,
    LocalLabel,
    /// Local label known from an earlier pass but not yet reached in this one.
    EmptyLocal,
}

impl SymbolCategory {
    /// True when the symbol carries a usable value.
    pub fn is_defined(self) -> bool {
        !matches!(
            self,
            Self::Empty | Self::Unresolved | Self::PublicUndefined | Self::EmptyLocal
        )
    }

    pub fn is_set_variable(self) -> bool {
        matches!(self, Self::Variable | Self::VarAddress | Self::VarExternal)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SymbolFlags: u8 {
        /// Referenced before its definition at least once.
        const FORWARD_REF = 0x01;
        /// Definition already passed in the current pass.
        const PASSED = 0x02;
        /// Public symbol whose value is absolute.
        const ABS_PUBLIC = 0x04;
        /// Value was computed from an uncertain expression.
        const UNCERTAIN = 0x08;
    }
}

/// Auxiliary symbol data: flags, or the owning common block of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolLink {
    Flags(SymbolFlags),
    Parent(SymbolId, SymbolFlags),
}

impl SymbolLink {
    pub fn flags(&self) -> SymbolFlags {
        match self {
            Self::Flags(flags) | Self::Parent(_, flags) => *flags,
        }
    }

    fn flags_mut(&mut self) -> &mut SymbolFlags {
        match self {
            Self::Flags(flags) | Self::Parent(_, flags) => flags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub category: SymbolCategory,
    pub value: u16,
    pub link: SymbolLink,
}

impl Symbol {
    pub fn flags(&self) -> SymbolFlags {
        self.link.flags()
    }

    pub fn passed(&self) -> bool {
        self.flags().contains(SymbolFlags::PASSED)
    }

    /// Defined earlier in this pass from a value that cannot change.
    pub fn certain(&self) -> bool {
        self.passed() && !self.flags().contains(SymbolFlags::UNCERTAIN)
    }

    pub fn parent(&self) -> Option<SymbolId> {
        match self.link {
            SymbolLink::Parent(parent, _) => Some(parent),
            SymbolLink::Flags(_) => None,
        }
    }
}

/// Search direction of a local label reference (`1F` / `1B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of resolving a local label reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalHit {
    pub address: u16,
    pub category: SymbolCategory,
}

/// A resolved name: a global symbol or a local label occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolHandle {
    Global(SymbolId),
    Local(Option<LocalHit>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol table full ({0} entries)")]
    TableFull(usize),
    #[error("multiply defined symbol")]
    MultiplyDefined,
    #[error("value changed between passes")]
    Phase,
}

/// Split a local label reference like `10F` into its digits and direction.
pub fn parse_local_reference(name: &str) -> Option<(&str, Direction)> {
    if !name.is_ascii() {
        return None;
    }
    let (digits, suffix) = name.split_at(name.len().checked_sub(1)?);
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match suffix {
        "F" | "f" => Some((digits, Direction::Forward)),
        "B" | "b" => Some((digits, Direction::Backward)),
        _ => None,
    }
}

/// True for a label field naming a numeric local label.
pub fn is_local_label(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|c| c.is_ascii_digit())
}

/// Global symbols indexed by name plus the `(name, address)` local index.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<Symbol>,
    index: BTreeMap<String, SymbolId>,
    locals: BTreeMap<(String, u16), SymbolCategory>,
    case_sensitive: bool,
    limit: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_limit(MAX_ENTRIES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
            locals: BTreeMap::new(),
            case_sensitive: false,
            limit,
        }
    }

    /// Switch name folding. Names already stored keep their spelling.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_ascii_uppercase()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.index.get(&self.key(name)).copied()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.entries[id.index()]
    }

    /// Find or create a global symbol. New symbols start as `Empty`.
    pub fn lookup_or_insert(&mut self, name: &str) -> Result<SymbolId, SymbolError> {
        let key = self.key(name);
        if let Some(id) = self.index.get(&key) {
            return Ok(*id);
        }
        if self.entries.len() >= self.limit {
            return Err(SymbolError::TableFull(self.limit));
        }
        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(Symbol {
            name: key.clone(),
            category: SymbolCategory::Empty,
            value: 0,
            link: SymbolLink::Flags(SymbolFlags::empty()),
        });
        self.index.insert(key, id);
        Ok(id)
    }

    /// Resolve any name, redirecting `nF`/`nB` to the local label index.
    pub fn resolve(&mut self, name: &str, pc: u16) -> Result<SymbolHandle, SymbolError> {
        if let Some((digits, dir)) = parse_local_reference(name) {
            return Ok(SymbolHandle::Local(self.find_local(digits, dir, pc)));
        }
        let id = self.lookup_or_insert(name)?;
        let sym = &mut self.entries[id.index()];
        match sym.category {
            SymbolCategory::Empty => {
                sym.category = SymbolCategory::Unresolved;
                sym.link.flags_mut().insert(SymbolFlags::FORWARD_REF);
            }
            _ if !sym.passed() => sym.link.flags_mut().insert(SymbolFlags::FORWARD_REF),
            _ => {}
        }
        Ok(SymbolHandle::Global(id))
    }

    /// Forward search finds the nearest label strictly above `pc`; backward
    /// search the nearest at or below it.
    pub fn find_local(&self, digits: &str, dir: Direction, pc: u16) -> Option<LocalHit> {
        let name = digits.to_string();
        let hit = match dir {
            Direction::Forward => {
                let start = pc.checked_add(1)?;
                self.locals
                    .range((name.clone(), start)..=(name, u16::MAX))
                    .next()
            }
            Direction::Backward => self.locals.range((name.clone(), 0)..=(name, pc)).next_back(),
        };
        hit.map(|((_, address), category)| LocalHit {
            address: *address,
            category: *category,
        })
    }

    pub fn define_local(&mut self, digits: &str, address: u16) {
        self.locals
            .insert((digits.to_string(), address), SymbolCategory::LocalLabel);
    }

    /// Define an address label at `address`.
    pub fn define_label(&mut self, id: SymbolId, address: u16, pass: u8) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        if sym.passed() {
            return Err(SymbolError::MultiplyDefined);
        }
        let mut result = Ok(());
        match sym.category {
            SymbolCategory::Empty | SymbolCategory::Unresolved => {
                sym.category = SymbolCategory::Label;
            }
            SymbolCategory::PublicUndefined => sym.category = SymbolCategory::Public,
            SymbolCategory::Label | SymbolCategory::Public => {
                if pass > 1 && sym.value != address {
                    result = Err(SymbolError::Phase);
                }
            }
            _ => return Err(SymbolError::MultiplyDefined),
        }
        sym.value = address;
        sym.link.flags_mut().insert(SymbolFlags::PASSED);
        result
    }

    /// Define a symbol through `EQU` (`Constant` or `Label`) or `SET`
    /// (`Variable`, `VarAddress`, `VarExternal`).
    pub fn define_value(
        &mut self,
        id: SymbolId,
        category: SymbolCategory,
        value: u16,
    ) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        let redefinable = category.is_set_variable() && sym.category.is_set_variable();
        if sym.passed() && !redefinable {
            return Err(SymbolError::MultiplyDefined);
        }
        sym.category = match (sym.category, category) {
            (SymbolCategory::PublicUndefined | SymbolCategory::Public, SymbolCategory::Constant) => {
                sym.link.flags_mut().insert(SymbolFlags::ABS_PUBLIC);
                SymbolCategory::Public
            }
            (SymbolCategory::PublicUndefined | SymbolCategory::Public, SymbolCategory::Label) => {
                SymbolCategory::Public
            }
            (SymbolCategory::Empty | SymbolCategory::Unresolved, new) => new,
            (old, new) if old == new => new,
            (old, new) if old.is_set_variable() && new.is_set_variable() => new,
            _ => return Err(SymbolError::MultiplyDefined),
        };
        sym.value = value;
        sym.link.flags_mut().insert(SymbolFlags::PASSED);
        Ok(())
    }

    pub fn set_uncertain(&mut self, id: SymbolId, uncertain: bool) {
        self.entries[id.index()]
            .link
            .flags_mut()
            .set(SymbolFlags::UNCERTAIN, uncertain);
    }

    pub fn declare_external(&mut self, id: SymbolId) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        match sym.category {
            SymbolCategory::Empty | SymbolCategory::Unresolved | SymbolCategory::External => {
                sym.category = SymbolCategory::External;
                sym.value = 0;
                sym.link.flags_mut().insert(SymbolFlags::PASSED);
                Ok(())
            }
            _ => Err(SymbolError::MultiplyDefined),
        }
    }

    pub fn declare_public(&mut self, id: SymbolId) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        sym.category = match sym.category {
            SymbolCategory::Empty | SymbolCategory::Unresolved => SymbolCategory::PublicUndefined,
            SymbolCategory::Label | SymbolCategory::Public => SymbolCategory::Public,
            SymbolCategory::PublicUndefined => SymbolCategory::PublicUndefined,
            SymbolCategory::Constant => {
                sym.link.flags_mut().insert(SymbolFlags::ABS_PUBLIC);
                SymbolCategory::Public
            }
            _ => return Err(SymbolError::MultiplyDefined),
        };
        Ok(())
    }

    /// Define a symbol whose value indexes a side table (macros, text,
    /// register aliases, common blocks).
    pub fn define_special(
        &mut self,
        id: SymbolId,
        category: SymbolCategory,
        value: u16,
    ) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        match sym.category {
            SymbolCategory::Empty | SymbolCategory::Unresolved => {}
            old if old == category && (!sym.passed() || category == SymbolCategory::Text) => {}
            _ => return Err(SymbolError::MultiplyDefined),
        }
        sym.category = category;
        sym.value = value;
        sym.link.flags_mut().insert(SymbolFlags::PASSED);
        Ok(())
    }

    pub fn define_common_member(
        &mut self,
        id: SymbolId,
        parent: SymbolId,
        offset: u16,
    ) -> Result<(), SymbolError> {
        let sym = &mut self.entries[id.index()];
        match sym.category {
            SymbolCategory::Empty | SymbolCategory::Unresolved => {}
            SymbolCategory::CommonMember if !sym.passed() => {}
            _ => return Err(SymbolError::MultiplyDefined),
        }
        sym.category = SymbolCategory::CommonMember;
        sym.value = offset;
        sym.link = SymbolLink::Parent(parent, SymbolFlags::PASSED);
        Ok(())
    }

    /// Reset per-pass state: nothing has been passed yet and every local
    /// label becomes a placeholder until it is reached again.
    pub fn start_pass(&mut self) {
        for sym in &mut self.entries {
            sym.link.flags_mut().remove(SymbolFlags::PASSED);
        }
        for category in self.locals.values_mut() {
            *category = SymbolCategory::EmptyLocal;
        }
    }

    /// Turn every still-undefined symbol into an external reference.
    pub fn externalize_undefined(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        for sym in &mut self.entries {
            if matches!(sym.category, SymbolCategory::Empty | SymbolCategory::Unresolved) {
                sym.category = SymbolCategory::External;
                sym.value = 0;
                names.push(sym.name.clone());
            }
        }
        names
    }

    /// Name of a label or public symbol at `address`, if any.
    pub fn find_symbol_at(&self, address: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|sym| {
                matches!(sym.category, SymbolCategory::Label | SymbolCategory::Public)
                    && sym.value == address
            })
            .map(|sym| sym.name.as_str())
    }

    /// Symbols sorted by name.
    pub fn sorted(&self) -> Vec<&Symbol> {
        self.index
            .values()
            .map(|id| &self.entries[id.index()])
            .collect()
    }

    pub fn entries(&self) -> &[Symbol] {
        &self.entries
    }
}
