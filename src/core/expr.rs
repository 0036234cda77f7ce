// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Expression evaluation with relocation categories.
//!
//! Every value carries its relocation state next to the number: how many
//! module-relative (internal) addresses it contains, which external symbol
//! it refers to, and whether arithmetic collapsed a relocatable value into
//! an absolute one. The encoders use this to pick addressing modes and to
//! emit relocation records.

use bitflags::bitflags;
use thiserror::Error;

use crate::core::symbol_table::{
    parse_local_reference, SymbolCategory, SymbolError, SymbolFlags, SymbolHandle, SymbolId,
    SymbolTable,
};
use crate::core::text_utils::{is_ident_char, Cursor};

bitflags! {
    /// Relocation category of an expression or relocation record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ExprCategory: u8 {
        const INTERNAL = 0x01;
        const EXTERNAL = 0x02;
        const PUBLIC = 0x04;
        const FIXED = 0x08;
        const NEGATIVE = 0x10;
        const SINGLE_BYTE = 0x20;
        const EXT_OFFSET = 0x40;
    }
}

/// Error returned from expression evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("syntax error in expression: {0}")]
    Syntax(String),
    #[error("division by zero")]
    DivideByZero,
    #[error("expression combines different external symbols")]
    MixedExternals,
    #[error("operator not allowed on an external symbol")]
    ExternalArithmetic,
    #[error("{0} cannot be used in an expression")]
    NotAValue(String),
    #[error("symbol table full ({0} entries)")]
    TableFull(usize),
}

impl From<SymbolError> for ExprError {
    fn from(err: SymbolError) -> Self {
        match err {
            SymbolError::TableFull(limit) => Self::TableFull(limit),
            other => Self::Syntax(other.to_string()),
        }
    }
}

/// Net relocation content of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Relocation {
    internal: i32,
    external: Option<(SymbolId, i32)>,
    fixed: bool,
    public: bool,
}

impl Relocation {
    fn internal() -> Self {
        Self {
            internal: 1,
            ..Self::default()
        }
    }

    fn external(id: SymbolId) -> Self {
        Self {
            external: Some((id, 1)),
            ..Self::default()
        }
    }

    fn negate(self) -> Self {
        Self {
            internal: -self.internal,
            external: self.external.map(|(id, w)| (id, -w)),
            ..self
        }
    }

    fn additive(l: Self, r: Self, sign: i32) -> Result<Self, ExprError> {
        let external = match (l.external, r.external) {
            (None, None) => None,
            (Some(e), None) => Some(e),
            (None, Some((id, w))) => Some((id, sign * w)),
            (Some((a, wa)), Some((b, wb))) if a == b => {
                let w = wa + sign * wb;
                (w != 0).then_some((a, w))
            }
            _ => return Err(ExprError::MixedExternals),
        };
        if external.is_some_and(|(_, w)| w.abs() > 1) {
            return Err(ExprError::ExternalArithmetic);
        }
        let mut out = Self {
            internal: l.internal + sign * r.internal,
            external,
            fixed: l.fixed || r.fixed,
            public: l.public || r.public,
        };
        if out.internal.abs() > 1 {
            out.internal = 0;
            out.fixed = true;
        }
        Ok(out)
    }

    fn collapse(l: Self, r: Self) -> Result<Self, ExprError> {
        if l.external.is_some() || r.external.is_some() {
            return Err(ExprError::ExternalArithmetic);
        }
        Ok(Self {
            internal: 0,
            external: None,
            fixed: l.fixed || r.fixed || l.internal != 0 || r.internal != 0,
            public: false,
        })
    }
}

/// An evaluated expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub value: i64,
    /// Some symbol has no value yet.
    pub unknown: bool,
    /// Every symbol involved was defined earlier in the current pass.
    pub certain: bool,
    /// First undefined name encountered.
    pub undefined: Option<String>,
    reloc: Relocation,
}

impl Value {
    pub fn constant(value: i64) -> Self {
        Self {
            value,
            unknown: false,
            certain: true,
            undefined: None,
            reloc: Relocation::default(),
        }
    }

    fn unknown(name: &str) -> Self {
        Self {
            value: 0,
            unknown: true,
            certain: false,
            undefined: Some(name.to_string()),
            reloc: Relocation::default(),
        }
    }

    pub fn category(&self) -> ExprCategory {
        let mut cat = ExprCategory::empty();
        if self.reloc.internal != 0 {
            cat |= ExprCategory::INTERNAL;
        }
        if self.reloc.external.is_some() {
            cat |= ExprCategory::EXTERNAL;
        }
        if self.reloc.public {
            cat |= ExprCategory::PUBLIC;
        }
        if self.reloc.fixed {
            cat |= ExprCategory::FIXED;
        }
        if self.reloc.internal < 0 || self.reloc.external.is_some_and(|(_, w)| w < 0) {
            cat |= ExprCategory::NEGATIVE;
        }
        cat
    }

    /// True when a loader would have to patch this value.
    pub fn is_relocatable(&self) -> bool {
        self.reloc.internal != 0 || self.reloc.external.is_some()
    }

    pub fn is_external(&self) -> bool {
        self.reloc.external.is_some()
    }

    pub fn external_symbol(&self) -> Option<SymbolId> {
        self.reloc.external.map(|(id, _)| id)
    }

    pub fn known(&self) -> bool {
        !self.unknown
    }

    /// Low 16 bits of the value.
    pub fn word(&self) -> u16 {
        self.value as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    LogicAnd,
    LogicOr,
}

impl BinaryOp {
    /// Binding strength, 10 binds tightest.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 10,
            Self::Add | Self::Sub => 9,
            Self::Shl | Self::Shr => 8,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 7,
            Self::Eq | Self::Ne => 6,
            Self::BitAnd => 5,
            Self::BitXor => 4,
            Self::BitOr => 3,
            Self::LogicAnd => 2,
            Self::LogicOr => 1,
        }
    }
}

fn peek_operator(cur: &Cursor<'_>) -> Option<(BinaryOp, usize)> {
    let c = cur.peek()?;
    let n = cur.peek_at(1);
    Some(match (c, n) {
        (b'*', _) => (BinaryOp::Mul, 1),
        (b'/', _) => (BinaryOp::Div, 1),
        (b'%', _) => (BinaryOp::Mod, 1),
        (b'+', _) => (BinaryOp::Add, 1),
        (b'-', _) => (BinaryOp::Sub, 1),
        (b'<', Some(b'<')) => (BinaryOp::Shl, 2),
        (b'<', Some(b'=')) => (BinaryOp::Le, 2),
        (b'<', Some(b'>')) => (BinaryOp::Ne, 2),
        (b'<', _) => (BinaryOp::Lt, 1),
        (b'>', Some(b'>')) => (BinaryOp::Shr, 2),
        (b'>', Some(b'=')) => (BinaryOp::Ge, 2),
        (b'>', _) => (BinaryOp::Gt, 1),
        (b'=', Some(b'=')) => (BinaryOp::Eq, 2),
        (b'=', _) => (BinaryOp::Eq, 1),
        (b'!', Some(b'=')) => (BinaryOp::Ne, 2),
        (b'&', Some(b'&')) => (BinaryOp::LogicAnd, 2),
        (b'&', _) => (BinaryOp::BitAnd, 1),
        (b'|', Some(b'|')) => (BinaryOp::LogicOr, 2),
        (b'|', _) => (BinaryOp::BitOr, 1),
        (b'^', _) => (BinaryOp::BitXor, 1),
        _ => return None,
    })
}

/// Apply a binary operator to two values.
pub fn apply_binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, ExprError> {
    let unknown = l.unknown || r.unknown;
    let reloc = match op {
        BinaryOp::Add => Relocation::additive(l.reloc, r.reloc, 1)?,
        BinaryOp::Sub => Relocation::additive(l.reloc, r.reloc, -1)?,
        _ => Relocation::collapse(l.reloc, r.reloc)?,
    };
    let (a, b) = (l.value, r.value);
    let value = match op {
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::Mod if b == 0 => {
            if unknown {
                0
            } else {
                return Err(ExprError::DivideByZero);
            }
        }
        BinaryOp::Div => a.wrapping_div(b),
        BinaryOp::Mod => a.wrapping_rem(b),
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Shl => {
            if (0..64).contains(&b) {
                a << b
            } else {
                0
            }
        }
        BinaryOp::Shr => {
            if (0..64).contains(&b) {
                a >> b
            } else {
                0
            }
        }
        BinaryOp::Lt => (a < b) as i64,
        BinaryOp::Le => (a <= b) as i64,
        BinaryOp::Gt => (a > b) as i64,
        BinaryOp::Ge => (a >= b) as i64,
        BinaryOp::Eq => (a == b) as i64,
        BinaryOp::Ne => (a != b) as i64,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::BitOr => a | b,
        BinaryOp::LogicAnd => (a != 0 && b != 0) as i64,
        BinaryOp::LogicOr => (a != 0 || b != 0) as i64,
    };
    Ok(Value {
        value,
        unknown,
        certain: l.certain && r.certain,
        undefined: l.undefined.or(r.undefined),
        reloc,
    })
}

/// Settings that affect how expressions are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalEnv {
    /// Address of the current line, phase offset applied.
    pub pc: u16,
    /// GNU-compatible syntax: `0x`/`0b` prefixes and `$` in identifiers.
    pub gnu: bool,
}

/// Recursive-descent evaluator over a text cursor.
pub struct Evaluator<'a> {
    symbols: &'a mut SymbolTable,
    env: EvalEnv,
}

impl<'a> Evaluator<'a> {
    pub fn new(symbols: &'a mut SymbolTable, env: EvalEnv) -> Self {
        Self { symbols, env }
    }

    /// Evaluate the longest expression at the cursor.
    pub fn evaluate(&mut self, cur: &mut Cursor<'_>) -> Result<Value, ExprError> {
        self.parse_binary(cur, 1)
    }

    /// Evaluate `text`, which must hold exactly one expression.
    pub fn evaluate_str(&mut self, text: &str) -> Result<Value, ExprError> {
        let mut cur = Cursor::new(text);
        let value = self.evaluate(&mut cur)?;
        cur.skip_ws();
        if !cur.at_end() {
            return Err(ExprError::Syntax(format!("unexpected '{}'", cur.rest())));
        }
        Ok(value)
    }

    fn parse_binary(&mut self, cur: &mut Cursor<'_>, min_prec: u8) -> Result<Value, ExprError> {
        let mut lhs = self.parse_unary(cur)?;
        loop {
            cur.skip_ws();
            let Some((op, len)) = peek_operator(cur) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            cur.set_pos(cur.pos() + len);
            let rhs = self.parse_binary(cur, prec + 1)?;
            lhs = apply_binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, cur: &mut Cursor<'_>) -> Result<Value, ExprError> {
        cur.skip_ws();
        match cur.peek() {
            Some(b'-') => {
                cur.next();
                let v = self.parse_unary(cur)?;
                Ok(Value {
                    value: v.value.wrapping_neg(),
                    reloc: v.reloc.negate(),
                    ..v
                })
            }
            Some(b'+') => {
                cur.next();
                self.parse_unary(cur)
            }
            Some(b'~') => {
                cur.next();
                let v = self.parse_unary(cur)?;
                let reloc = Relocation::collapse(v.reloc, Relocation::default())?;
                Ok(Value {
                    value: !v.value,
                    reloc,
                    ..v
                })
            }
            Some(b'!') => {
                cur.next();
                let v = self.parse_unary(cur)?;
                let reloc = Relocation::collapse(v.reloc, Relocation::default())?;
                Ok(Value {
                    value: (v.value == 0) as i64,
                    reloc,
                    ..v
                })
            }
            _ => self.parse_primary(cur),
        }
    }

    fn parse_primary(&mut self, cur: &mut Cursor<'_>) -> Result<Value, ExprError> {
        let Some(c) = cur.peek() else {
            return Err(ExprError::Syntax("missing operand".to_string()));
        };
        match c {
            b'(' => {
                cur.next();
                let v = self.parse_binary(cur, 1)?;
                cur.skip_ws();
                if !cur.eat(b')') {
                    return Err(ExprError::Syntax("missing ')'".to_string()));
                }
                Ok(v)
            }
            b'$' => {
                cur.next();
                radix_literal(cur, 16)
            }
            b'%' => {
                cur.next();
                radix_literal(cur, 2)
            }
            b'@' => {
                cur.next();
                radix_literal(cur, 8)
            }
            b'\'' => {
                cur.next();
                let ch = cur
                    .next()
                    .ok_or_else(|| ExprError::Syntax("missing character".to_string()))?;
                cur.eat(b'\'');
                Ok(Value::constant(ch as i64))
            }
            b'"' => {
                cur.next();
                let body = cur.take_while(|c| c != b'"');
                if !cur.eat(b'"') || body.is_empty() || body.len() > 2 {
                    return Err(ExprError::Syntax("bad string constant".to_string()));
                }
                let value = body.bytes().fold(0i64, |acc, b| (acc << 8) | b as i64);
                Ok(Value::constant(value))
            }
            b'*' => {
                cur.next();
                Ok(Value {
                    reloc: Relocation::internal(),
                    ..Value::constant(self.env.pc as i64)
                })
            }
            b'0'..=b'9' => self.parse_numeric(cur),
            _ => match cur.take_ident(self.env.gnu) {
                Some(name) => self.symbol_value(name),
                None => Err(ExprError::Syntax(format!("unexpected '{}'", c as char))),
            },
        }
    }

    fn parse_numeric(&mut self, cur: &mut Cursor<'_>) -> Result<Value, ExprError> {
        let gnu = self.env.gnu;
        let token = cur.take_while(|c| is_ident_char(c, gnu));
        let bad = || ExprError::Syntax(format!("invalid number '{token}'"));
        if gnu {
            if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
                return i64::from_str_radix(hex, 16)
                    .map(Value::constant)
                    .map_err(|_| bad());
            }
            if let Some(bin) = token.strip_prefix("0b").or_else(|| token.strip_prefix("0B")) {
                if !bin.is_empty() {
                    return i64::from_str_radix(bin, 2)
                        .map(Value::constant)
                        .map_err(|_| bad());
                }
            }
        }
        if token.bytes().all(|c| c.is_ascii_digit()) {
            return token.parse::<i64>().map(Value::constant).map_err(|_| bad());
        }
        let (digits, dir) = parse_local_reference(token).ok_or_else(bad)?;
        match self.symbols.find_local(digits, dir, self.env.pc) {
            Some(hit) => Ok(Value {
                certain: hit.category == SymbolCategory::LocalLabel,
                reloc: Relocation::internal(),
                ..Value::constant(hit.address as i64)
            }),
            None => Ok(Value::unknown(token)),
        }
    }

    fn symbol_value(&mut self, name: &str) -> Result<Value, ExprError> {
        let SymbolHandle::Global(id) = self.symbols.resolve(name, self.env.pc)? else {
            return Ok(Value::unknown(name));
        };
        let sym = self.symbols.get(id);
        let base = Value {
            certain: sym.certain(),
            ..Value::constant(sym.value as i64)
        };
        let reloc = match sym.category {
            SymbolCategory::Label | SymbolCategory::VarAddress => Relocation::internal(),
            SymbolCategory::Public if sym.flags().contains(SymbolFlags::ABS_PUBLIC) => {
                Relocation::default()
            }
            SymbolCategory::Public => Relocation {
                public: true,
                ..Relocation::internal()
            },
            SymbolCategory::External | SymbolCategory::VarExternal | SymbolCategory::Common => {
                Relocation::external(id)
            }
            SymbolCategory::CommonMember => match sym.parent() {
                Some(parent) => Relocation::external(parent),
                None => Relocation::default(),
            },
            SymbolCategory::Empty
            | SymbolCategory::Unresolved
            | SymbolCategory::PublicUndefined
            | SymbolCategory::EmptyLocal => return Ok(Value::unknown(name)),
            SymbolCategory::Macro | SymbolCategory::Text | SymbolCategory::RegisterAlias => {
                return Err(ExprError::NotAValue(sym.name.clone()))
            }
            SymbolCategory::Constant | SymbolCategory::Variable | SymbolCategory::LocalLabel => {
                Relocation::default()
            }
        };
        Ok(Value { reloc, ..base })
    }
}

fn radix_literal(cur: &mut Cursor<'_>, radix: u32) -> Result<Value, ExprError> {
    let digits = cur.take_while(|c| (c as char).is_digit(radix));
    if digits.is_empty() {
        return Err(ExprError::Syntax("missing digits".to_string()));
    }
    i64::from_str_radix(digits, radix)
        .map(Value::constant)
        .map_err(|_| ExprError::Syntax(format!("number too large: {digits}")))
}

/// Returns true if the value fits in a signed or unsigned 8-bit byte (-128..=255).
pub fn value_fits_byte(value: i64) -> bool {
    (-128..=0xff).contains(&value)
}

/// Returns true if the value fits in a signed or unsigned 16-bit word (-32768..=65535).
pub fn value_fits_word(value: i64) -> bool {
    (-32768..=0xffff).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eval_in(table: &mut SymbolTable, text: &str, gnu: bool) -> Result<Value, ExprError> {
        Evaluator::new(table, EvalEnv { pc: 0x1000, gnu }).evaluate_str(text)
    }

    fn eval(text: &str) -> Result<Value, ExprError> {
        eval_in(&mut SymbolTable::new(), text, false)
    }

    fn labels(names: &[(&str, u16)]) -> SymbolTable {
        let mut table = SymbolTable::new();
        for (name, addr) in names {
            let id = table.lookup_or_insert(name).unwrap();
            table.define_label(id, *addr, 1).unwrap();
        }
        table
    }

    #[test]
    fn literals_in_every_radix() {
        assert_eq!(eval("42").unwrap().value, 42);
        assert_eq!(eval("$2A").unwrap().value, 42);
        assert_eq!(eval("%101010").unwrap().value, 42);
        assert_eq!(eval("@52").unwrap().value, 42);
        assert_eq!(eval("'*").unwrap().value, b'*' as i64);
        assert_eq!(eval("'A'").unwrap().value, 65);
        assert_eq!(eval("\"AB\"").unwrap().value, 0x4142);
        assert!(eval("0x2A").is_err());
        assert_eq!(
            eval_in(&mut SymbolTable::new(), "0x2A+0b11", true)
                .unwrap()
                .value,
            45
        );
    }

    #[test]
    fn precedence_follows_c_levels() {
        assert_eq!(eval("2+3*4").unwrap().value, 14);
        assert_eq!(eval("(2+3)*4").unwrap().value, 20);
        assert_eq!(eval("1<<4|1").unwrap().value, 17);
        assert_eq!(eval("6&3^1").unwrap().value, 3);
        assert_eq!(eval("1+1==2&&3>2").unwrap().value, 1);
        assert_eq!(eval("10-2-3").unwrap().value, 5);
        assert_eq!(eval("-2*-3").unwrap().value, 6);
        assert_eq!(eval("~0&$FF").unwrap().value, 0xFF);
        assert_eq!(eval("!0").unwrap().value, 1);
        assert_eq!(eval("7%4").unwrap().value, 3);
    }

    #[test]
    fn location_counter_is_internal() {
        let v = eval("*+2").unwrap();
        assert_eq!(v.value, 0x1002);
        assert_eq!(v.category(), ExprCategory::INTERNAL);
    }

    #[test]
    fn label_difference_is_absolute() {
        let mut table = labels(&[("L1", 0x10), ("L2", 0x30)]);
        let v = eval_in(&mut table, "L2-L1", false).unwrap();
        assert_eq!(v.value, 0x20);
        assert!(v.category().is_empty());
        assert!(v.certain);
    }

    #[test]
    fn relocatable_arithmetic_collapses_to_fixed() {
        let mut table = labels(&[("L1", 0x10), ("L2", 0x30)]);
        let v = eval_in(&mut table, "L1*2", false).unwrap();
        assert_eq!(v.category(), ExprCategory::FIXED);
        let v = eval_in(&mut table, "L1+L2", false).unwrap();
        assert_eq!(v.category(), ExprCategory::FIXED);
        let v = eval_in(&mut table, "-L1", false).unwrap();
        assert_eq!(
            v.category(),
            ExprCategory::INTERNAL | ExprCategory::NEGATIVE
        );
    }

    #[test]
    fn external_rules() {
        let mut table = labels(&[("L1", 0x10)]);
        for name in ["EXT1", "EXT2"] {
            let id = table.lookup_or_insert(name).unwrap();
            table.declare_external(id).unwrap();
        }
        let v = eval_in(&mut table, "EXT1+4", false).unwrap();
        assert_eq!(v.category(), ExprCategory::EXTERNAL);
        let v = eval_in(&mut table, "EXT1+L1", false).unwrap();
        assert_eq!(
            v.category(),
            ExprCategory::EXTERNAL | ExprCategory::INTERNAL
        );
        assert!(eval_in(&mut table, "EXT1-EXT1", false)
            .unwrap()
            .category()
            .is_empty());
        assert_eq!(
            eval_in(&mut table, "EXT1+EXT2", false),
            Err(ExprError::MixedExternals)
        );
        assert_eq!(
            eval_in(&mut table, "EXT1*2", false),
            Err(ExprError::ExternalArithmetic)
        );
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval("1/0"), Err(ExprError::DivideByZero));
        assert_eq!(eval("1%0"), Err(ExprError::DivideByZero));
        let v = eval("1/LATER").unwrap();
        assert!(v.unknown);
        assert_eq!(v.undefined.as_deref(), Some("LATER"));
    }

    #[test]
    fn forward_reference_is_uncertain() {
        let mut table = SymbolTable::new();
        let v = eval_in(&mut table, "AHEAD", false).unwrap();
        assert!(v.unknown && !v.certain);
        let id = table.lookup("AHEAD").unwrap();
        table.define_label(id, 0x1234, 1).unwrap();
        table.start_pass();
        let v = eval_in(&mut table, "AHEAD", false).unwrap();
        assert!(v.known() && !v.certain);
        assert_eq!(v.value, 0x1234);
    }

    #[test]
    fn local_label_references() {
        let mut table = SymbolTable::new();
        table.define_local("1", 0x0F00);
        table.define_local("1", 0x1100);
        assert_eq!(eval_in(&mut table, "1B", false).unwrap().value, 0x0F00);
        assert_eq!(eval_in(&mut table, "1f", false).unwrap().value, 0x1100);
        assert!(eval_in(&mut table, "2F", false).unwrap().unknown);
    }

    #[test]
    fn gnu_identifiers_allow_dollar() {
        let mut table = SymbolTable::new();
        let id = table.lookup_or_insert("A$B").unwrap();
        table.define_value(id, SymbolCategory::Constant, 7).unwrap();
        assert_eq!(eval_in(&mut table, "A$B", true).unwrap().value, 7);
        assert!(eval_in(&mut table, "A$B", false).is_err());
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        assert!(eval("1+").is_err());
        assert!(eval("(1").is_err());
        assert!(eval("1 2").is_err());
        assert!(eval("$").is_err());
    }

    proptest! {
        #[test]
        fn hex_and_decimal_agree(value in 0u32..=0xFFFF) {
            let dec = eval(&value.to_string()).unwrap().value;
            let hex = eval(&format!("${value:X}")).unwrap().value;
            let bin = eval(&format!("%{value:b}")).unwrap().value;
            prop_assert_eq!(dec, value as i64);
            prop_assert_eq!(hex, dec);
            prop_assert_eq!(bin, dec);
        }

        #[test]
        fn sum_and_product_match_integer_arithmetic(a in 0i64..1000, b in 0i64..1000, c in 1i64..100) {
            let v = eval(&format!("{a}+{b}*{c}-{a}/{c}")).unwrap().value;
            prop_assert_eq!(v, a + b * c - a / c);
        }
    }
}
