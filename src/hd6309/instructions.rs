// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! HD6309 CPU extension instruction table.

use crate::core::family::InsnClass::{
    Arith16, Arith32, Arith8, BitMemory, BitTransfer, BlockTransfer, ImmediateByte, Inherent,
    RegisterPair, Store,
};
use crate::core::family::InstructionEntry as E;

pub static CPU_INSTRUCTION_TABLE: &[E] = &[
    E::new("SEXW", Inherent, &[0x14]),
    E::new("PSHSW", Inherent, &[0x10, 0x38]),
    E::new("PULSW", Inherent, &[0x10, 0x39]),
    E::new("PSHUW", Inherent, &[0x10, 0x3A]),
    E::new("PULUW", Inherent, &[0x10, 0x3B]),
    E::new("NEGD", Inherent, &[0x10, 0x40]),
    E::new("COMD", Inherent, &[0x10, 0x43]),
    E::new("LSRD", Inherent, &[0x10, 0x44]),
    E::new("RORD", Inherent, &[0x10, 0x46]),
    E::new("ASRD", Inherent, &[0x10, 0x47]),
    E::new("ASLD", Inherent, &[0x10, 0x48]),
    E::new("LSLD", Inherent, &[0x10, 0x48]),
    E::new("ROLD", Inherent, &[0x10, 0x49]),
    E::new("DECD", Inherent, &[0x10, 0x4A]),
    E::new("INCD", Inherent, &[0x10, 0x4C]),
    E::new("TSTD", Inherent, &[0x10, 0x4D]),
    E::new("CLRD", Inherent, &[0x10, 0x4F]),
    E::new("COMW", Inherent, &[0x10, 0x53]),
    E::new("LSRW", Inherent, &[0x10, 0x54]),
    E::new("RORW", Inherent, &[0x10, 0x56]),
    E::new("ROLW", Inherent, &[0x10, 0x59]),
    E::new("DECW", Inherent, &[0x10, 0x5A]),
    E::new("INCW", Inherent, &[0x10, 0x5C]),
    E::new("TSTW", Inherent, &[0x10, 0x5D]),
    E::new("CLRW", Inherent, &[0x10, 0x5F]),
    E::new("COME", Inherent, &[0x11, 0x43]),
    E::new("DECE", Inherent, &[0x11, 0x4A]),
    E::new("INCE", Inherent, &[0x11, 0x4C]),
    E::new("TSTE", Inherent, &[0x11, 0x4D]),
    E::new("CLRE", Inherent, &[0x11, 0x4F]),
    E::new("COMF", Inherent, &[0x11, 0x53]),
    E::new("DECF", Inherent, &[0x11, 0x5A]),
    E::new("INCF", Inherent, &[0x11, 0x5C]),
    E::new("TSTF", Inherent, &[0x11, 0x5D]),
    E::new("CLRF", Inherent, &[0x11, 0x5F]),
    E::new("ADDR", RegisterPair, &[0x10, 0x30]),
    E::new("ADCR", RegisterPair, &[0x10, 0x31]),
    E::new("SUBR", RegisterPair, &[0x10, 0x32]),
    E::new("SBCR", RegisterPair, &[0x10, 0x33]),
    E::new("ANDR", RegisterPair, &[0x10, 0x34]),
    E::new("ORR", RegisterPair, &[0x10, 0x35]),
    E::new("EORR", RegisterPair, &[0x10, 0x36]),
    E::new("CMPR", RegisterPair, &[0x10, 0x37]),
    E::new("BITMD", ImmediateByte, &[0x11, 0x3C]),
    E::new("LDMD", ImmediateByte, &[0x11, 0x3D]),
    E::new("SUBE", Arith8, &[0x11, 0x80]),
    E::new("CMPE", Arith8, &[0x11, 0x81]),
    E::new("LDE", Arith8, &[0x11, 0x86]),
    E::new("ADDE", Arith8, &[0x11, 0x8B]),
    E::new("SUBF", Arith8, &[0x11, 0xC0]),
    E::new("CMPF", Arith8, &[0x11, 0xC1]),
    E::new("LDF", Arith8, &[0x11, 0xC6]),
    E::new("ADDF", Arith8, &[0x11, 0xCB]),
    E::new("DIVD", Arith8, &[0x11, 0x8D]),
    E::new("SUBW", Arith16, &[0x10, 0x80]),
    E::new("CMPW", Arith16, &[0x10, 0x81]),
    E::new("SBCD", Arith16, &[0x10, 0x82]),
    E::new("ANDD", Arith16, &[0x10, 0x84]),
    E::new("BITD", Arith16, &[0x10, 0x85]),
    E::new("LDW", Arith16, &[0x10, 0x86]),
    E::new("EORD", Arith16, &[0x10, 0x88]),
    E::new("ADCD", Arith16, &[0x10, 0x89]),
    E::new("ORD", Arith16, &[0x10, 0x8A]),
    E::new("ADDW", Arith16, &[0x10, 0x8B]),
    E::new("DIVQ", Arith16, &[0x11, 0x8E]),
    E::new("MULD", Arith16, &[0x11, 0x8F]),
    E::new("LDQ", Arith32, &[0x10, 0xCC]),
    E::new("STE", Store, &[0x11, 0x87]),
    E::new("STF", Store, &[0x11, 0xC7]),
    E::new("STW", Store, &[0x10, 0x87]),
    E::new("STQ", Store, &[0x10, 0xCD]),
    E::new("OIM", BitMemory, &[0x01]),
    E::new("AIM", BitMemory, &[0x02]),
    E::new("EIM", BitMemory, &[0x05]),
    E::new("TIM", BitMemory, &[0x0B]),
    E::new("BAND", BitTransfer, &[0x11, 0x30]),
    E::new("BIAND", BitTransfer, &[0x11, 0x31]),
    E::new("BOR", BitTransfer, &[0x11, 0x32]),
    E::new("BIOR", BitTransfer, &[0x11, 0x33]),
    E::new("BEOR", BitTransfer, &[0x11, 0x34]),
    E::new("BIEOR", BitTransfer, &[0x11, 0x35]),
    E::new("LDBT", BitTransfer, &[0x11, 0x36]),
    E::new("STBT", BitTransfer, &[0x11, 0x37]),
    E::new("TFM", BlockTransfer, &[0x11, 0x38]),
];
