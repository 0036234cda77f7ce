// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Native 6809 instruction set, shared by the HD6309.

use crate::core::family::InsnClass::{
    Arith16, Arith8, ImmediateByte, Inherent, Lea, LongBranch, Memory, RegisterPair, ShortBranch,
    StackList, Store,
};
use crate::core::family::InstructionEntry as E;

pub static FAMILY_INSTRUCTION_TABLE: &[E] = &[
    E::new("ABX", Inherent, &[0x3A]),
    E::new("ASLA", Inherent, &[0x48]),
    E::new("ASLB", Inherent, &[0x58]),
    E::new("ASRA", Inherent, &[0x47]),
    E::new("ASRB", Inherent, &[0x57]),
    E::new("CLRA", Inherent, &[0x4F]),
    E::new("CLRB", Inherent, &[0x5F]),
    E::new("COMA", Inherent, &[0x43]),
    E::new("COMB", Inherent, &[0x53]),
    E::new("DAA", Inherent, &[0x19]),
    E::new("DECA", Inherent, &[0x4A]),
    E::new("DECB", Inherent, &[0x5A]),
    E::new("INCA", Inherent, &[0x4C]),
    E::new("INCB", Inherent, &[0x5C]),
    E::new("LSLA", Inherent, &[0x48]),
    E::new("LSLB", Inherent, &[0x58]),
    E::new("LSRA", Inherent, &[0x44]),
    E::new("LSRB", Inherent, &[0x54]),
    E::new("MUL", Inherent, &[0x3D]),
    E::new("NEGA", Inherent, &[0x40]),
    E::new("NEGB", Inherent, &[0x50]),
    E::new("NOP", Inherent, &[0x12]),
    E::new("ROLA", Inherent, &[0x49]),
    E::new("ROLB", Inherent, &[0x59]),
    E::new("RORA", Inherent, &[0x46]),
    E::new("RORB", Inherent, &[0x56]),
    E::new("RTI", Inherent, &[0x3B]),
    E::new("RTS", Inherent, &[0x39]),
    E::new("SEX", Inherent, &[0x1D]),
    E::new("SWI", Inherent, &[0x3F]),
    E::new("SWI2", Inherent, &[0x10, 0x3F]),
    E::new("SWI3", Inherent, &[0x11, 0x3F]),
    E::new("SYNC", Inherent, &[0x13]),
    E::new("TSTA", Inherent, &[0x4D]),
    E::new("TSTB", Inherent, &[0x5D]),
    E::new("ANDCC", ImmediateByte, &[0x1C]),
    E::new("ORCC", ImmediateByte, &[0x1A]),
    E::new("CWAI", ImmediateByte, &[0x3C]),
    E::new("LEAX", Lea, &[0x30]),
    E::new("LEAY", Lea, &[0x31]),
    E::new("LEAS", Lea, &[0x32]),
    E::new("LEAU", Lea, &[0x33]),
    E::new("BRA", ShortBranch, &[0x20]),
    E::new("BRN", ShortBranch, &[0x21]),
    E::new("BHI", ShortBranch, &[0x22]),
    E::new("BLS", ShortBranch, &[0x23]),
    E::new("BHS", ShortBranch, &[0x24]),
    E::new("BCC", ShortBranch, &[0x24]),
    E::new("BLO", ShortBranch, &[0x25]),
    E::new("BCS", ShortBranch, &[0x25]),
    E::new("BNE", ShortBranch, &[0x26]),
    E::new("BEQ", ShortBranch, &[0x27]),
    E::new("BVC", ShortBranch, &[0x28]),
    E::new("BVS", ShortBranch, &[0x29]),
    E::new("BPL", ShortBranch, &[0x2A]),
    E::new("BMI", ShortBranch, &[0x2B]),
    E::new("BGE", ShortBranch, &[0x2C]),
    E::new("BLT", ShortBranch, &[0x2D]),
    E::new("BGT", ShortBranch, &[0x2E]),
    E::new("BLE", ShortBranch, &[0x2F]),
    E::new("BSR", ShortBranch, &[0x8D]),
    E::new("LBRA", LongBranch, &[0x16]),
    E::new("LBSR", LongBranch, &[0x17]),
    E::new("LBRN", LongBranch, &[0x10, 0x21]),
    E::new("LBHI", LongBranch, &[0x10, 0x22]),
    E::new("LBLS", LongBranch, &[0x10, 0x23]),
    E::new("LBHS", LongBranch, &[0x10, 0x24]),
    E::new("LBCC", LongBranch, &[0x10, 0x24]),
    E::new("LBLO", LongBranch, &[0x10, 0x25]),
    E::new("LBCS", LongBranch, &[0x10, 0x25]),
    E::new("LBNE", LongBranch, &[0x10, 0x26]),
    E::new("LBEQ", LongBranch, &[0x10, 0x27]),
    E::new("LBVC", LongBranch, &[0x10, 0x28]),
    E::new("LBVS", LongBranch, &[0x10, 0x29]),
    E::new("LBPL", LongBranch, &[0x10, 0x2A]),
    E::new("LBMI", LongBranch, &[0x10, 0x2B]),
    E::new("LBGE", LongBranch, &[0x10, 0x2C]),
    E::new("LBLT", LongBranch, &[0x10, 0x2D]),
    E::new("LBGT", LongBranch, &[0x10, 0x2E]),
    E::new("LBLE", LongBranch, &[0x10, 0x2F]),
    E::new("SUBA", Arith8, &[0x80]),
    E::new("CMPA", Arith8, &[0x81]),
    E::new("SBCA", Arith8, &[0x82]),
    E::new("ANDA", Arith8, &[0x84]),
    E::new("BITA", Arith8, &[0x85]),
    E::new("LDA", Arith8, &[0x86]),
    E::new("EORA", Arith8, &[0x88]),
    E::new("ADCA", Arith8, &[0x89]),
    E::new("ORA", Arith8, &[0x8A]),
    E::new("ADDA", Arith8, &[0x8B]),
    E::new("SUBB", Arith8, &[0xC0]),
    E::new("CMPB", Arith8, &[0xC1]),
    E::new("SBCB", Arith8, &[0xC2]),
    E::new("ANDB", Arith8, &[0xC4]),
    E::new("BITB", Arith8, &[0xC5]),
    E::new("LDB", Arith8, &[0xC6]),
    E::new("EORB", Arith8, &[0xC8]),
    E::new("ADCB", Arith8, &[0xC9]),
    E::new("ORB", Arith8, &[0xCA]),
    E::new("ADDB", Arith8, &[0xCB]),
    E::new("SUBD", Arith16, &[0x83]),
    E::new("CMPX", Arith16, &[0x8C]),
    E::new("LDX", Arith16, &[0x8E]),
    E::new("ADDD", Arith16, &[0xC3]),
    E::new("LDD", Arith16, &[0xCC]),
    E::new("LDU", Arith16, &[0xCE]),
    E::new("CMPD", Arith16, &[0x10, 0x83]),
    E::new("CMPY", Arith16, &[0x10, 0x8C]),
    E::new("LDY", Arith16, &[0x10, 0x8E]),
    E::new("LDS", Arith16, &[0x10, 0xCE]),
    E::new("CMPU", Arith16, &[0x11, 0x83]),
    E::new("CMPS", Arith16, &[0x11, 0x8C]),
    E::new("STA", Store, &[0x87]),
    E::new("JSR", Store, &[0x8D]),
    E::new("STX", Store, &[0x8F]),
    E::new("STB", Store, &[0xC7]),
    E::new("STD", Store, &[0xCD]),
    E::new("STU", Store, &[0xCF]),
    E::new("STY", Store, &[0x10, 0x8F]),
    E::new("STS", Store, &[0x10, 0xCF]),
    E::new("NEG", Memory, &[0x00]),
    E::new("COM", Memory, &[0x03]),
    E::new("LSR", Memory, &[0x04]),
    E::new("ROR", Memory, &[0x06]),
    E::new("ASR", Memory, &[0x07]),
    E::new("ASL", Memory, &[0x08]),
    E::new("LSL", Memory, &[0x08]),
    E::new("ROL", Memory, &[0x09]),
    E::new("DEC", Memory, &[0x0A]),
    E::new("INC", Memory, &[0x0C]),
    E::new("TST", Memory, &[0x0D]),
    E::new("JMP", Memory, &[0x0E]),
    E::new("CLR", Memory, &[0x0F]),
    E::new("PSHS", StackList, &[0x34]),
    E::new("PULS", StackList, &[0x35]),
    E::new("PSHU", StackList, &[0x36]),
    E::new("PULU", StackList, &[0x37]),
    E::new("EXG", RegisterPair, &[0x1E]),
    E::new("TFR", RegisterPair, &[0x1F]),
];
