// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Motorola 6800 base instruction set.

use crate::core::family::InsnClass::{Arith16, Arith8, Inherent, MemoryIndexed, ShortBranch, Store};
use crate::core::family::{InsnFlags, InstructionEntry as E};

pub static FAMILY_INSTRUCTION_TABLE: &[E] = &[
    E::new("NOP", Inherent, &[0x01]),
    E::new("TAP", Inherent, &[0x06]),
    E::new("TPA", Inherent, &[0x07]),
    E::new("INX", Inherent, &[0x08]),
    E::new("DEX", Inherent, &[0x09]),
    E::new("CLV", Inherent, &[0x0A]),
    E::new("SEV", Inherent, &[0x0B]),
    E::new("CLC", Inherent, &[0x0C]),
    E::new("SEC", Inherent, &[0x0D]),
    E::new("CLI", Inherent, &[0x0E]),
    E::new("SEI", Inherent, &[0x0F]),
    E::new("SBA", Inherent, &[0x10]),
    E::new("CBA", Inherent, &[0x11]),
    E::new("TAB", Inherent, &[0x16]),
    E::new("TBA", Inherent, &[0x17]),
    E::new("DAA", Inherent, &[0x19]),
    E::new("ABA", Inherent, &[0x1B]),
    E::new("TSX", Inherent, &[0x30]),
    E::new("INS", Inherent, &[0x31]),
    E::new("PULA", Inherent, &[0x32]),
    E::new("PULB", Inherent, &[0x33]),
    E::new("DES", Inherent, &[0x34]),
    E::new("TXS", Inherent, &[0x35]),
    E::new("PSHA", Inherent, &[0x36]),
    E::new("PSHB", Inherent, &[0x37]),
    E::new("RTS", Inherent, &[0x39]),
    E::new("RTI", Inherent, &[0x3B]),
    E::new("WAI", Inherent, &[0x3E]),
    E::new("SWI", Inherent, &[0x3F]),
    E::new("NEGA", Inherent, &[0x40]),
    E::new("COMA", Inherent, &[0x43]),
    E::new("LSRA", Inherent, &[0x44]),
    E::new("RORA", Inherent, &[0x46]),
    E::new("ASRA", Inherent, &[0x47]),
    E::new("ASLA", Inherent, &[0x48]),
    E::new("LSLA", Inherent, &[0x48]),
    E::new("ROLA", Inherent, &[0x49]),
    E::new("DECA", Inherent, &[0x4A]),
    E::new("INCA", Inherent, &[0x4C]),
    E::new("TSTA", Inherent, &[0x4D]),
    E::new("CLRA", Inherent, &[0x4F]),
    E::new("NEGB", Inherent, &[0x50]),
    E::new("COMB", Inherent, &[0x53]),
    E::new("LSRB", Inherent, &[0x54]),
    E::new("RORB", Inherent, &[0x56]),
    E::new("ASRB", Inherent, &[0x57]),
    E::new("ASLB", Inherent, &[0x58]),
    E::new("LSLB", Inherent, &[0x58]),
    E::new("ROLB", Inherent, &[0x59]),
    E::new("DECB", Inherent, &[0x5A]),
    E::new("INCB", Inherent, &[0x5C]),
    E::new("TSTB", Inherent, &[0x5D]),
    E::new("CLRB", Inherent, &[0x5F]),
    E::new("BRA", ShortBranch, &[0x20]),
    E::new("BHI", ShortBranch, &[0x22]),
    E::new("BLS", ShortBranch, &[0x23]),
    E::new("BCC", ShortBranch, &[0x24]),
    E::new("BHS", ShortBranch, &[0x24]),
    E::new("BCS", ShortBranch, &[0x25]),
    E::new("BLO", ShortBranch, &[0x25]),
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
    E::new("NEG", MemoryIndexed, &[0x60]),
    E::new("COM", MemoryIndexed, &[0x63]),
    E::new("LSR", MemoryIndexed, &[0x64]),
    E::new("ROR", MemoryIndexed, &[0x66]),
    E::new("ASR", MemoryIndexed, &[0x67]),
    E::new("ASL", MemoryIndexed, &[0x68]),
    E::new("LSL", MemoryIndexed, &[0x68]),
    E::new("ROL", MemoryIndexed, &[0x69]),
    E::new("DEC", MemoryIndexed, &[0x6A]),
    E::new("INC", MemoryIndexed, &[0x6C]),
    E::new("TST", MemoryIndexed, &[0x6D]),
    E::new("JMP", MemoryIndexed, &[0x6E]),
    E::new("CLR", MemoryIndexed, &[0x6F]),
    E::new("SUBA", Arith8, &[0x80]),
    E::new("CMPA", Arith8, &[0x81]),
    E::new("SBCA", Arith8, &[0x82]),
    E::new("ANDA", Arith8, &[0x84]),
    E::new("BITA", Arith8, &[0x85]),
    E::new("LDAA", Arith8, &[0x86]),
    E::new("LDA", Arith8, &[0x86]),
    E::new("EORA", Arith8, &[0x88]),
    E::new("ADCA", Arith8, &[0x89]),
    E::new("ORAA", Arith8, &[0x8A]),
    E::new("ORA", Arith8, &[0x8A]),
    E::new("ADDA", Arith8, &[0x8B]),
    E::new("SUBB", Arith8, &[0xC0]),
    E::new("CMPB", Arith8, &[0xC1]),
    E::new("SBCB", Arith8, &[0xC2]),
    E::new("ANDB", Arith8, &[0xC4]),
    E::new("BITB", Arith8, &[0xC5]),
    E::new("LDAB", Arith8, &[0xC6]),
    E::new("LDB", Arith8, &[0xC6]),
    E::new("EORB", Arith8, &[0xC8]),
    E::new("ADCB", Arith8, &[0xC9]),
    E::new("ORAB", Arith8, &[0xCA]),
    E::new("ORB", Arith8, &[0xCA]),
    E::new("ADDB", Arith8, &[0xCB]),
    E::new("CPX", Arith16, &[0x8C]),
    E::new("LDS", Arith16, &[0x8E]),
    E::new("LDX", Arith16, &[0xCE]),
    E::new("STAA", Store, &[0x87]),
    E::new("STA", Store, &[0x87]),
    E::new("STAB", Store, &[0xC7]),
    E::new("STB", Store, &[0xC7]),
    E::new("STS", Store, &[0x8F]),
    E::new("STX", Store, &[0xCF]),
    E::new("JSR", Store, &[0x8D]).with_flags(InsnFlags::NO_DIRECT),
];
