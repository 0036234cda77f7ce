// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Register codes used in 6809/6309 postbytes.

/// Register code for TFR/EXG-style pair postbytes, with its width in bytes.
pub fn pair_code(name: &str, h6309: bool) -> Option<(u8, u8)> {
    let code = match name {
        "D" => (0x0, 2),
        "X" => (0x1, 2),
        "Y" => (0x2, 2),
        "U" => (0x3, 2),
        "S" => (0x4, 2),
        "PC" => (0x5, 2),
        "A" => (0x8, 1),
        "B" => (0x9, 1),
        "CC" => (0xA, 1),
        "DP" => (0xB, 1),
        _ if !h6309 => return None,
        "W" => (0x6, 2),
        "V" => (0x7, 2),
        "0" | "Z" => (0xC, 0),
        "E" => (0xE, 1),
        "F" => (0xF, 1),
        _ => return None,
    };
    Some(code)
}

/// Bit of a register in a PSHS/PULS list. `stack` names the stack being
/// used, which cannot appear in its own list.
pub fn stack_bit(name: &str, stack: &str) -> Option<u8> {
    let bit = match name {
        "CC" => 0x01,
        "A" => 0x02,
        "B" => 0x04,
        "D" => 0x06,
        "DP" => 0x08,
        "X" => 0x10,
        "Y" => 0x20,
        "U" if stack == "S" => 0x40,
        "S" if stack == "U" => 0x40,
        "PC" => 0x80,
        _ => return None,
    };
    Some(bit)
}

/// Index register selector bits (bits 5-6 of the postbyte).
pub fn index_bits(name: &str) -> Option<u8> {
    match name {
        "X" => Some(0x00),
        "Y" => Some(0x20),
        "U" => Some(0x40),
        "S" => Some(0x60),
        _ => None,
    }
}

/// Low nibble of an accumulator-offset postbyte (`A,X`).
pub fn accumulator_offset(name: &str, h6309: bool) -> Option<u8> {
    match name {
        "A" => Some(0x06),
        "B" => Some(0x05),
        "D" => Some(0x0B),
        "E" if h6309 => Some(0x07),
        "F" if h6309 => Some(0x0A),
        "W" if h6309 => Some(0x0E),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_codes_depend_on_cpu() {
        assert_eq!(pair_code("A", false), Some((0x8, 1)));
        assert_eq!(pair_code("W", false), None);
        assert_eq!(pair_code("W", true), Some((0x6, 2)));
        assert_eq!(pair_code("0", true), Some((0xC, 0)));
    }

    #[test]
    fn stack_cannot_push_itself() {
        assert_eq!(stack_bit("U", "S"), Some(0x40));
        assert_eq!(stack_bit("S", "S"), None);
        assert_eq!(stack_bit("S", "U"), Some(0x40));
    }
}
