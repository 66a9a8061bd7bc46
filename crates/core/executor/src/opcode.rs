//! Opcodes for the Intcode machine.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// An opcode (short for "operation code") specifies the operation to be performed by the machine.
///
/// The opcode lives in the two least significant decimal digits of an instruction word. The
/// remaining digits carry the parameter modes, see [`crate::Instruction::decode`].
#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, EnumIter,
)]
pub enum Opcode {
    /// dst ← a + b, pc ← pc + 4
    ADD = 1,
    /// dst ← a * b, pc ← pc + 4
    MUL = 2,
    /// dst ← input, pc ← pc + 2
    IN = 3,
    /// output ← a, pc ← pc + 2
    OUT = 4,
    /// pc ← (a != 0) ? target : pc + 3
    JNZ = 5,
    /// pc ← (a == 0) ? target : pc + 3
    JZ = 6,
    /// dst ← (a < b) ? 1 : 0, pc ← pc + 4
    LT = 7,
    /// dst ← (a == b) ? 1 : 0, pc ← pc + 4
    EQ = 8,
    /// rb ← rb + a, pc ← pc + 2
    ARB = 9,
    /// Stop the machine.
    HALT = 99,
}

impl Opcode {
    /// Get the mnemonic for the opcode.
    #[must_use]
    pub const fn mnemonic(&self) -> &str {
        match self {
            Opcode::ADD => "add",
            Opcode::MUL => "mul",
            Opcode::IN => "in",
            Opcode::OUT => "out",
            Opcode::JNZ => "jnz",
            Opcode::JZ => "jz",
            Opcode::LT => "lt",
            Opcode::EQ => "eq",
            Opcode::ARB => "arb",
            Opcode::HALT => "halt",
        }
    }

    /// The number of parameters following the opcode word.
    #[must_use]
    pub const fn num_operands(&self) -> usize {
        match self {
            Opcode::ADD | Opcode::MUL | Opcode::LT | Opcode::EQ => 3,
            Opcode::JNZ | Opcode::JZ => 2,
            Opcode::IN | Opcode::OUT | Opcode::ARB => 1,
            Opcode::HALT => 0,
        }
    }

    /// Whether the last parameter is a write target rather than a value.
    #[must_use]
    pub const fn writes_last_operand(&self) -> bool {
        matches!(self, Opcode::ADD | Opcode::MUL | Opcode::IN | Opcode::LT | Opcode::EQ)
    }

    /// Whether the instruction may set the program counter itself.
    #[must_use]
    pub const fn is_jump(&self) -> bool {
        matches!(self, Opcode::JNZ | Opcode::JZ)
    }

    /// Look up the opcode for the two low decimal digits of an instruction word.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Opcode::ADD),
            2 => Some(Opcode::MUL),
            3 => Some(Opcode::IN),
            4 => Some(Opcode::OUT),
            5 => Some(Opcode::JNZ),
            6 => Some(Opcode::JZ),
            7 => Some(Opcode::LT),
            8 => Some(Opcode::EQ),
            9 => Some(Opcode::ARB),
            99 => Some(Opcode::HALT),
            _ => None,
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::Opcode;

    #[test]
    fn test_encoding_roundtrip() {
        for opcode in Opcode::iter() {
            assert_eq!(Opcode::from_i64(opcode as i64), Some(opcode));
        }
    }

    #[test]
    fn test_unknown_opcodes() {
        for value in [0, 10, 42, 98, 100, -1] {
            assert_eq!(Opcode::from_i64(value), None);
        }
    }

    #[test]
    fn test_operand_counts() {
        let counts: Vec<_> = Opcode::iter().map(|op| op.num_operands()).collect();
        assert_eq!(counts, vec![3, 3, 1, 1, 2, 2, 3, 3, 1, 0]);
    }

    #[test]
    fn test_write_targets_are_last_operands() {
        for opcode in Opcode::iter() {
            if opcode.writes_last_operand() {
                assert!(opcode.num_operands() > 0);
                assert!(!opcode.is_jump());
            }
        }
    }
}
