use core::fmt::Debug;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{ExecutionError, Opcode};

/// The addressing discipline of a single instruction parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParameterMode {
    /// The parameter is an address.
    #[default]
    Position = 0,
    /// The parameter is the value itself. Never valid for a write target.
    Immediate = 1,
    /// The parameter is an offset from the relative base.
    Relative = 2,
}

impl ParameterMode {
    /// Decode a single mode digit.
    #[must_use]
    pub const fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(ParameterMode::Position),
            1 => Some(ParameterMode::Immediate),
            2 => Some(ParameterMode::Relative),
            _ => None,
        }
    }

    /// Render a raw parameter in this mode.
    #[must_use]
    pub fn render(&self, param: i64) -> String {
        match self {
            ParameterMode::Position => format!("[{param}]"),
            ParameterMode::Immediate => format!("#{param}"),
            ParameterMode::Relative => format!("[rb{param:+}]"),
        }
    }
}

/// A decoded instruction word: the operation and the mode of each of its parameters.
///
/// Parameters themselves are not part of the instruction since the machine reads them from
/// memory at execution time, after any earlier self-modification.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub opcode: Opcode,
    /// Modes of parameters 1, 2 and 3. Modes past the operand count are always `Position`.
    pub modes: [ParameterMode; 3],
}

impl Instruction {
    /// Create a new instruction.
    #[must_use]
    pub const fn new(opcode: Opcode, modes: [ParameterMode; 3]) -> Self {
        Self { opcode, modes }
    }

    /// Decode the instruction word found at `pc`.
    ///
    /// The two low decimal digits select the opcode, the next three digits (least significant
    /// first) the parameter modes. Any digit beyond those is invalid.
    pub fn decode(word: i64, pc: usize) -> Result<Self, ExecutionError> {
        if word < 0 {
            return Err(ExecutionError::InvalidOpcode { pc, word });
        }
        let opcode =
            Opcode::from_i64(word % 100).ok_or(ExecutionError::InvalidOpcode { pc, word })?;

        let mut digits = word / 100;
        let mut modes = [ParameterMode::Position; 3];
        for (i, mode) in modes.iter_mut().enumerate() {
            let decoded = ParameterMode::from_digit(digits % 10)
                .ok_or(ExecutionError::InvalidParameterMode { pc, word })?;
            digits /= 10;
            if i < opcode.num_operands() {
                *mode = decoded;
            }
        }
        if digits != 0 {
            return Err(ExecutionError::InvalidParameterMode { pc, word });
        }

        if opcode.writes_last_operand()
            && modes[opcode.num_operands() - 1] == ParameterMode::Immediate
        {
            return Err(ExecutionError::ImmediateWrite { pc, word });
        }

        Ok(Self { opcode, modes })
    }

    /// Encode the instruction back into its canonical word.
    #[must_use]
    pub fn encode(&self) -> i64 {
        self.modes
            .iter()
            .rev()
            .fold(0, |acc, mode| acc * 10 + *mode as i64)
            * 100
            + self.opcode as i64
    }

    /// The number of memory cells taken by the instruction including its parameters.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.opcode.num_operands() + 1
    }

    /// The modes of the parameters this instruction actually has.
    #[must_use]
    pub fn operand_modes(&self) -> &[ParameterMode] {
        &self.modes[..self.opcode.num_operands()]
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = 6;
        write!(f, "{:<width$}", self.opcode.mnemonic(), width = width)?;
        for mode in self.operand_modes() {
            let mode = match mode {
                ParameterMode::Position => "pos",
                ParameterMode::Immediate => "imm",
                ParameterMode::Relative => "rel",
            };
            write!(f, " {mode:<width$}", width = width)?;
        }
        Ok(())
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.opcode)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    use ParameterMode::{Immediate, Position, Relative};

    #[rstest]
    #[case(1, Opcode::ADD, [Position, Position, Position])]
    #[case(1002, Opcode::MUL, [Position, Immediate, Position])]
    #[case(21101, Opcode::ADD, [Immediate, Immediate, Relative])]
    #[case(204, Opcode::OUT, [Relative, Position, Position])]
    #[case(109, Opcode::ARB, [Immediate, Position, Position])]
    #[case(1105, Opcode::JNZ, [Immediate, Immediate, Position])]
    #[case(99, Opcode::HALT, [Position, Position, Position])]
    fn test_decode(#[case] word: i64, #[case] opcode: Opcode, #[case] modes: [ParameterMode; 3]) {
        let instruction = Instruction::decode(word, 0).unwrap();
        assert_eq!(instruction.opcode, opcode);
        assert_eq!(instruction.modes, modes);
        assert_eq!(instruction.encode(), word);
    }

    #[test]
    fn test_mode_digits_past_operands_are_ignored() {
        // `out` has a single parameter, the thousands digit has nothing to describe.
        let instruction = Instruction::decode(1104, 0).unwrap();
        assert_eq!(instruction.modes, [Immediate, Position, Position]);
        assert_eq!(instruction.operand_modes(), &[Immediate]);
    }

    #[rstest]
    #[case(0)]
    #[case(42)]
    #[case(-1)]
    #[case(100)]
    fn test_invalid_opcode(#[case] word: i64) {
        assert!(matches!(
            Instruction::decode(word, 7),
            Err(ExecutionError::InvalidOpcode { pc: 7, .. })
        ));
    }

    #[rstest]
    #[case(301)]
    #[case(9001)]
    #[case(100001)]
    fn test_invalid_mode(#[case] word: i64) {
        assert!(matches!(
            Instruction::decode(word, 0),
            Err(ExecutionError::InvalidParameterMode { .. })
        ));
    }

    #[rstest]
    #[case(10001)]
    #[case(103)]
    #[case(11107)]
    fn test_immediate_write_target(#[case] word: i64) {
        assert!(matches!(
            Instruction::decode(word, 0),
            Err(ExecutionError::ImmediateWrite { .. })
        ));
    }

    #[test]
    fn test_size() {
        assert_eq!(Instruction::decode(1, 0).unwrap().size(), 4);
        assert_eq!(Instruction::decode(3, 0).unwrap().size(), 2);
        assert_eq!(Instruction::decode(5, 0).unwrap().size(), 3);
        assert_eq!(Instruction::decode(99, 0).unwrap().size(), 1);
    }

    #[test]
    fn test_render() {
        assert_eq!(Position.render(12), "[12]");
        assert_eq!(Immediate.render(-5), "#-5");
        assert_eq!(Relative.render(3), "[rb+3]");
        assert_eq!(Relative.render(-1), "[rb-1]");
    }
}
