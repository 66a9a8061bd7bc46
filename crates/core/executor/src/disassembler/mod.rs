//! A disassembler for Intcode programs.

use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Instruction, Program};

/// What a disassembled address holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// A decodable instruction together with its raw parameters.
    Instruction {
        /// The decoded instruction word.
        instruction: Instruction,
        /// The parameters following the instruction word.
        params: Vec<i64>,
    },
    /// A word that does not start a complete instruction.
    Data(i64),
}

/// One line of a disassembly listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassembledLine {
    /// The address of the first word on the line.
    pub address: usize,
    /// The contents of the line.
    pub kind: LineKind,
}

impl DisassembledLine {
    /// The number of words the line covers.
    pub fn size(&self) -> usize {
        match &self.kind {
            LineKind::Instruction { params, .. } => 1 + params.len(),
            LineKind::Data(_) => 1,
        }
    }
}

impl Display for DisassembledLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let body = match &self.kind {
            LineKind::Instruction { instruction, params } => {
                let operands = instruction
                    .operand_modes()
                    .iter()
                    .zip(params)
                    .map(|(mode, param)| mode.render(*param))
                    .join(", ");
                format!("{:<5} {operands}", instruction.opcode.mnemonic())
            }
            LineKind::Data(word) => format!("{:<5} {word}", "data"),
        };
        write!(f, "{:>5}: {}", self.address, body.trim_end())
    }
}

/// Disassemble `program` with a linear sweep from address 0.
///
/// Self-modifying programs can execute code that differs from this listing, and data that happens
/// to decode is listed as an instruction.
pub fn disassemble(program: &Program) -> Vec<DisassembledLine> {
    let image = &program.image;
    let mut lines = Vec::new();
    let mut address = 0;
    while address < image.len() {
        let end = |instruction: &Instruction| address + instruction.size();
        let kind = match Instruction::decode(image[address], address) {
            Ok(instruction) if end(&instruction) <= image.len() => LineKind::Instruction {
                params: image[address + 1..end(&instruction)].to_vec(),
                instruction,
            },
            _ => LineKind::Data(image[address]),
        };
        let line = DisassembledLine { address, kind };
        address += line.size();
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use crate::programs::tests::*;

    use super::*;

    #[test]
    fn test_disassemble_add_mul() {
        let lines = disassemble(&add_mul_program());
        let rendered = lines.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec![
                "    0: add   [9], [10], [3]",
                "    4: mul   [3], [11], [0]",
                "    8: halt",
                "    9: data  30",
                "   10: data  40",
                "   11: data  50",
            ]
        );
    }

    #[test]
    fn test_disassemble_modes() {
        let lines = disassemble(&Program::new(vec![109, 19, 204, -34, 21101, 1, -2, 3]));
        assert_eq!(lines[0].to_string(), "    0: arb   #19");
        assert_eq!(lines[1].to_string(), "    2: out   [rb-34]");
        assert_eq!(lines[2].to_string(), "    4: add   #1, #-2, [rb+3]");
    }

    #[test]
    fn test_truncated_instruction_is_data() {
        let lines = disassemble(&Program::new(vec![1101, 1]));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, LineKind::Data(1101));
        assert_eq!(lines[1].kind, LineKind::Data(1));
    }

    #[test]
    fn test_sweep_covers_every_word() {
        let program = compare_to_eight_program();
        let lines = disassemble(&program);
        assert_eq!(lines.iter().map(DisassembledLine::size).sum::<usize>(), program.len());
    }
}
