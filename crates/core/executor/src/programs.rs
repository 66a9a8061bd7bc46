//! Intcode programs used for testing.

#[allow(dead_code)]
#[allow(missing_docs)]
pub mod tests {
    use crate::Program;

    /// Reads one value and writes it back.
    #[must_use]
    pub fn echo_program() -> Program {
        Program::new(vec![3, 0, 4, 0, 99])
    }

    /// Leaves `3500` in cell 0.
    #[must_use]
    pub fn add_mul_program() -> Program {
        Program::new(vec![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50])
    }

    /// Outputs a copy of itself.
    #[must_use]
    pub fn quine_program() -> Program {
        Program::new(vec![
            109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
        ])
    }

    /// Outputs a 16-digit number.
    #[must_use]
    pub fn sixteen_digit_program() -> Program {
        Program::new(vec![1102, 34_915_192, 34_915_192, 7, 4, 7, 99, 0])
    }

    /// Outputs 1 if the input equals 8, else 0, using position mode.
    #[must_use]
    pub fn equal_to_eight_position_program() -> Program {
        Program::new(vec![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8])
    }

    /// Outputs 1 if the input is less than 8, else 0, using position mode.
    #[must_use]
    pub fn less_than_eight_position_program() -> Program {
        Program::new(vec![3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8])
    }

    /// Outputs 1 if the input equals 8, else 0, using immediate mode.
    #[must_use]
    pub fn equal_to_eight_immediate_program() -> Program {
        Program::new(vec![3, 3, 1108, -1, 8, 3, 4, 3, 99])
    }

    /// Outputs 1 if the input is less than 8, else 0, using immediate mode.
    #[must_use]
    pub fn less_than_eight_immediate_program() -> Program {
        Program::new(vec![3, 3, 1107, -1, 8, 3, 4, 3, 99])
    }

    /// Outputs 0 if the input is 0, else 1, using position mode jumps.
    #[must_use]
    pub fn jump_position_program() -> Program {
        Program::new(vec![3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9])
    }

    /// Outputs 0 if the input is 0, else 1, using immediate mode jumps.
    #[must_use]
    pub fn jump_immediate_program() -> Program {
        Program::new(vec![3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1])
    }

    /// Outputs 999, 1000 or 1001 for an input below, equal to or above 8.
    #[must_use]
    pub fn compare_to_eight_program() -> Program {
        Program::new(vec![
            3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0,
            0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4,
            20, 1105, 1, 46, 98, 99,
        ])
    }

    /// An amplifier stage: reads a phase and a signal, outputs `10 * signal + phase`.
    ///
    /// Chained with phases `4,3,2,1,0` the final signal is `43210`.
    #[must_use]
    pub fn amplifier_program() -> Program {
        Program::new(vec![3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0])
    }

    /// An amplifier stage that loops until its counter runs out.
    ///
    /// In a feedback loop with phases `9,8,7,6,5` the final signal is `139629729`.
    #[must_use]
    pub fn feedback_program() -> Program {
        Program::new(vec![
            3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1,
            28, 1005, 28, 6, 99, 0, 0, 5,
        ])
    }

    /// A second feedback amplifier; phases `9,7,8,5,6` give `18216`.
    #[must_use]
    pub fn feedback_program_two() -> Program {
        Program::new(vec![
            3, 52, 1001, 52, -5, 52, 3, 53, 1, 52, 56, 54, 1007, 54, 5, 55, 1005, 55, 26, 1001, 54,
            -5, 54, 1105, 1, 12, 1, 53, 54, 53, 1008, 54, 0, 55, 1001, 55, 1, 55, 2, 53, 55, 53, 4,
            53, 1001, 56, -1, 56, 1005, 56, 6, 99, 0, 0, 0, 0, 10,
        ])
    }

    /// Writes the bytes of `"Hi\n"` followed by a non-ASCII value.
    #[must_use]
    pub fn ascii_program() -> Program {
        Program::new(vec![104, 72, 104, 105, 104, 10, 104, 19_349_032, 99])
    }

    /// Reads values until it reads 0, then outputs their sum.
    #[must_use]
    pub fn sum_until_zero_program() -> Program {
        // 0: in [20]
        // 2: jz [20] #13
        // 5: add [20] [21] -> [21]
        // 9: jnz #1 #0
        // 12: (unused)
        // 13: out [21]
        // 15: halt
        Program::new(vec![
            3, 20, 1006, 20, 13, 1, 20, 21, 21, 1105, 1, 0, 0, 4, 21, 99, 0, 0, 0, 0, 0, 0,
        ])
    }
}
