use serde::{Deserialize, Serialize};

use crate::Memory;

/// Holds data describing the current state of a program's execution.
///
/// A snapshot can seed a new executor with [`crate::Executor::recover`], which is how a driver
/// forks a machine, e.g. to try several inputs from the same point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    /// The program counter.
    pub pc: usize,

    /// The offset used to resolve relative-mode parameters.
    pub relative_base: i64,

    /// The number of instructions executed so far.
    pub clk: u64,

    /// The memory which instructions operate over.
    pub memory: Memory,
}

impl ExecutionState {
    /// The state of a program that has not started yet.
    #[must_use]
    pub fn new(memory: Memory) -> Self {
        Self { pc: 0, relative_base: 0, clk: 0, memory }
    }
}

/// The phase of an executor's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorState {
    /// Executing instructions.
    Running,
    /// Stopped at an input instruction because no value was available yet.
    AwaitingInput,
    /// The program executed its halt instruction.
    Halted,
    /// The program hit an unrecoverable error.
    Faulted,
}

impl ExecutorState {
    /// Whether no further instruction will ever execute.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ExecutorState::Halted | ExecutorState::Faulted)
    }
}
