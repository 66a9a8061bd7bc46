use thiserror::Error;

use crate::{
    ExecutionReport, ExecutionState, ExecutorState, Instruction, IntcodeContext, Memory, Opcode,
    ParameterMode, Port, Program,
};

/// An executor for Intcode programs.
///
/// The executor owns its memory tape exclusively and talks to the outside world only through
/// the [`Port`] passed to [`Executor::step`] and [`Executor::run`].
#[derive(Debug, Clone)]
pub struct Executor {
    /// The registers and memory of the machine.
    pub state: ExecutionState,

    /// The phase the machine is in.
    pub status: ExecutorState,

    /// Statistics about the instructions executed so far.
    pub report: ExecutionReport,

    /// The maximum number of instructions to execute.
    pub max_cycles: Option<u64>,
}

/// Errors that terminate an execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The instruction word does not name a known operation.
    #[error("invalid opcode {word} at pc {pc}")]
    InvalidOpcode {
        /// Where the word was fetched from.
        pc: usize,
        /// The raw instruction word.
        word: i64,
    },

    /// The instruction word carries a mode digit other than 0, 1 or 2.
    #[error("invalid parameter mode in {word} at pc {pc}")]
    InvalidParameterMode {
        /// Where the word was fetched from.
        pc: usize,
        /// The raw instruction word.
        word: i64,
    },

    /// The write target of an instruction is in immediate mode.
    #[error("immediate mode write target in {word} at pc {pc}")]
    ImmediateWrite {
        /// Where the word was fetched from.
        pc: usize,
        /// The raw instruction word.
        word: i64,
    },

    /// An instruction or one of its parameters lies past the end of memory.
    #[error("instruction pointer {pc} out of bounds for memory of {len} cells")]
    InstructionPointerOutOfBounds {
        /// The offending address.
        pc: usize,
        /// The length of memory at the time of the fetch.
        len: usize,
    },

    /// A negative address was used to access memory or as a jump target.
    #[error("negative address {0}")]
    NegativeAddress(i64),

    /// An address past the largest supported memory size was used.
    #[error("address {0} exceeds the maximum memory size")]
    AddressOutOfRange(i64),

    /// The input channel was closed while the machine waited for a value.
    #[error("input channel closed")]
    InputClosed,

    /// The output channel was closed while the machine tried to emit a value.
    #[error("output channel closed")]
    OutputClosed,

    /// A synchronous run needed more input than it was given.
    #[error("program requires more input")]
    InputExhausted,

    /// A pipeline finished without producing a value.
    #[error("pipeline produced no output")]
    NoOutput,

    /// The instruction budget was used up.
    #[error("execution exceeded the cycle limit of {0}")]
    ExceededCycleLimit(u64),

    /// The executor was asked to continue after halting or faulting.
    #[error("executor is {0:?} and cannot continue")]
    Terminated(ExecutorState),

    /// The operating system refused to start a thread for the machine.
    #[error("failed to spawn worker thread: {0}")]
    ThreadSpawn(String),

    /// A pipeline was asked for a stage it does not have.
    #[error("no pipeline stage {0}")]
    NoSuchStage(usize),

    /// The thread running the machine panicked.
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

impl Executor {
    /// Create a new executor for `program` with the default context.
    #[must_use]
    pub fn new(program: &Program) -> Self {
        Self::recover(ExecutionState::new(program.memory_image()), &IntcodeContext::default())
    }

    /// Create a new executor for `program`, taking the limits from `context`.
    #[must_use]
    pub fn with_context(program: &Program, context: &IntcodeContext) -> Self {
        Self::recover(ExecutionState::new(program.memory_image()), context)
    }

    /// Create an executor that continues from a previously captured state.
    #[must_use]
    pub fn recover(state: ExecutionState, context: &IntcodeContext) -> Self {
        let report = ExecutionReport { peak_memory: state.memory.len(), ..Default::default() };
        Self { state, status: ExecutorState::Running, report, max_cycles: context.max_cycles }
    }

    /// A snapshot of the registers and memory, suitable for [`Executor::recover`].
    #[must_use]
    pub fn state(&self) -> ExecutionState {
        self.state.clone()
    }

    /// The program counter.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.state.pc
    }

    /// The relative base.
    #[must_use]
    pub fn relative_base(&self) -> i64 {
        self.state.relative_base
    }

    /// The memory tape.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// The execution report so far.
    #[must_use]
    pub fn report(&self) -> &ExecutionReport {
        &self.report
    }

    /// Run until the program halts, or until it needs input that `port` cannot supply yet.
    ///
    /// Returns [`ExecutorState::Halted`] or [`ExecutorState::AwaitingInput`]. In the latter case
    /// the input instruction has not been consumed and a later call retries it.
    pub fn run(&mut self, port: &mut impl Port) -> Result<ExecutorState, ExecutionError> {
        loop {
            match self.step(port)? {
                ExecutorState::Running => {}
                status => return Ok(status),
            }
        }
    }

    /// Execute a single instruction.
    pub fn step(&mut self, port: &mut impl Port) -> Result<ExecutorState, ExecutionError> {
        if self.status.is_terminal() {
            return Err(ExecutionError::Terminated(self.status));
        }
        match self.execute(port) {
            Ok(status) => {
                self.status = status;
                if status == ExecutorState::Halted {
                    tracing::debug!(
                        "halted after {} instructions, memory grew to {} cells",
                        self.state.clk,
                        self.report.peak_memory
                    );
                }
                Ok(status)
            }
            Err(err) => {
                self.status = ExecutorState::Faulted;
                tracing::debug!(
                    "faulted at pc {} after {} instructions: {err}",
                    self.state.pc,
                    self.state.clk
                );
                Err(err)
            }
        }
    }

    /// Fetch the `index`-th parameter of the instruction at the program counter.
    fn param(&self, index: usize) -> Result<i64, ExecutionError> {
        self.state.memory.fetch(self.state.pc + 1 + index)
    }

    /// Resolve the address a position or relative parameter refers to.
    fn address(&self, instruction: &Instruction, index: usize) -> Result<i64, ExecutionError> {
        let param = self.param(index)?;
        Ok(match instruction.modes[index] {
            ParameterMode::Relative => self.state.relative_base.wrapping_add(param),
            ParameterMode::Position | ParameterMode::Immediate => param,
        })
    }

    /// Read the value of the `index`-th parameter.
    fn read(&mut self, instruction: &Instruction, index: usize) -> Result<i64, ExecutionError> {
        if instruction.modes[index] == ParameterMode::Immediate {
            return self.param(index);
        }
        let addr = self.address(instruction, index)?;
        self.state.memory.read(addr)
    }

    /// Write `value` to the target of the `index`-th parameter.
    fn write(
        &mut self,
        instruction: &Instruction,
        index: usize,
        value: i64,
    ) -> Result<(), ExecutionError> {
        // Decoding already rejected immediate write targets.
        let addr = self.address(instruction, index)?;
        self.state.memory.write(addr, value)
    }

    /// Fetch, decode and execute the instruction at the program counter.
    fn execute(&mut self, port: &mut impl Port) -> Result<ExecutorState, ExecutionError> {
        if let Some(max_cycles) = self.max_cycles {
            if self.state.clk >= max_cycles {
                return Err(ExecutionError::ExceededCycleLimit(max_cycles));
            }
        }

        let pc = self.state.pc;
        let instruction = Instruction::decode(self.state.memory.fetch(pc)?, pc)?;
        tracing::trace!(pc, rb = self.state.relative_base, "{:?}", instruction);

        let mut next_pc = pc + instruction.size();
        let mut status = ExecutorState::Running;
        match instruction.opcode {
            Opcode::ADD => {
                let (a, b) = (self.read(&instruction, 0)?, self.read(&instruction, 1)?);
                self.write(&instruction, 2, a.wrapping_add(b))?;
            }
            Opcode::MUL => {
                let (a, b) = (self.read(&instruction, 0)?, self.read(&instruction, 1)?);
                self.write(&instruction, 2, a.wrapping_mul(b))?;
            }
            Opcode::IN => {
                // A bad target faults before any input is consumed.
                let addr = self.address(&instruction, 0)?;
                self.state.memory.resolve(addr)?;
                port.before_read();
                let Some(value) = port.read()? else {
                    return Ok(ExecutorState::AwaitingInput);
                };
                self.state.memory.write(addr, value)?;
            }
            Opcode::OUT => {
                let a = self.read(&instruction, 0)?;
                port.write(a)?;
            }
            Opcode::JNZ | Opcode::JZ => {
                let (a, target) = (self.read(&instruction, 0)?, self.read(&instruction, 1)?);
                if (a != 0) == (instruction.opcode == Opcode::JNZ) {
                    next_pc = usize::try_from(target)
                        .map_err(|_| ExecutionError::NegativeAddress(target))?;
                }
            }
            Opcode::LT => {
                let (a, b) = (self.read(&instruction, 0)?, self.read(&instruction, 1)?);
                self.write(&instruction, 2, i64::from(a < b))?;
            }
            Opcode::EQ => {
                let (a, b) = (self.read(&instruction, 0)?, self.read(&instruction, 1)?);
                self.write(&instruction, 2, i64::from(a == b))?;
            }
            Opcode::ARB => {
                let a = self.read(&instruction, 0)?;
                self.state.relative_base = self.state.relative_base.wrapping_add(a);
            }
            Opcode::HALT => {
                next_pc = pc;
                status = ExecutorState::Halted;
                port.halt();
            }
        }

        self.state.pc = next_pc;
        self.state.clk += 1;
        self.report.record(instruction.opcode);
        self.report.peak_memory = self.report.peak_memory.max(self.state.memory.len());
        Ok(status)
    }
}
