use serde::{Deserialize, Serialize};

use crate::ExecutionError;

/// The memory tape of a running machine.
///
/// A flat, zero-indexed vector of cells that grows on demand: touching an address past the end
/// extends the tape with zeroes up to and including that address. The tape never shrinks.
/// Instruction fetches are the exception, see [`Memory::fetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    /// The largest tape the machine will grow to, in cells.
    pub const MAX_LEN: usize = 1 << 28;

    /// Create a tape from an initial image.
    #[must_use]
    pub fn new(cells: Vec<i64>) -> Self {
        Self { cells }
    }

    /// Resolve an integer address, growing the tape so the address is in range.
    fn ensure(&mut self, addr: i64) -> Result<usize, ExecutionError> {
        let index = usize::try_from(addr).map_err(|_| ExecutionError::NegativeAddress(addr))?;
        if index >= Self::MAX_LEN {
            return Err(ExecutionError::AddressOutOfRange(addr));
        }
        if index >= self.cells.len() {
            self.cells.resize(index + 1, 0);
        }
        Ok(index)
    }

    /// Check that `addr` can be accessed and grow the tape to cover it, returning its index.
    pub fn resolve(&mut self, addr: i64) -> Result<usize, ExecutionError> {
        self.ensure(addr)
    }

    /// Read the cell at `addr`.
    pub fn read(&mut self, addr: i64) -> Result<i64, ExecutionError> {
        let index = self.ensure(addr)?;
        Ok(self.cells[index])
    }

    /// Write `value` to the cell at `addr`.
    pub fn write(&mut self, addr: i64, value: i64) -> Result<(), ExecutionError> {
        let index = self.ensure(addr)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Fetch the instruction word at `pc`.
    ///
    /// Unlike operand accesses this never grows the tape: running off the end means the program
    /// is malformed or its control flow ran away.
    pub fn fetch(&self, pc: usize) -> Result<i64, ExecutionError> {
        self.cells
            .get(pc)
            .copied()
            .ok_or(ExecutionError::InstructionPointerOutOfBounds { pc, len: self.cells.len() })
    }

    /// Read a cell without growing the tape. Cells past the end read as zero.
    #[must_use]
    pub fn peek(&self, addr: usize) -> i64 {
        self.cells.get(addr).copied().unwrap_or_default()
    }

    /// The current length of the tape.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the tape is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// View the tape.
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    /// Take the tape.
    #[must_use]
    pub fn into_vec(self) -> Vec<i64> {
        self.cells
    }
}

impl From<Vec<i64>> for Memory {
    fn from(cells: Vec<i64>) -> Self {
        Self::new(cells)
    }
}
