use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    hash::Hash,
    ops::{Add, AddAssign},
};

use hashbrown::{hash_map::Entry, HashMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::Opcode;

/// An execution report.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// The opcode counts.
    pub opcode_counts: HashMap<Opcode, u64>,
    /// The number of values consumed by input instructions.
    pub inputs_read: u64,
    /// The number of values emitted by output instructions.
    pub outputs_written: u64,
    /// The largest length the memory tape reached, in cells.
    pub peak_memory: usize,
}

impl ExecutionReport {
    /// Compute the total number of instructions run during the execution.
    #[must_use]
    pub fn total_instruction_count(&self) -> u64 {
        self.opcode_counts.values().sum()
    }

    /// Record one executed instruction.
    pub fn record(&mut self, opcode: Opcode) {
        *self.opcode_counts.entry(opcode).or_insert(0) += 1;
        match opcode {
            Opcode::IN => self.inputs_read += 1,
            Opcode::OUT => self.outputs_written += 1,
            _ => {}
        }
    }
}

/// Combines two `HashMap`s together. If a key is in both maps, the values are added together.
fn hashmap_add_assign<K, V>(lhs: &mut HashMap<K, V>, rhs: HashMap<K, V>)
where
    K: Eq + Hash,
    V: AddAssign,
{
    for (k, v) in rhs {
        // Can't use `.and_modify(...).or_insert(...)` because we want to use `v` in both places.
        match lhs.entry(k) {
            Entry::Occupied(e) => *e.into_mut() += v,
            Entry::Vacant(e) => drop(e.insert(v)),
        }
    }
}

impl AddAssign for ExecutionReport {
    fn add_assign(&mut self, rhs: Self) {
        hashmap_add_assign(&mut self.opcode_counts, rhs.opcode_counts);
        self.inputs_read += rhs.inputs_read;
        self.outputs_written += rhs.outputs_written;
        self.peak_memory = self.peak_memory.max(rhs.peak_memory);
    }
}

impl Add for ExecutionReport {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Display for ExecutionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "opcode counts ({} total instructions):", self.total_instruction_count())?;
        let width = self.opcode_counts.values().map(|count| count.to_string().len()).max();
        for (opcode, count) in self
            .opcode_counts
            .iter()
            .sorted_unstable_by_key(|(opcode, count)| (std::cmp::Reverse(**count), **opcode))
        {
            writeln!(f, "  {count:>width$} {opcode}", width = width.unwrap_or_default())?;
        }
        writeln!(f, "inputs read: {}", self.inputs_read)?;
        writeln!(f, "outputs written: {}", self.outputs_written)?;
        write!(f, "peak memory: {} cells", self.peak_memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut report = ExecutionReport::default();
        report.record(Opcode::IN);
        report.record(Opcode::ADD);
        report.record(Opcode::ADD);
        report.record(Opcode::OUT);
        assert_eq!(report.total_instruction_count(), 4);
        assert_eq!(report.opcode_counts[&Opcode::ADD], 2);
        assert_eq!(report.inputs_read, 1);
        assert_eq!(report.outputs_written, 1);
    }

    #[test]
    fn test_add() {
        let mut a = ExecutionReport { peak_memory: 10, ..Default::default() };
        a.record(Opcode::MUL);
        let mut b = ExecutionReport { peak_memory: 30, ..Default::default() };
        b.record(Opcode::MUL);
        b.record(Opcode::HALT);

        let sum = a + b;
        assert_eq!(sum.opcode_counts[&Opcode::MUL], 2);
        assert_eq!(sum.opcode_counts[&Opcode::HALT], 1);
        assert_eq!(sum.peak_memory, 30);
    }

    #[test]
    fn test_display_sorted_by_count() {
        let mut report = ExecutionReport::default();
        report.record(Opcode::HALT);
        for _ in 0..12 {
            report.record(Opcode::ADD);
        }
        let rendered = report.to_string();
        let add = rendered.find("add").unwrap();
        let halt = rendered.find("halt").unwrap();
        assert!(add < halt);
        assert!(rendered.starts_with("opcode counts (13 total instructions):"));
    }
}
