//! Resource-order solution encoding.
//!
//! A resource order lists, for every machine, the operations it processes
//! in execution order. Decoding it into start times is done by
//! [`Schedule::from_order`](super::Schedule::from_order).
//!
//! # Copy Semantics
//!
//! Each machine sequence is an owned `Vec<Operation>`, so `clone()` is a
//! deep copy. Neighbors are always built from a clone, never from the
//! order being explored.
//!
//! # Reference
//! Nowicki & Smutnicki (1996), "A fast taboo search algorithm for the job
//! shop problem", Section 2

use serde::{Deserialize, Serialize};

use super::{Instance, Operation, Schedule};

/// Per-machine operation sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceOrder {
    by_machine: Vec<Vec<Operation>>,
}

impl ResourceOrder {
    /// Creates an order with `num_machines` empty sequences.
    pub fn empty(num_machines: usize) -> Self {
        Self {
            by_machine: vec![Vec::new(); num_machines],
        }
    }

    /// Creates an empty order sized for `instance`.
    pub fn for_instance(instance: &Instance) -> Self {
        Self {
            by_machine: vec![Vec::with_capacity(instance.num_jobs()); instance.num_machines()],
        }
    }

    /// Builds an order directly from machine sequences.
    pub fn from_sequences(by_machine: Vec<Vec<Operation>>) -> Self {
        Self { by_machine }
    }

    /// Recovers the order of a schedule: each machine's operations sorted by
    /// start time (ties by job id).
    pub fn from_schedule(schedule: &Schedule<'_>) -> Self {
        Self::by_start_times(schedule.instance(), |op| schedule.start(op))
    }

    pub(crate) fn by_start_times(instance: &Instance, start: impl Fn(Operation) -> i64) -> Self {
        let by_machine = (0..instance.num_machines())
            .map(|machine| {
                let mut ops: Vec<Operation> = (0..instance.num_jobs())
                    .filter_map(|job| instance.operation_on(job, machine))
                    .collect();
                ops.sort_by_key(|&op| (start(op), op.job));
                ops
            })
            .collect();
        Self { by_machine }
    }

    /// Appends `op` to the end of `machine`'s sequence.
    #[inline]
    pub fn push(&mut self, machine: usize, op: Operation) {
        self.by_machine[machine].push(op);
    }

    /// Operation at `position` on `machine`.
    #[inline]
    pub fn get(&self, machine: usize, position: usize) -> Option<Operation> {
        self.by_machine.get(machine)?.get(position).copied()
    }

    /// Replaces the operation at `position` on `machine`.
    #[inline]
    pub fn set(&mut self, machine: usize, position: usize, op: Operation) {
        self.by_machine[machine][position] = op;
    }

    /// Exchanges two positions of one machine in place.
    #[inline]
    pub fn swap(&mut self, machine: usize, a: usize, b: usize) {
        self.by_machine[machine].swap(a, b);
    }

    /// Sequence of `machine`.
    #[inline]
    pub fn machine(&self, machine: usize) -> &[Operation] {
        &self.by_machine[machine]
    }

    /// Number of machine sequences.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.by_machine.len()
    }

    /// Iterates over `(machine, sequence)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Operation])> {
        self.by_machine
            .iter()
            .enumerate()
            .map(|(m, seq)| (m, seq.as_slice()))
    }

    /// Position of `op` in `machine`'s sequence (linear scan).
    pub fn position_of(&self, machine: usize, op: Operation) -> Option<usize> {
        self.by_machine.get(machine)?.iter().position(|&o| o == op)
    }

    /// Total number of placed operations.
    pub fn len(&self) -> usize {
        self.by_machine.iter().map(Vec::len).sum()
    }

    /// Whether no operation is placed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for ResourceOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (machine, seq) in self.iter() {
            write!(f, "machine {machine} :")?;
            for op in seq {
                write!(f, " {op}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
