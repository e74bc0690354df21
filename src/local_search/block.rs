//! Critical-path block decomposition.

use serde::{Deserialize, Serialize};

use crate::models::Schedule;

/// A maximal run of critical operations that share a machine.
///
/// Positions `first..=last` of `machine`'s sequence all lie on the critical
/// path, in path order. Only runs of two or more operations are blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub machine: usize,
    pub first: usize,
    pub last: usize,
}

impl Block {
    /// Number of operations in the block, at least two.
    #[inline]
    pub fn span(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Splits the critical path of `schedule` into blocks, in path order.
///
/// Two runs on the same machine separated by another machine are reported
/// as two blocks. Single-operation runs are dropped.
pub fn blocks_of(schedule: &Schedule<'_>) -> Vec<Block> {
    let instance = schedule.instance();
    let path = schedule.critical_path();
    let mut blocks = Vec::new();

    let mut i = 0;
    while i < path.len() {
        let machine = instance.machine_of(path[i]);
        let first = schedule.position_of(path[i]);
        let mut last = first;

        let mut j = i + 1;
        while j < path.len() && instance.machine_of(path[j]) == machine {
            last = schedule.position_of(path[j]);
            j += 1;
        }

        if first < last {
            blocks.push(Block {
                machine,
                first,
                last,
            });
        }
        i = j;
    }

    blocks
}
