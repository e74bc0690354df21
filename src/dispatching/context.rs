//! Dispatch state passed to dispatching rules.

use crate::models::{Instance, Operation};

/// Runtime state of a priority-dispatch construction.
///
/// Tracks when each job and machine becomes free and how much work each
/// job still has to do. Rules read it to score ready operations.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// End time of each job's last scheduled operation.
    pub job_ready: Vec<i64>,
    /// Time at which each machine becomes free.
    pub machine_release: Vec<i64>,
    /// Unscheduled processing time per job.
    pub remaining_work: Vec<i64>,
}

impl DispatchContext {
    /// Creates the initial context: everything free at 0, all work remaining.
    pub fn for_instance(instance: &Instance) -> Self {
        Self {
            job_ready: vec![0; instance.num_jobs()],
            machine_release: vec![0; instance.num_machines()],
            remaining_work: (0..instance.num_jobs())
                .map(|j| instance.job_duration(j))
                .collect(),
        }
    }

    /// Earliest start of `op`: max(job ready time, machine release time).
    #[inline]
    pub fn earliest_start(&self, instance: &Instance, op: Operation) -> i64 {
        self.job_ready[op.job].max(self.machine_release[instance.machine_of(op)])
    }

    /// Records `op` as scheduled at `start`.
    pub fn commit(&mut self, instance: &Instance, op: Operation, start: i64) {
        let end = start + instance.duration_of(op);
        self.job_ready[op.job] = end;
        self.machine_release[instance.machine_of(op)] = end;
        self.remaining_work[op.job] -= instance.duration_of(op);
    }
}
