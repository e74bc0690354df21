//! Random dispatch construction.
//!
//! Picks a uniformly random ready operation at every step. Any such order
//! follows the job precedences, so it always decodes. Useful as a
//! diversified seed for local search.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::JobShopResult;
use crate::models::{Instance, Operation, ResourceOrder, Schedule};
use crate::solver::{settled_cause, SearchStats, SolveResult, Solver};

/// Seeded random constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomConstructor {
    seed: u64,
}

impl RandomConstructor {
    /// Creates a constructor whose output is fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed used by [`construct`](Self::construct).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Builds an order from this constructor's seed.
    pub fn construct(&self, instance: &Instance) -> ResourceOrder {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Self::construct_with(instance, &mut rng)
    }

    /// Builds an order drawing from `rng`.
    pub fn construct_with<R: Rng>(instance: &Instance, rng: &mut R) -> ResourceOrder {
        let mut order = ResourceOrder::for_instance(instance);
        let mut next = vec![0usize; instance.num_jobs()];
        let mut ready: Vec<usize> = (0..instance.num_jobs())
            .filter(|_| instance.num_operations_per_job() > 0)
            .collect();

        while !ready.is_empty() {
            let slot = rng.random_range(0..ready.len());
            let job = ready[slot];
            let op = Operation::new(job, next[job]);
            order.push(instance.machine_of(op), op);

            next[job] += 1;
            if next[job] == instance.num_operations_per_job() {
                ready.swap_remove(slot);
            }
        }

        order
    }
}

impl Default for RandomConstructor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Solver for RandomConstructor {
    fn name(&self) -> &'static str {
        "random"
    }

    fn solve<'a>(
        &self,
        instance: &'a Instance,
        _deadline: Instant,
    ) -> JobShopResult<SolveResult<'a>> {
        let order = self.construct(instance);
        let schedule = Schedule::from_order(instance, &order)?;
        let exit_cause = settled_cause(&schedule);
        debug!(seed = self.seed, makespan = schedule.makespan(), "random construction done");

        let stats = SearchStats {
            evaluated: 1,
            ..SearchStats::default()
        };
        Ok(SolveResult::new(schedule, exit_cause, stats))
    }
}
