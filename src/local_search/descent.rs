//! Steepest descent over the block neighborhood.

use std::time::Instant;

use tracing::{debug, trace};

use super::{decode_seed, explore};
use crate::error::JobShopResult;
use crate::models::{Instance, ResourceOrder, Schedule};
use crate::scheduler::GreedyConstructor;
use crate::solver::{ExitCause, SearchStats, SolveResult, Solver};

/// Steepest-descent local search.
///
/// Each round evaluates every neighbor of the current schedule and moves
/// to the best one if it strictly lowers the makespan. Among equally good
/// neighbors the first one generated wins. Stops at a local optimum, at
/// the lower bound, or when the deadline has passed before a round.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use u_jobshop::local_search::DescentSolver;
/// use u_jobshop::models::Instance;
/// use u_jobshop::solver::Solver;
///
/// let instance: Instance = "2 2\n0 3 1 2\n1 2 0 3\n".parse().unwrap();
/// let deadline = Instant::now() + Duration::from_secs(1);
/// let result = DescentSolver::default().solve(&instance, deadline).unwrap();
/// assert_eq!(result.makespan(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DescentSolver {
    constructor: GreedyConstructor,
}

impl DescentSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `constructor` to build the starting order in [`Solver::solve`].
    pub fn with_constructor(mut self, constructor: GreedyConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Descends from a caller-supplied order.
    ///
    /// # Errors
    /// [`JobShopError::InvalidOrder`](crate::error::JobShopError::InvalidOrder)
    /// or [`JobShopError::Deadlock`](crate::error::JobShopError::Deadlock)
    /// if `seed` does not decode.
    pub fn solve_from<'a>(
        &self,
        instance: &'a Instance,
        seed: &ResourceOrder,
        deadline: Instant,
    ) -> JobShopResult<SolveResult<'a>> {
        let start = decode_seed(instance, seed)?;
        Ok(self.descend(start, deadline))
    }

    fn descend<'a>(&self, start: Schedule<'a>, deadline: Instant) -> SolveResult<'a> {
        let lower_bound = start.instance().lower_bound();
        let mut current = start;
        let mut stats = SearchStats::default();
        debug!(makespan = current.makespan(), lower_bound, "descent start");

        let exit_cause = loop {
            if current.makespan() == lower_bound {
                break ExitCause::ProvedOptimal;
            }
            if Instant::now() >= deadline {
                break ExitCause::Timeout;
            }
            stats.iterations += 1;

            let mut best: Option<Schedule<'a>> = None;
            for neighbor in explore(&current, &mut stats) {
                let to_beat = best.as_ref().map_or(current.makespan(), Schedule::makespan);
                if neighbor.schedule.makespan() < to_beat {
                    best = Some(neighbor.schedule);
                }
            }

            match best {
                Some(next) => {
                    trace!(
                        round = stats.iterations,
                        from = current.makespan(),
                        to = next.makespan(),
                        "descent step"
                    );
                    stats.improvements += 1;
                    current = next;
                }
                None => break ExitCause::Blocked,
            }
        };

        debug!(makespan = current.makespan(), %exit_cause, %stats, "descent done");
        SolveResult::new(current, exit_cause, stats)
    }
}

impl Solver for DescentSolver {
    fn name(&self) -> &'static str {
        "descent"
    }

    fn solve<'a>(&self, instance: &'a Instance, deadline: Instant) -> JobShopResult<SolveResult<'a>> {
        let order = self.constructor.construct(instance);
        let start = Schedule::from_order(instance, &order)?;
        Ok(self.descend(start, deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobShopError;
    use crate::models::Operation;
    use crate::scheduler::RandomConstructor;
    use std::time::Duration;

    const FT06: &str = "\
6 6
2 1 0 3 1 6 3 7 5 3 4 6
1 8 2 5 4 10 5 10 0 10 3 4
2 5 3 4 5 8 0 9 1 1 4 7
1 5 0 5 2 5 3 3 4 8 5 9
2 9 1 3 4 5 5 4 0 3 3 1
1 3 3 3 5 9 0 10 4 4 2 1
";

    fn op(job: usize, index: usize) -> Operation {
        Operation::new(job, index)
    }

    fn two_by_two() -> Instance {
        "2 2\n0 3 1 2\n1 2 0 3\n".parse().unwrap()
    }

    fn worse_seed() -> ResourceOrder {
        ResourceOrder::from_sequences(vec![
            vec![op(1, 1), op(0, 0)],
            vec![op(1, 0), op(0, 1)],
        ])
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    #[test]
    fn test_two_by_two_not_worse_than_greedy() {
        let inst = two_by_two();
        let result = DescentSolver::default().solve(&inst, later()).unwrap();
        assert!(result.makespan() <= 6);
        assert_eq!(result.exit_cause, ExitCause::ProvedOptimal);
        assert!(result.schedule.is_valid());
    }

    #[test]
    fn test_descends_from_worse_seed() {
        let inst = two_by_two();
        let result = DescentSolver::default()
            .solve_from(&inst, &worse_seed(), later())
            .unwrap();
        assert_eq!(result.makespan(), 6);
        assert_eq!(result.exit_cause, ExitCause::ProvedOptimal);
        assert_eq!(result.stats.iterations, 1);
        assert_eq!(result.stats.improvements, 1);
    }

    #[test]
    fn test_past_deadline_returns_seed() {
        let inst = two_by_two();
        let result = DescentSolver::default()
            .solve_from(&inst, &worse_seed(), Instant::now())
            .unwrap();
        assert_eq!(result.makespan(), 10);
        assert_eq!(result.exit_cause, ExitCause::Timeout);
        assert_eq!(result.stats.iterations, 0);
    }

    #[test]
    fn test_invalid_seed() {
        let inst = two_by_two();
        let err = DescentSolver::default()
            .solve_from(&inst, &ResourceOrder::empty(2), later())
            .unwrap_err();
        assert!(matches!(err, JobShopError::InvalidOrder(_)));
    }

    #[test]
    fn test_ft06_improves_monotonically() {
        let inst: Instance = FT06.parse().unwrap();
        for seed in 0..5 {
            let order = RandomConstructor::new(seed).construct(&inst);
            let initial = Schedule::from_order(&inst, &order).unwrap().makespan();

            let result = DescentSolver::default()
                .solve_from(&inst, &order, later())
                .unwrap();
            assert!(result.makespan() <= initial);
            assert!(result.makespan() >= inst.lower_bound());
            assert!(result.schedule.is_valid());
            assert_ne!(result.exit_cause, ExitCause::Timeout);
            // One improvement per round except the last one when blocked
            if result.exit_cause == ExitCause::Blocked {
                assert_eq!(result.stats.improvements + 1, result.stats.iterations);
            }
        }
    }

    #[test]
    fn test_single_job_is_optimal() {
        let inst = Instance::new(2, vec![vec![(1, 2), (0, 5)]]).unwrap();
        let result = DescentSolver::default().solve(&inst, later()).unwrap();
        // A single job always reaches its own length, the lower bound
        assert_eq!(result.makespan(), 7);
        assert_eq!(result.exit_cause, ExitCause::ProvedOptimal);
    }
}
