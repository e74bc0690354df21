//! Priority-dispatch construction of an initial resource order.
//!
//! # Algorithm
//!
//! 1. Keep each job's next unscheduled operation; those are the ready set.
//! 2. Score the ready set with the rule engine and pick the best.
//! 3. Start it at max(job ready time, machine release time), then update
//!    the dispatch context and append it to its machine's sequence.
//! 4. Repeat until every operation is placed.
//!
//! The default engine is earliest start time with a longest remaining
//! processing time tie-break. Ready operations are offered in ascending
//! job id, so remaining ties go to the lowest job.
//!
//! # Complexity
//! O(n * j * r) where n=operations, j=jobs, r=rules.
//!
//! # Reference
//! Giffler & Thompson (1960), "Algorithms for Solving Production-Scheduling Problems"

use std::time::Instant;

use tracing::debug;

use crate::dispatching::{rules, DispatchContext, RuleEngine};
use crate::error::JobShopResult;
use crate::models::{Instance, Operation, ResourceOrder, Schedule};
use crate::solver::{settled_cause, SearchStats, SolveResult, Solver};

/// Greedy constructor driven by a dispatching rule engine.
///
/// # Example
///
/// ```
/// use u_jobshop::models::{Instance, Schedule};
/// use u_jobshop::scheduler::GreedyConstructor;
///
/// let instance: Instance = "2 2\n0 3 1 2\n1 2 0 3\n".parse().unwrap();
/// let order = GreedyConstructor::default().construct(&instance);
/// let schedule = Schedule::from_order(&instance, &order).unwrap();
/// assert_eq!(schedule.makespan(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyConstructor {
    engine: RuleEngine,
}

impl GreedyConstructor {
    /// Creates a constructor with a custom rule engine.
    pub fn with_rule_engine(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// Earliest start time, ties by longest remaining processing time.
    pub fn est_lrpt() -> Self {
        Self::with_rule_engine(
            RuleEngine::new()
                .with_rule(rules::Est)
                .with_tie_breaker(rules::Lrpt),
        )
    }

    /// Earliest start time, ties by shortest processing time.
    pub fn est_spt() -> Self {
        Self::with_rule_engine(
            RuleEngine::new()
                .with_rule(rules::Est)
                .with_tie_breaker(rules::Spt),
        )
    }

    /// Shortest processing time first.
    pub fn spt() -> Self {
        Self::with_rule_engine(RuleEngine::new().with_rule(rules::Spt))
    }

    /// Longest remaining processing time first.
    pub fn lrpt() -> Self {
        Self::with_rule_engine(RuleEngine::new().with_rule(rules::Lrpt))
    }

    /// Rule engine used for dispatch.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Builds a resource order by dispatching ready operations one at a time.
    ///
    /// Machine sequences list operations in the order they were dispatched,
    /// which is a topological order of the job precedences, so the result
    /// always decodes.
    pub fn construct(&self, instance: &Instance) -> ResourceOrder {
        let mut order = ResourceOrder::for_instance(instance);
        let mut context = DispatchContext::for_instance(instance);
        let mut next = vec![0usize; instance.num_jobs()];
        let mut ready = Vec::with_capacity(instance.num_jobs());

        loop {
            ready.clear();
            ready.extend(
                next.iter()
                    .enumerate()
                    .filter(|&(_, &index)| index < instance.num_operations_per_job())
                    .map(|(job, &index)| Operation::new(job, index)),
            );

            let Some(best) = self.engine.select_best(&ready, instance, &context) else {
                break;
            };
            let op = ready[best];
            let start = context.earliest_start(instance, op);
            context.commit(instance, op, start);
            order.push(instance.machine_of(op), op);
            next[op.job] += 1;
        }

        order
    }
}

impl Default for GreedyConstructor {
    fn default() -> Self {
        Self::est_lrpt()
    }
}

impl Solver for GreedyConstructor {
    fn name(&self) -> &'static str {
        "greedy"
    }

    /// Construction runs to completion; the deadline is not consulted.
    fn solve<'a>(
        &self,
        instance: &'a Instance,
        _deadline: Instant,
    ) -> JobShopResult<SolveResult<'a>> {
        debug!(rules = ?self.engine.rule_names(), "greedy construction start");
        let order = self.construct(instance);
        let schedule = Schedule::from_order(instance, &order)?;
        let exit_cause = settled_cause(&schedule);
        debug!(makespan = schedule.makespan(), %exit_cause, "greedy construction done");

        let stats = SearchStats {
            evaluated: 1,
            ..SearchStats::default()
        };
        Ok(SolveResult::new(schedule, exit_cause, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ExitCause;
    use crate::validation::validate_order;

    const TWO_BY_TWO: &str = "2 2\n0 3 1 2\n1 2 0 3\n";

    const FT06: &str = "\
# Fisher and Thompson 6x6
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

    #[test]
    fn test_two_by_two_order() {
        let inst: Instance = TWO_BY_TWO.parse().unwrap();
        let order = GreedyConstructor::default().construct(&inst);

        // Both jobs start at 0 and tie on remaining work; job 0 goes first.
        assert_eq!(order.machine(0), &[op(0, 0), op(1, 1)]);
        assert_eq!(order.machine(1), &[op(1, 0), op(0, 1)]);

        let schedule = Schedule::from_order(&inst, &order).unwrap();
        assert_eq!(schedule.makespan(), 6);
        assert!(schedule.is_valid());
    }

    #[test]
    fn test_solve_reports_optimal() {
        let inst: Instance = TWO_BY_TWO.parse().unwrap();
        let result = GreedyConstructor::default()
            .solve(&inst, Instant::now())
            .unwrap();
        assert_eq!(result.makespan(), 6);
        assert_eq!(result.exit_cause, ExitCause::ProvedOptimal);
        assert_eq!(result.stats.evaluated, 1);
    }

    #[test]
    fn test_lrpt_tie_break() {
        // Job 1 has more remaining work, so it wins the tie at time 0 on machine 0.
        let inst = Instance::new(2, vec![vec![(0, 2), (1, 1)], vec![(0, 3), (1, 4)]]).unwrap();
        let order = GreedyConstructor::default().construct(&inst);
        assert_eq!(order.machine(0), &[op(1, 0), op(0, 0)]);
    }

    #[test]
    fn test_presets_produce_valid_orders() {
        let inst: Instance = FT06.parse().unwrap();
        for constructor in [
            GreedyConstructor::est_lrpt(),
            GreedyConstructor::est_spt(),
            GreedyConstructor::spt(),
            GreedyConstructor::lrpt(),
        ] {
            let order = constructor.construct(&inst);
            assert!(validate_order(&inst, &order).is_ok());
            let schedule = Schedule::from_order(&inst, &order).unwrap();
            assert!(schedule.is_valid());
            assert!(schedule.makespan() >= inst.lower_bound());
        }
    }

    #[test]
    fn test_empty_instance() {
        let inst: Instance = "0 3\n".parse().unwrap();
        let order = GreedyConstructor::default().construct(&inst);
        assert_eq!(order.num_machines(), 3);
        assert!(order.is_empty());
    }
}
