//! Tabu search over the block neighborhood.
//!
//! # Algorithm
//!
//! For iteration k = 1..=max_iterations, while the deadline has not passed:
//! 1. Decode every neighbor of the working schedule.
//! 2. Pick one neighbor with the configured [`TabuAcceptance`].
//! 3. Forbid its swap until iteration k + tenure and move to it.
//! 4. Keep a copy of it if it beats the best makespan seen so far.
//!
//! The best schedule seen, not the last working one, is returned.
//!
//! # Reference
//! Nowicki & Smutnicki (1996), "A Fast Taboo Search Algorithm for the Job
//! Shop Problem", Management Science 42(6).

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{decode_seed, explore, Swap};
use crate::error::JobShopResult;
use crate::models::{Instance, ResourceOrder, Schedule};
use crate::scheduler::GreedyConstructor;
use crate::solver::{settled_cause, ExitCause, SearchStats, SolveResult, Solver};

/// Rule for choosing the neighbor to move to in one iteration.
///
/// In both modes the first neighbor generated is taken as the provisional
/// choice, so the search always moves when the neighborhood is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabuAcceptance {
    /// A neighbor is admissible if its swap is not tabu, or if it beats
    /// the best makespan seen (aspiration). A later admissible neighbor
    /// replaces the provisional one if that one was not admissible or if
    /// it is strictly better.
    #[default]
    Standard,
    /// A later neighbor replaces the provisional one only if it is
    /// strictly better and its swap is still tabu.
    Literal,
}

impl TabuAcceptance {
    /// Index of the chosen candidate among `(swap, makespan)` pairs.
    ///
    /// Returns `None` only for an empty candidate list.
    pub fn select(
        self,
        candidates: &[(Swap, i64)],
        tabu: &TabuList,
        iteration: usize,
        best_makespan: i64,
    ) -> Option<usize> {
        let &(first_swap, first_makespan) = candidates.first()?;
        let admissible = |swap: &Swap, makespan: i64| {
            !tabu.is_tabu(swap, iteration) || makespan < best_makespan
        };

        let mut chosen = 0;
        let mut chosen_admissible = admissible(&first_swap, first_makespan);
        for (i, (swap, makespan)) in candidates.iter().enumerate().skip(1) {
            let better = *makespan < candidates[chosen].1;
            let replace = match self {
                TabuAcceptance::Standard => {
                    admissible(swap, *makespan) && (!chosen_admissible || better)
                }
                TabuAcceptance::Literal => better && tabu.is_tabu(swap, iteration),
            };
            if replace {
                chosen = i;
                chosen_admissible = true;
            }
        }
        Some(chosen)
    }
}

/// Tabu search parameters.
///
/// Missing fields take their defaults when deserializing, so a partial
/// config such as `{"tenure": 5}` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuConfig {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Iterations a performed swap stays forbidden.
    pub tenure: usize,
    /// Neighbor selection rule.
    pub acceptance: TabuAcceptance,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tenure: 10,
            acceptance: TabuAcceptance::Standard,
        }
    }
}

impl TabuConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = tenure;
        self
    }

    pub fn with_acceptance(mut self, acceptance: TabuAcceptance) -> Self {
        self.acceptance = acceptance;
        self
    }
}

/// Recency table: for each swap, the iteration until which it is forbidden.
///
/// A swap endpoint is keyed `machine * num_jobs + position`; the table is
/// square over those keys. A swap is tabu at iteration `k` iff its entry
/// exceeds `k`. Entries are stored as `u32` and saturate at `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabuList {
    num_jobs: usize,
    keys: usize,
    until: Vec<u32>,
}

impl TabuList {
    /// Creates an empty table sized for `instance`.
    pub fn for_instance(instance: &Instance) -> Self {
        let keys = instance.num_jobs() * instance.num_machines();
        Self {
            num_jobs: instance.num_jobs(),
            keys,
            until: vec![0; keys * keys],
        }
    }

    #[inline]
    fn index(&self, swap: &Swap) -> usize {
        let base = swap.machine * self.num_jobs;
        (base + swap.a) * self.keys + base + swap.b
    }

    /// Forbids `swap` until iteration `until`.
    pub fn mark(&mut self, swap: &Swap, until: usize) {
        let i = self.index(swap);
        self.until[i] = u32::try_from(until).unwrap_or(u32::MAX);
    }

    /// Iteration until which `swap` is forbidden (0 if never marked).
    pub fn until(&self, swap: &Swap) -> usize {
        self.until[self.index(swap)] as usize
    }

    /// Whether `swap` is forbidden at `iteration`.
    #[inline]
    pub fn is_tabu(&self, swap: &Swap, iteration: usize) -> bool {
        self.until(swap) > iteration
    }
}

/// Tabu search solver.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use u_jobshop::local_search::{TabuConfig, TabuSolver};
/// use u_jobshop::models::Instance;
/// use u_jobshop::solver::Solver;
///
/// let instance: Instance = "2 2\n0 3 1 2\n1 2 0 3\n".parse().unwrap();
/// let solver = TabuSolver::new(TabuConfig::default().with_max_iterations(50));
/// let result = solver.solve(&instance, Instant::now() + Duration::from_secs(1)).unwrap();
/// assert_eq!(result.makespan(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabuSolver {
    config: TabuConfig,
    constructor: GreedyConstructor,
}

impl TabuSolver {
    pub fn new(config: TabuConfig) -> Self {
        Self {
            config,
            constructor: GreedyConstructor::default(),
        }
    }

    /// Uses `constructor` to build the starting order in [`Solver::solve`].
    pub fn with_constructor(mut self, constructor: GreedyConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn config(&self) -> &TabuConfig {
        &self.config
    }

    /// Searches from a caller-supplied order.
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
        Ok(self.search(start, deadline))
    }

    fn search<'a>(&self, start: Schedule<'a>, deadline: Instant) -> SolveResult<'a> {
        let instance = start.instance();
        let lower_bound = instance.lower_bound();
        let mut tabu = TabuList::for_instance(instance);
        let mut stats = SearchStats::default();
        let mut best = start.clone();
        let mut working = start;
        debug!(
            makespan = working.makespan(),
            lower_bound,
            config = ?self.config,
            "tabu search start"
        );

        let mut exit_cause = ExitCause::Blocked;
        for k in 1..=self.config.max_iterations {
            if best.makespan() == lower_bound {
                break;
            }
            if Instant::now() >= deadline {
                exit_cause = ExitCause::Timeout;
                break;
            }
            stats.iterations += 1;

            let mut neighbors = explore(&working, &mut stats);
            let scored: Vec<(Swap, i64)> = neighbors
                .iter()
                .map(|n| (n.swap, n.schedule.makespan()))
                .collect();
            let Some(chosen) = self
                .config
                .acceptance
                .select(&scored, &tabu, k, best.makespan())
            else {
                trace!(iteration = k, "no swappable block");
                break;
            };

            let neighbor = neighbors.swap_remove(chosen);
            tabu.mark(&neighbor.swap, k + self.config.tenure);
            working = neighbor.schedule;
            trace!(
                iteration = k,
                swap = ?neighbor.swap,
                makespan = working.makespan(),
                best = best.makespan(),
                "tabu move"
            );

            if working.makespan() < best.makespan() {
                stats.improvements += 1;
                best = working.clone();
            }
        }

        if exit_cause == ExitCause::Blocked {
            exit_cause = settled_cause(&best);
        }
        debug!(makespan = best.makespan(), %exit_cause, %stats, "tabu search done");
        SolveResult::new(best, exit_cause, stats)
    }
}

impl Solver for TabuSolver {
    fn name(&self) -> &'static str {
        "tabu"
    }

    fn solve<'a>(&self, instance: &'a Instance, deadline: Instant) -> JobShopResult<SolveResult<'a>> {
        let order = self.constructor.construct(instance);
        let start = Schedule::from_order(instance, &order)?;
        Ok(self.search(start, deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn ft06() -> Instance {
        FT06.parse().unwrap()
    }

    #[test]
    fn test_tenure_bounds() {
        let inst = ft06();
        let mut tabu = TabuList::for_instance(&inst);
        let swap = Swap::new(3, 1, 2);
        let other = Swap::new(3, 2, 3);
        assert_eq!(tabu.until(&swap), 0);

        let marked_at = 1;
        let tenure = 10;
        tabu.mark(&swap, marked_at + tenure);
        for k in 2..=10 {
            assert!(tabu.is_tabu(&swap, k), "should be tabu at {k}");
        }
        assert!(!tabu.is_tabu(&swap, 11));
        assert!(!tabu.is_tabu(&other, 2));
    }

    #[test]
    fn test_distinct_keys() {
        let inst = ft06();
        let mut tabu = TabuList::for_instance(&inst);
        tabu.mark(&Swap::new(5, 4, 5), 7);
        assert_eq!(tabu.until(&Swap::new(5, 4, 5)), 7);
        assert_eq!(tabu.until(&Swap::new(4, 4, 5)), 0);
        assert_eq!(tabu.until(&Swap::new(5, 5, 4)), 0);
    }

    #[test]
    fn test_mark_saturates() {
        let inst = ft06();
        let mut tabu = TabuList::for_instance(&inst);
        let swap = Swap::new(0, 2, 3);
        tabu.mark(&swap, usize::MAX);
        assert_eq!(tabu.until(&swap), u32::MAX as usize);
        assert!(tabu.is_tabu(&swap, 1_000_000));
        assert!(!tabu.is_tabu(&swap, u32::MAX as usize));
        // Table holds one 4-byte entry per ordered key pair
        assert_eq!(tabu.until.len(), 36 * 36);
    }

    fn selection_fixture() -> (TabuList, [Swap; 3]) {
        let inst = ft06();
        let mut tabu = TabuList::for_instance(&inst);
        let free_a = Swap::new(0, 0, 1);
        let free_b = Swap::new(1, 0, 1);
        let forbidden = Swap::new(2, 0, 1);
        tabu.mark(&forbidden, 20);
        (tabu, [free_a, free_b, forbidden])
    }

    #[test]
    fn test_literal_prefers_tabu_moves() {
        let (tabu, [a, b, t]) = selection_fixture();
        let candidates = [(a, 10), (b, 8), (t, 7)];
        let literal = TabuAcceptance::Literal;
        // b is better but not tabu, so only t can replace a
        assert_eq!(literal.select(&candidates, &tabu, 5, 1), Some(2));

        let no_tabu_better = [(a, 10), (b, 8)];
        assert_eq!(literal.select(&no_tabu_better, &tabu, 5, 1), Some(0));
    }

    #[test]
    fn test_standard_skips_tabu_moves() {
        let (tabu, [a, b, t]) = selection_fixture();
        let candidates = [(a, 10), (b, 8), (t, 7)];
        let standard = TabuAcceptance::Standard;
        assert_eq!(standard.select(&candidates, &tabu, 5, 1), Some(1));
    }

    #[test]
    fn test_standard_aspiration() {
        let (tabu, [a, b, t]) = selection_fixture();
        let candidates = [(a, 10), (b, 8), (t, 7)];
        // t beats the best seen (9), so its tabu status is overridden
        assert_eq!(TabuAcceptance::Standard.select(&candidates, &tabu, 5, 9), Some(2));
    }

    #[test]
    fn test_standard_replaces_inadmissible_first() {
        let (tabu, [a, _, t]) = selection_fixture();
        let candidates = [(t, 12), (a, 15)];
        assert_eq!(TabuAcceptance::Standard.select(&candidates, &tabu, 5, 1), Some(1));
        // Once tabu expires the first candidate is admissible and better
        assert_eq!(TabuAcceptance::Standard.select(&candidates, &tabu, 20, 1), Some(0));
    }

    #[test]
    fn test_first_candidate_is_default() {
        let (tabu, [_, _, t]) = selection_fixture();
        assert_eq!(TabuAcceptance::Literal.select(&[(t, 3)], &tabu, 5, 1), Some(0));
        assert_eq!(TabuAcceptance::Standard.select(&[(t, 3)], &tabu, 5, 1), Some(0));
        assert_eq!(TabuAcceptance::Standard.select(&[], &tabu, 5, 1), None);
    }

    #[test]
    fn test_converges_from_worse_seed() {
        let inst = two_by_two();
        for acceptance in [TabuAcceptance::Standard, TabuAcceptance::Literal] {
            let solver = TabuSolver::new(TabuConfig::default().with_acceptance(acceptance));
            let result = solver.solve_from(&inst, &worse_seed(), later()).unwrap();
            assert!(result.makespan() <= 6);
            assert_eq!(result.exit_cause, ExitCause::ProvedOptimal);
            assert_eq!(result.stats.iterations, 1);
            assert!(result.schedule.is_valid());
        }
    }

    #[test]
    fn test_past_deadline_returns_seed() {
        let inst = two_by_two();
        let result = TabuSolver::default()
            .solve_from(&inst, &worse_seed(), Instant::now())
            .unwrap();
        assert_eq!(result.makespan(), 10);
        assert_eq!(result.exit_cause, ExitCause::Timeout);
        assert_eq!(result.stats.iterations, 0);
    }

    #[test]
    fn test_zero_iterations() {
        let inst = two_by_two();
        let solver = TabuSolver::new(TabuConfig::default().with_max_iterations(0));
        let result = solver.solve_from(&inst, &worse_seed(), later()).unwrap();
        assert_eq!(result.makespan(), 10);
        assert_eq!(result.exit_cause, ExitCause::Blocked);
    }

    #[test]
    fn test_single_job_stops() {
        let inst = Instance::new(3, vec![vec![(2, 4), (0, 1), (1, 3)]]).unwrap();
        let result = TabuSolver::default().solve(&inst, later()).unwrap();
        assert_eq!(result.makespan(), 8);
        assert_eq!(result.stats.iterations, 0);
    }

    #[test]
    fn test_ft06_smoke() {
        let inst = ft06();
        let greedy = GreedyConstructor::default().construct(&inst);
        let greedy_makespan = Schedule::from_order(&inst, &greedy).unwrap().makespan();

        for acceptance in [TabuAcceptance::Standard, TabuAcceptance::Literal] {
            let solver = TabuSolver::new(TabuConfig::default().with_acceptance(acceptance));
            let result = solver.solve(&inst, later()).unwrap();
            assert!(result.makespan() <= greedy_makespan);
            assert!(result.makespan() >= inst.lower_bound());
            assert!(result.schedule.is_valid());
            assert!(result.stats.iterations <= 100);
        }
    }

    #[test]
    fn test_returns_best_seen() {
        let inst = ft06();
        let seed = RandomConstructor::new(11).construct(&inst);
        let initial = Schedule::from_order(&inst, &seed).unwrap().makespan();
        let solver = TabuSolver::new(
            TabuConfig::default()
                .with_max_iterations(60)
                .with_tenure(3),
        );
        let result = solver.solve_from(&inst, &seed, later()).unwrap();
        assert!(result.makespan() <= initial);
        assert!(result.schedule.is_valid());
    }

    #[test]
    fn test_config_serde() {
        let config: TabuConfig = serde_json::from_str(r#"{"tenure": 5}"#).unwrap();
        assert_eq!(config.tenure, 5);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.acceptance, TabuAcceptance::Standard);

        let literal: TabuConfig =
            serde_json::from_str(r#"{"acceptance": "Literal", "max_iterations": 7}"#).unwrap();
        assert_eq!(
            literal,
            TabuConfig::default()
                .with_acceptance(TabuAcceptance::Literal)
                .with_max_iterations(7)
        );
    }
}
