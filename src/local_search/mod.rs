//! Local search over machine orders.
//!
//! Both drivers share one neighborhood: the critical path of the current
//! schedule is split into [`Block`]s, and each block offers at most two
//! boundary [`Swap`]s. Every candidate is built from its own copy of the
//! current order and decoded into a fresh schedule.
//!
//! | Driver | Acceptance |
//! |--------|-----------|
//! | [`DescentSolver`] | Best strictly improving neighbor, stop at a local optimum |
//! | [`TabuSolver`] | Best admissible neighbor, recency-based tabu table, keeps the incumbent |
//!
//! # References
//!
//! - van Laarhoven, Aarts & Lenstra (1992), "Job Shop Scheduling by Simulated Annealing"
//! - Nowicki & Smutnicki (1996), "A Fast Taboo Search Algorithm for the Job Shop Problem"

mod block;
mod descent;
mod neighborhood;
mod tabu;

pub use block::{blocks_of, Block};
pub use descent::DescentSolver;
pub use neighborhood::{neighbors_of, Swap};
pub use tabu::{TabuAcceptance, TabuConfig, TabuList, TabuSolver};

use tracing::trace;

use crate::error::{JobShopError, JobShopResult};
use crate::models::{Instance, ResourceOrder, Schedule};
use crate::solver::SearchStats;
use crate::validation::validate_order;

/// A decoded neighbor of the current schedule.
struct Neighbor<'a> {
    swap: Swap,
    schedule: Schedule<'a>,
}

/// Decodes every neighbor of `current`, blocks in path order, swaps in
/// generation order. Candidates that fail to decode are skipped.
fn explore<'a>(current: &Schedule<'a>, stats: &mut SearchStats) -> Vec<Neighbor<'a>> {
    let instance = current.instance();
    let mut neighbors = Vec::new();

    for block in blocks_of(current) {
        for swap in neighbors_of(&block) {
            let order = swap.applied_to(current.order());
            stats.evaluated += 1;
            match Schedule::from_order(instance, &order) {
                Ok(schedule) => neighbors.push(Neighbor { swap, schedule }),
                Err(err) => trace!(?swap, %err, "skipping candidate"),
            }
        }
    }

    neighbors
}

/// Validates and decodes a caller-supplied starting order.
fn decode_seed<'a>(instance: &'a Instance, seed: &ResourceOrder) -> JobShopResult<Schedule<'a>> {
    validate_order(instance, seed).map_err(JobShopError::InvalidOrder)?;
    Schedule::from_order(instance, seed)
}
