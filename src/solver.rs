//! Solver contract and solve outcome.
//!
//! Every scheduling procedure in the crate, constructive or local search,
//! implements [`Solver`]: it takes an instance and a wall-clock deadline
//! and returns a [`SolveResult`] carrying the decoded schedule, why the
//! search stopped, and simple search counters.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::JobShopResult;
use crate::models::{Assignment, Instance, Schedule};

/// Why a solver returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitCause {
    /// The search had nothing left to do: a local optimum, an empty
    /// neighborhood, an exhausted iteration budget, or a finished construction.
    Blocked,
    /// The deadline passed before the search finished.
    Timeout,
    /// The makespan reached the instance lower bound.
    ProvedOptimal,
}

impl fmt::Display for ExitCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitCause::Blocked => "blocked",
            ExitCause::Timeout => "timeout",
            ExitCause::ProvedOptimal => "proved optimal",
        };
        f.write_str(s)
    }
}

/// Counters collected while solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Rounds (descent) or iterations (tabu) started.
    pub iterations: u64,
    /// Moves that lowered the best makespan.
    pub improvements: u64,
    /// Candidate orders decoded and evaluated.
    pub evaluated: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} improvements, {} evaluated",
            self.iterations, self.improvements, self.evaluated
        )
    }
}

/// Outcome of a solve: the final schedule and how the search ended.
#[derive(Debug, Clone)]
pub struct SolveResult<'a> {
    /// Instance that was solved.
    pub instance: &'a Instance,
    /// Decoded final schedule.
    pub schedule: Schedule<'a>,
    /// Termination cause.
    pub exit_cause: ExitCause,
    /// Search counters.
    pub stats: SearchStats,
}

impl<'a> SolveResult<'a> {
    /// Wraps a final schedule.
    pub fn new(schedule: Schedule<'a>, exit_cause: ExitCause, stats: SearchStats) -> Self {
        Self {
            instance: schedule.instance(),
            schedule,
            exit_cause,
            stats,
        }
    }

    /// Makespan of the final schedule.
    #[inline]
    pub fn makespan(&self) -> i64 {
        self.schedule.makespan()
    }

    /// Serializable summary of the result.
    pub fn report(&self) -> SolveReport {
        SolveReport {
            makespan: self.makespan(),
            lower_bound: self.instance.lower_bound(),
            exit_cause: self.exit_cause,
            stats: self.stats,
            assignments: self.schedule.assignments(),
        }
    }
}

impl fmt::Display for SolveResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "makespan {} ({})", self.makespan(), self.exit_cause)?;
        write!(f, "{}", self.schedule.order())
    }
}

/// Owned, serializable summary of a [`SolveResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub makespan: i64,
    pub lower_bound: i64,
    pub exit_cause: ExitCause,
    pub stats: SearchStats,
    pub assignments: Vec<Assignment>,
}

/// A scheduling procedure.
pub trait Solver {
    /// Solver name for logs.
    fn name(&self) -> &'static str;

    /// Solves `instance`, checking `deadline` between rounds.
    ///
    /// A deadline already in the past still yields a feasible schedule.
    fn solve<'a>(&self, instance: &'a Instance, deadline: Instant)
        -> JobShopResult<SolveResult<'a>>;
}

/// Exit cause for a schedule whose search ended without timing out.
pub(crate) fn settled_cause(schedule: &Schedule<'_>) -> ExitCause {
    if schedule.makespan() == schedule.instance().lower_bound() {
        ExitCause::ProvedOptimal
    } else {
        ExitCause::Blocked
    }
}
