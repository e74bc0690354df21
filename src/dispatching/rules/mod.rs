//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Time-based**: EST
//! - **Operation length**: SPT, LPT
//! - **Job work remaining**: SRPT, LRPT
//!
//! # Score Convention
//! All rules return lower scores for higher priority operations. Scores are
//! exact integers, so times anywhere in the `i64` range order correctly.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::{Instance, Operation};

// ======================== Time-based rules ========================

/// Earliest Start Time.
///
/// Prioritizes operations that can start soonest, given when their job
/// and their machine become free. Keeps machines busy (non-delay flavor).
#[derive(Debug, Clone, Copy)]
pub struct Est;

impl DispatchingRule for Est {
    fn name(&self) -> &'static str {
        "EST"
    }

    fn evaluate(&self, op: Operation, instance: &Instance, context: &DispatchContext) -> RuleScore {
        context.earliest_start(instance, op)
    }

    fn description(&self) -> &'static str {
        "Earliest Start Time"
    }
}

// ======================== Operation length rules ========================

/// Shortest Processing Time.
///
/// Prioritizes operations with shorter processing time.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, op: Operation, instance: &Instance, _context: &DispatchContext) -> RuleScore {
        instance.duration_of(op)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, op: Operation, instance: &Instance, _context: &DispatchContext) -> RuleScore {
        -instance.duration_of(op)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

// ======================== Work remaining rules ========================

/// Shortest Remaining Processing Time.
///
/// Prioritizes jobs closest to completion.
#[derive(Debug, Clone, Copy)]
pub struct Srpt;

impl DispatchingRule for Srpt {
    fn name(&self) -> &'static str {
        "SRPT"
    }

    fn evaluate(&self, op: Operation, _instance: &Instance, context: &DispatchContext) -> RuleScore {
        context.remaining_work[op.job]
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Processing Time"
    }
}

/// Longest Remaining Processing Time.
///
/// Prioritizes jobs with the most unscheduled work, which tend to end up
/// on the critical path if delayed.
#[derive(Debug, Clone, Copy)]
pub struct Lrpt;

impl DispatchingRule for Lrpt {
    fn name(&self) -> &'static str {
        "LRPT"
    }

    fn evaluate(&self, op: Operation, _instance: &Instance, context: &DispatchContext) -> RuleScore {
        -context.remaining_work[op.job]
    }

    fn description(&self) -> &'static str {
        "Longest Remaining Processing Time"
    }
}
