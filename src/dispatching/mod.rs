//! Dispatching rules and rule engine for priority-dispatch construction.
//!
//! Provides priority rules over ready operations (EST, SPT, LPT, SRPT,
//! LRPT) and a rule engine that applies them in sequence, each later rule
//! only breaking ties left by the earlier ones.
//!
//! # Usage
//!
//! ```
//! use u_jobshop::dispatching::{RuleEngine, DispatchContext};
//! use u_jobshop::dispatching::rules;
//! use u_jobshop::models::{Instance, Operation};
//!
//! let instance: Instance = "2 2\n0 3 1 2\n1 2 0 3\n".parse().unwrap();
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Est)
//!     .with_tie_breaker(rules::Lrpt);
//!
//! let context = DispatchContext::for_instance(&instance);
//! let ready = [Operation::new(0, 0), Operation::new(1, 0)];
//! assert_eq!(engine.select_best(&ready, &instance, &context), Some(0));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::RuleEngine;

use crate::models::{Instance, Operation};
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first). Scores are times or
/// their negations, compared exactly.
pub type RuleScore = i64;

/// A dispatching rule that evaluates the priority of a ready operation.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for operations that should be dispatched first.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "EST", "LRPT").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a ready operation.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, op: Operation, instance: &Instance, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
