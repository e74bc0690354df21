//! Rule engine for layered dispatching.
//!
//! A primary rule followed by tie-breakers: each later rule is consulted
//! only when every earlier rule scores two candidates equally.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule};
use crate::models::{Instance, Operation};

/// A composable rule engine for ready-operation prioritization.
///
/// Sorting is stable, so candidates that tie on every rule keep their
/// input order.
///
/// # Example
/// ```
/// use u_jobshop::dispatching::RuleEngine;
/// use u_jobshop::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Est)
///     .with_tie_breaker(rules::Lrpt);
/// assert_eq!(engine.rule_names(), vec!["EST", "LRPT"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a rule consulted only on ties of all rules added before it.
    ///
    /// Same effect as [`with_rule`](Self::with_rule); the name documents
    /// intent at the call site.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Sorts ready operations by priority (highest priority first).
    ///
    /// Returns indices into `ops`.
    pub fn sort_indices(
        &self,
        ops: &[Operation],
        instance: &Instance,
        context: &DispatchContext,
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..ops.len()).collect();
        indices.sort_by(|&a, &b| self.compare(ops[a], ops[b], instance, context));
        indices
    }

    /// Returns the index of the highest-priority operation.
    pub fn select_best(
        &self,
        ops: &[Operation],
        instance: &Instance,
        context: &DispatchContext,
    ) -> Option<usize> {
        self.sort_indices(ops, instance, context).first().copied()
    }

    fn compare(
        &self,
        a: Operation,
        b: Operation,
        instance: &Instance,
        context: &DispatchContext,
    ) -> Ordering {
        self.rules
            .iter()
            .map(|rule| {
                rule.evaluate(a, instance, context)
                    .cmp(&rule.evaluate(b, instance, context))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;

    fn op(job: usize, index: usize) -> Operation {
        Operation::new(job, index)
    }

    // Three jobs, first operations on machines 0, 1, 2 with durations 5, 1, 3.
    // Remaining work: job 0 = 6, job 1 = 8, job 2 = 6.
    fn sample() -> (Instance, DispatchContext) {
        let inst = Instance::new(
            3,
            vec![
                vec![(0, 5), (1, 1), (2, 0)],
                vec![(1, 1), (2, 4), (0, 3)],
                vec![(2, 3), (0, 1), (1, 2)],
            ],
        )
        .unwrap();
        let ctx = DispatchContext::for_instance(&inst);
        (inst, ctx)
    }

    #[test]
    fn test_spt_ordering() {
        let (inst, ctx) = sample();
        let ops = [op(0, 0), op(1, 0), op(2, 0)];
        let engine = RuleEngine::new().with_rule(rules::Spt);

        let indices = engine.sort_indices(&ops, &inst, &ctx);
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let (inst, ctx) = sample();
        let ops = [op(0, 0), op(1, 0), op(2, 0)];
        // All start at 0, so EST ties and LRPT decides: job 1 has most work
        let engine = RuleEngine::new()
            .with_rule(rules::Est)
            .with_tie_breaker(rules::Lrpt);

        assert_eq!(engine.select_best(&ops, &inst, &ctx), Some(1));
    }

    #[test]
    fn test_later_rules_only_break_ties() {
        let (inst, ctx) = sample();
        let ops = [op(0, 0), op(2, 0)];
        // SRPT ties at 6, SPT then prefers job 2 (3 < 5)
        let engine = RuleEngine::new()
            .with_rule(rules::Srpt)
            .with_tie_breaker(rules::Spt);
        assert_eq!(engine.select_best(&ops, &inst, &ctx), Some(1));

        // LPT decides outright, SPT is never consulted
        let engine = RuleEngine::new()
            .with_rule(rules::Lpt)
            .with_tie_breaker(rules::Spt);
        assert_eq!(engine.select_best(&ops, &inst, &ctx), Some(0));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let (inst, ctx) = sample();
        // Jobs 0 and 2 both have 6 remaining; EST and LRPT tie
        let engine = RuleEngine::new()
            .with_rule(rules::Est)
            .with_tie_breaker(rules::Lrpt);

        let forward = [op(0, 0), op(2, 0)];
        let backward = [op(2, 0), op(0, 0)];
        assert_eq!(engine.select_best(&forward, &inst, &ctx), Some(0));
        assert_eq!(engine.select_best(&backward, &inst, &ctx), Some(0));
    }

    #[test]
    fn test_est_follows_context() {
        let (inst, mut ctx) = sample();
        ctx.machine_release[1] = 7;
        let ops = [op(1, 0), op(2, 0)];
        let engine = RuleEngine::new().with_rule(rules::Est);
        assert_eq!(engine.select_best(&ops, &inst, &ctx), Some(1));
    }

    #[test]
    fn test_empty_ops() {
        let (inst, ctx) = sample();
        let engine = RuleEngine::new().with_rule(rules::Spt);
        assert!(engine.sort_indices(&[], &inst, &ctx).is_empty());
        assert!(engine.select_best(&[], &inst, &ctx).is_none());
    }

    #[test]
    fn test_no_rules_keeps_order() {
        let (inst, ctx) = sample();
        let ops = [op(2, 0), op(0, 0), op(1, 0)];
        let engine = RuleEngine::new();
        assert_eq!(engine.sort_indices(&ops, &inst, &ctx), vec![0, 1, 2]);
        assert_eq!(format!("{engine:?}"), "RuleEngine { rules: [] }");
    }
}
