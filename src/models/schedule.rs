//! Schedule (decoded solution) model.
//!
//! A schedule assigns a start time to every operation. It is derived from a
//! [`ResourceOrder`] by semi-active decoding: each operation starts as soon
//! as both its job predecessor and its machine predecessor have finished.
//!
//! # Critical Path
//!
//! The critical path is a longest chain of operations in the disjunctive
//! graph (job edges plus machine-order edges). Its length is the makespan;
//! only reordering operations on it can shorten the schedule.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 7.1: Disjunctive Programming

use serde::{Deserialize, Serialize};

use super::{Instance, Operation, ResourceOrder};
use crate::error::{JobShopError, JobShopResult};
use crate::validation::{ValidationError, ValidationErrorKind};

/// A decoded schedule of one instance.
///
/// Read-only once built; a new schedule is decoded for every order.
#[derive(Debug, Clone)]
pub struct Schedule<'a> {
    instance: &'a Instance,
    order: ResourceOrder,
    /// Start time per `[job][index]`.
    starts: Vec<Vec<i64>>,
    /// Position in the machine sequence per `[job][index]`.
    positions: Vec<Vec<usize>>,
    makespan: i64,
}

/// An operation-machine-time assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job identifier.
    pub job: usize,
    /// Operation index within the job.
    pub index: usize,
    /// Machine processing the operation.
    pub machine: usize,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
}

/// A feasibility violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending operation.
    pub operation: Operation,
    /// Human-readable description.
    pub message: String,
}

/// Classification of feasibility violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Operation started before its job predecessor finished.
    PrecedenceViolation,
    /// Operation overlaps another one on the same machine.
    MachineOverlap,
}

impl<'a> Schedule<'a> {
    /// Decodes a resource order into start times.
    ///
    /// # Errors
    /// - [`JobShopError::InvalidOrder`] if the order has the wrong number of
    ///   machines, places an operation on the wrong machine, repeats one, or
    ///   omits one.
    /// - [`JobShopError::Deadlock`] if machine and job orders form a cycle.
    pub fn from_order(instance: &'a Instance, order: &ResourceOrder) -> JobShopResult<Self> {
        let num_jobs = instance.num_jobs();
        let num_machines = instance.num_machines();

        if order.num_machines() != num_machines {
            return Err(invalid_order(
                ValidationErrorKind::MachineCount,
                format!(
                    "Order has {} machine sequences, instance has {num_machines} machines",
                    order.num_machines()
                ),
            ));
        }

        let mut starts = vec![vec![0i64; num_machines]; num_jobs];
        let mut positions = vec![vec![0usize; num_machines]; num_jobs];
        let mut next_by_job = vec![0usize; num_jobs];
        let mut next_by_machine = vec![0usize; num_machines];
        let mut machine_free = vec![0i64; num_machines];
        let mut placed = 0usize;

        loop {
            let mut progress = false;
            for machine in 0..num_machines {
                let seq = order.machine(machine);
                while let Some(&op) = seq.get(next_by_machine[machine]) {
                    if !instance.contains(op) {
                        return Err(invalid_order(
                            ValidationErrorKind::UnknownOperation,
                            format!("Operation {op} does not exist in the instance"),
                        ));
                    }
                    if instance.machine_of(op) != machine {
                        return Err(invalid_order(
                            ValidationErrorKind::MisplacedOperation,
                            format!("Operation {op} is not processed by machine {machine}"),
                        ));
                    }
                    if op.index < next_by_job[op.job] {
                        return Err(invalid_order(
                            ValidationErrorKind::DuplicateOperation,
                            format!("Operation {op} appears more than once"),
                        ));
                    }
                    if op.index > next_by_job[op.job] {
                        break;
                    }

                    let job_ready = if op.index == 0 {
                        0
                    } else {
                        let prev = Operation::new(op.job, op.index - 1);
                        starts[prev.job][prev.index] + instance.duration_of(prev)
                    };
                    let start = job_ready.max(machine_free[machine]);

                    starts[op.job][op.index] = start;
                    positions[op.job][op.index] = next_by_machine[machine];
                    machine_free[machine] = start + instance.duration_of(op);
                    next_by_job[op.job] += 1;
                    next_by_machine[machine] += 1;
                    placed += 1;
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        if placed < instance.num_operations() {
            let exhausted = order
                .iter()
                .all(|(machine, seq)| next_by_machine[machine] == seq.len());
            if exhausted {
                return Err(invalid_order(
                    ValidationErrorKind::SequenceLength,
                    format!(
                        "Order places {placed} of {} operations",
                        instance.num_operations()
                    ),
                ));
            }
            return Err(JobShopError::Deadlock);
        }

        let makespan = machine_free.iter().copied().max().unwrap_or(0);

        Ok(Self {
            instance,
            order: order.clone(),
            starts,
            positions,
            makespan,
        })
    }

    /// Builds a schedule from explicit start times per `[job][index]`.
    ///
    /// Machine orders are recovered by sorting on start time. The result is
    /// not checked for feasibility; use [`Schedule::violations`].
    pub fn from_start_times(instance: &'a Instance, starts: Vec<Vec<i64>>) -> JobShopResult<Self> {
        let shape_ok = starts.len() == instance.num_jobs()
            && starts.iter().all(|job| job.len() == instance.num_machines());
        if !shape_ok {
            return Err(invalid_order(
                ValidationErrorKind::SequenceLength,
                format!(
                    "Expected {} jobs with {} start times each",
                    instance.num_jobs(),
                    instance.num_machines()
                ),
            ));
        }

        let order = ResourceOrder::by_start_times(instance, |op| starts[op.job][op.index]);
        let mut positions = vec![vec![0usize; instance.num_machines()]; instance.num_jobs()];
        for (_, seq) in order.iter() {
            for (pos, op) in seq.iter().enumerate() {
                positions[op.job][op.index] = pos;
            }
        }
        let makespan = instance
            .operations()
            .map(|op| starts[op.job][op.index] + instance.duration_of(op))
            .max()
            .unwrap_or(0);

        Ok(Self {
            instance,
            order,
            starts,
            positions,
            makespan,
        })
    }

    /// The instance this schedule belongs to.
    #[inline]
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// The machine order this schedule realizes.
    #[inline]
    pub fn order(&self) -> &ResourceOrder {
        &self.order
    }

    /// Consumes the schedule, returning its machine order.
    pub fn into_order(self) -> ResourceOrder {
        self.order
    }

    /// Start time of `op`.
    #[inline]
    pub fn start(&self, op: Operation) -> i64 {
        self.starts[op.job][op.index]
    }

    /// End time of `op`.
    #[inline]
    pub fn end(&self, op: Operation) -> i64 {
        self.start(op) + self.instance.duration_of(op)
    }

    /// Makespan: latest end time across all operations.
    #[inline]
    pub fn makespan(&self) -> i64 {
        self.makespan
    }

    /// Position of `op` in its machine's sequence.
    #[inline]
    pub fn position_of(&self, op: Operation) -> usize {
        self.positions[op.job][op.index]
    }

    /// One critical path, first operation to last.
    ///
    /// Starts from the last operation with the greatest end time (lowest job
    /// id on ties) and walks back through the predecessor that delays it:
    /// the job predecessor when it ends exactly at the current start,
    /// otherwise the machine predecessor.
    pub fn critical_path(&self) -> Vec<Operation> {
        let last = match self.instance.num_machines().checked_sub(1) {
            Some(last) => last,
            None => return Vec::new(),
        };

        let mut current = match (0..self.instance.num_jobs())
            .map(|job| Operation::new(job, last))
            .reduce(|best, op| if self.end(op) > self.end(best) { op } else { best })
        {
            Some(op) => op,
            None => return Vec::new(),
        };

        let mut path = vec![current];
        while self.start(current) > 0 {
            let on_job = current
                .index
                .checked_sub(1)
                .map(|index| Operation::new(current.job, index))
                .filter(|&prev| self.end(prev) == self.start(current));

            let predecessor = on_job.or_else(|| {
                let machine = self.instance.machine_of(current);
                self.position_of(current)
                    .checked_sub(1)
                    .and_then(|pos| self.order.get(machine, pos))
            });

            match predecessor {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// All assignments, job by job.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.instance
            .operations()
            .map(|op| Assignment {
                job: op.job,
                index: op.index,
                machine: self.instance.machine_of(op),
                start: self.start(op),
                end: self.end(op),
            })
            .collect()
    }

    /// Feasibility violations: job precedence and machine overlap.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for op in self.instance.operations() {
            if op.index == 0 {
                if self.start(op) < 0 {
                    violations.push(Violation {
                        violation_type: ViolationType::PrecedenceViolation,
                        operation: op,
                        message: format!("Operation {op} starts before time 0"),
                    });
                }
                continue;
            }
            let prev = Operation::new(op.job, op.index - 1);
            if self.start(op) < self.end(prev) {
                violations.push(Violation {
                    violation_type: ViolationType::PrecedenceViolation,
                    operation: op,
                    message: format!(
                        "Operation {op} starts at {} before {prev} ends at {}",
                        self.start(op),
                        self.end(prev)
                    ),
                });
            }
        }

        for (machine, seq) in self.order.iter() {
            for pair in seq.windows(2) {
                if self.start(pair[1]) < self.end(pair[0]) {
                    violations.push(Violation {
                        violation_type: ViolationType::MachineOverlap,
                        operation: pair[1],
                        message: format!(
                            "Operation {} overlaps {} on machine {machine}",
                            pair[1], pair[0]
                        ),
                    });
                }
            }
        }

        violations
    }

    /// Whether the schedule is feasible.
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

fn invalid_order(kind: ValidationErrorKind, message: String) -> JobShopError {
    JobShopError::InvalidOrder(vec![ValidationError::new(kind, message)])
}
