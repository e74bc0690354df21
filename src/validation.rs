//! Input validation for job-shop problems.
//!
//! Checks structural integrity before scheduling. Detects:
//! - Jobs with the wrong number of operations
//! - Machine ids outside `0..num_machines`
//! - A job visiting the same machine twice
//! - Negative durations
//! - Total processing time outside the `i64` range
//! - Resource orders that do not place every operation exactly once on
//!   its own machine
//!
//! All checks run to completion and report every problem found.

use thiserror::Error;

use crate::models::{Instance, ResourceOrder};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A job does not have one operation per machine.
    OperationCount,
    /// An operation references a machine that doesn't exist.
    MachineOutOfRange,
    /// A job visits the same machine more than once.
    DuplicateMachine,
    /// An operation has a negative processing time.
    NegativeDuration,
    /// The sum of all processing times does not fit in `i64`.
    DurationOverflow,
    /// A resource order has the wrong number of machine sequences.
    MachineCount,
    /// A machine sequence does not hold one operation per job.
    SequenceLength,
    /// An operation is placed on a machine that does not process it.
    MisplacedOperation,
    /// An operation is placed more than once.
    DuplicateOperation,
    /// An operation does not exist in the instance.
    UnknownOperation,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates raw job data: `(machine, duration)` pairs per job.
///
/// Checks:
/// 1. Every job has exactly `num_machines` operations
/// 2. Every machine id is in range
/// 3. No job visits a machine twice
/// 4. No duration is negative
/// 5. The total processing time fits in `i64`
///
/// Every start and end time of a semi-active schedule is bounded by the
/// total processing time, so passing check 5 keeps schedule arithmetic
/// free of overflow.
pub fn validate_jobs(num_machines: usize, jobs: &[Vec<(usize, i64)>]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut total = Some(0i64);

    for (job, ops) in jobs.iter().enumerate() {
        if ops.len() != num_machines {
            errors.push(ValidationError::new(
                ValidationErrorKind::OperationCount,
                format!(
                    "Job {job} has {} operations, expected {num_machines}",
                    ops.len()
                ),
            ));
            continue;
        }

        let mut seen = vec![false; num_machines];
        for (index, &(machine, duration)) in ops.iter().enumerate() {
            if machine >= num_machines {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MachineOutOfRange,
                    format!("Operation ({job},{index}) uses unknown machine {machine}"),
                ));
            } else if seen[machine] {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateMachine,
                    format!("Job {job} visits machine {machine} twice"),
                ));
            } else {
                seen[machine] = true;
            }

            if duration < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDuration,
                    format!("Operation ({job},{index}) has negative duration {duration}"),
                ));
            } else {
                total = total.and_then(|t| t.checked_add(duration));
            }
        }
    }

    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            format!("Total processing time exceeds {}", i64::MAX),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a resource order against an instance.
///
/// Checks:
/// 1. One sequence per machine
/// 2. Each sequence has one entry per job
/// 3. Every entry is an existing operation processed by that machine
/// 4. No operation appears twice
///
/// A valid order may still contain a precedence cycle; that is only
/// detected when decoding.
pub fn validate_order(instance: &Instance, order: &ResourceOrder) -> ValidationResult {
    let mut errors = Vec::new();

    if order.num_machines() != instance.num_machines() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MachineCount,
            format!(
                "Order has {} machine sequences, instance has {} machines",
                order.num_machines(),
                instance.num_machines()
            ),
        ));
        return Err(errors);
    }

    let mut seen = vec![vec![false; instance.num_machines()]; instance.num_jobs()];
    for (machine, seq) in order.iter() {
        if seq.len() != instance.num_jobs() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SequenceLength,
                format!(
                    "Machine {machine} has {} operations, expected {}",
                    seq.len(),
                    instance.num_jobs()
                ),
            ));
        }

        for &op in seq {
            if !instance.contains(op) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownOperation,
                    format!("Operation {op} on machine {machine} does not exist"),
                ));
                continue;
            }
            if instance.machine_of(op) != machine {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MisplacedOperation,
                    format!(
                        "Operation {op} belongs on machine {}, found on machine {machine}",
                        instance.machine_of(op)
                    ),
                ));
            }
            if std::mem::replace(&mut seen[op.job][op.index], true) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateOperation,
                    format!("Operation {op} appears more than once"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
