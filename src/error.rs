//! Error types for the job-shop engine.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading instances or decoding resource orders.
///
/// The search loops themselves never fail: a candidate that cannot be
/// decoded is skipped. Errors only surface at the boundary, when an
/// instance is built or a caller-supplied seed order is rejected.
#[derive(Debug, Error)]
pub enum JobShopError {
    /// Instance file could not be read.
    #[error("failed to read instance: {0}")]
    Io(#[from] std::io::Error),

    /// Instance text is malformed.
    #[error("malformed instance at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Instance data violates the job-shop structure.
    #[error("invalid instance ({} problem(s)): {}", .0.len(), first_message(.0))]
    InvalidInstance(Vec<ValidationError>),

    /// Resource order does not match the instance.
    #[error("invalid resource order ({} problem(s)): {}", .0.len(), first_message(.0))]
    InvalidOrder(Vec<ValidationError>),

    /// No operation can be placed next: the order contains a precedence cycle.
    #[error("resource order cannot be decoded: precedence cycle between machine and job order")]
    Deadlock,
}

/// Result type for job-shop operations.
pub type JobShopResult<T> = Result<T, JobShopError>;

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("")
}
