//! Job-shop domain models.
//!
//! Provides the problem data, the solution encoding searched by the
//! local-search drivers, and the schedule derived from it.
//!
//! # Data Flow
//!
//! | Type | Role |
//! |------|------|
//! | `Instance` | Read-only problem data (machines and durations per job) |
//! | `ResourceOrder` | Solution encoding: operation sequence per machine |
//! | `Schedule` | Start times, makespan and critical path of an order |
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7

mod instance;
mod resource_order;
mod schedule;

pub use instance::{Instance, Operation};
pub use resource_order::ResourceOrder;
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
