//! Job-shop scheduling engine.
//!
//! Builds an initial machine order with priority dispatch, then improves it
//! with local search over critical-path blocks.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Instance`, `Operation`, `ResourceOrder`,
//!   `Schedule`, `Assignment`
//! - **`validation`**: Input integrity checks (operation counts, machine
//!   ranges, order completeness)
//! - **`dispatching`**: Priority rules (EST, SPT, LPT, SRPT, LRPT) and a
//!   composable rule engine
//! - **`scheduler`**: Greedy and random constructors, schedule KPIs
//! - **`local_search`**: Block decomposition, boundary-swap neighborhood,
//!   steepest descent and tabu search
//! - **`solver`**: The `Solver` trait and solve outcome
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use u_jobshop::local_search::TabuSolver;
//! use u_jobshop::models::Instance;
//! use u_jobshop::solver::Solver;
//!
//! let instance: Instance = "\
//! 3 3
//! 0 3 1 2 2 2
//! 0 2 2 1 1 4
//! 1 4 2 3 0 1
//! ".parse().unwrap();
//!
//! let deadline = Instant::now() + Duration::from_secs(1);
//! let result = TabuSolver::default().solve(&instance, deadline).unwrap();
//! assert!(result.schedule.is_valid());
//! assert!(result.makespan() >= instance.lower_bound());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Nowicki & Smutnicki (1996), "A Fast Taboo Search Algorithm for the Job Shop Problem"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod dispatching;
pub mod error;
pub mod local_search;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{JobShopError, JobShopResult};
