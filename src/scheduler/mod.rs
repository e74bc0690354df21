//! Constructive schedulers and KPI evaluation.
//!
//! Builds initial resource orders and measures schedule quality.
//!
//! # Algorithm
//!
//! `GreedyConstructor` dispatches one ready operation at a time, chosen by
//! a rule engine (earliest start, longest remaining work by default).
//! `RandomConstructor` dispatches a uniformly random ready operation.
//! Both always yield decodable orders and serve as local-search seeds.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, machine utilization, idle time, and
//! critical-path length.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Giffler & Thompson (1960), "Algorithms for Solving Production-Scheduling Problems"

mod greedy;
mod kpi;
mod random;

pub use greedy::GreedyConstructor;
pub use kpi::ScheduleKpi;
pub use random::RandomConstructor;
