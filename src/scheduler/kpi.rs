//! Schedule quality metrics (KPIs).
//!
//! Computes standard performance indicators from a decoded schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Machine Utilization | Busy time / makespan, per machine |
//! | Avg Utilization | Mean machine utilization |
//! | Total Idle | Sum over machines of makespan - busy time |
//! | Critical Path Length | Operations on the critical path |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::Schedule;

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: i64,
    /// Utilization per machine (0.0..1.0).
    pub utilization_by_machine: Vec<f64>,
    /// Average machine utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Total machine idle time before the makespan.
    pub total_idle: i64,
    /// Number of operations on the critical path.
    pub critical_path_length: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a decoded schedule.
    pub fn calculate(schedule: &Schedule<'_>) -> Self {
        let instance = schedule.instance();
        let makespan = schedule.makespan();

        let mut busy = vec![0i64; instance.num_machines()];
        for op in instance.operations() {
            busy[instance.machine_of(op)] += instance.duration_of(op);
        }

        let utilization_by_machine: Vec<f64> = busy
            .iter()
            .map(|&b| {
                if makespan == 0 {
                    0.0
                } else {
                    b as f64 / makespan as f64
                }
            })
            .collect();

        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let total_idle = busy.iter().map(|&b| makespan - b).sum();

        Self {
            makespan,
            utilization_by_machine,
            avg_utilization,
            total_idle,
            critical_path_length: schedule.critical_path().len(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: i64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_utilization >= min_utilization
    }
}
