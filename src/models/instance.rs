//! Job-shop instance model.
//!
//! An instance is a set of jobs, each a fixed sequence of operations.
//! Every operation runs on exactly one machine for a fixed duration, and
//! every job visits every machine exactly once.
//!
//! # Text Format
//!
//! ```text
//! # comment lines and blank lines are ignored
//! 2 2            <- num_jobs num_machines
//! 0 3 1 2        <- job 0: (machine, duration) per operation
//! 1 2 0 3        <- job 1
//! ```
//!
//! # Reference
//! Fisher & Thompson (1963), "Probabilistic learning combinations of local
//! job-shop scheduling rules" (FT06/FT10/FT20 benchmark format)

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{JobShopError, JobShopResult};
use crate::validation::validate_jobs;

/// One operation of a job: the `index`-th step of job `job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// Job identifier (0-indexed).
    pub job: usize,
    /// Position within the job (0-indexed).
    pub index: usize,
}

impl Operation {
    /// Creates a new operation reference.
    #[inline]
    pub fn new(job: usize, index: usize) -> Self {
        Self { job, index }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.job, self.index)
    }
}

/// Read-only job-shop problem data.
///
/// Constructed through [`Instance::new`] or parsed from text; both paths
/// validate that each job has one operation per machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    num_machines: usize,
    machines: Vec<Vec<usize>>,
    durations: Vec<Vec<i64>>,
}

/// Serialized form: one `(machine, duration)` list per job.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstanceData {
    num_machines: usize,
    jobs: Vec<Vec<(usize, i64)>>,
}

impl Instance {
    /// Builds an instance from `(machine, duration)` pairs per job.
    ///
    /// # Errors
    /// [`JobShopError::InvalidInstance`] listing every structural problem
    /// (wrong operation count, unknown or repeated machine, negative duration).
    pub fn new(num_machines: usize, jobs: Vec<Vec<(usize, i64)>>) -> JobShopResult<Self> {
        validate_jobs(num_machines, &jobs).map_err(JobShopError::InvalidInstance)?;

        let machines = jobs
            .iter()
            .map(|ops| ops.iter().map(|&(m, _)| m).collect())
            .collect();
        let durations = jobs
            .iter()
            .map(|ops| ops.iter().map(|&(_, d)| d).collect())
            .collect();

        Ok(Self {
            num_machines,
            machines,
            durations,
        })
    }

    /// Parses an instance from the benchmark text format.
    pub fn from_reader<R: BufRead>(reader: R) -> JobShopResult<Self> {
        let mut lines = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines.push((idx + 1, trimmed.to_string()));
        }

        let mut iter = lines.into_iter();
        let (header_line, header) = iter.next().ok_or_else(|| JobShopError::Parse {
            line: 1,
            message: "missing 'num_jobs num_machines' header".into(),
        })?;

        let header = parse_numbers(header_line, &header)?;
        if header.len() != 2 || header.iter().any(|&v| v < 0) {
            return Err(JobShopError::Parse {
                line: header_line,
                message: "header must contain two non-negative integers".into(),
            });
        }
        let num_jobs = header[0] as usize;
        let num_machines = header[1] as usize;

        let mut jobs = Vec::new();
        let mut last_line = header_line;
        for job in 0..num_jobs {
            let (line_no, line) = iter.next().ok_or_else(|| JobShopError::Parse {
                line: last_line + 1,
                message: format!("expected {num_jobs} job lines, found {job}"),
            })?;
            last_line = line_no;

            let values = parse_numbers(line_no, &line)?;
            if values.len() != num_machines.saturating_mul(2) {
                return Err(JobShopError::Parse {
                    line: line_no,
                    message: format!(
                        "expected {} integers (machine duration pairs), found {}",
                        num_machines.saturating_mul(2),
                        values.len()
                    ),
                });
            }

            let mut ops = Vec::with_capacity(num_machines);
            for pair in values.chunks_exact(2) {
                if pair[0] < 0 {
                    return Err(JobShopError::Parse {
                        line: line_no,
                        message: format!("machine id must be non-negative, got {}", pair[0]),
                    });
                }
                ops.push((pair[0] as usize, pair[1]));
            }
            jobs.push(ops);
        }

        Self::new(num_machines, jobs)
    }

    /// Reads an instance file.
    pub fn read(path: impl AsRef<Path>) -> JobShopResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Number of jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.machines.len()
    }

    /// Number of machines.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Number of operations in every job (equals the machine count).
    #[inline]
    pub fn num_operations_per_job(&self) -> usize {
        self.num_machines
    }

    /// Total number of operations.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.num_jobs() * self.num_machines
    }

    /// Machine that processes `op`.
    #[inline]
    pub fn machine_of(&self, op: Operation) -> usize {
        self.machines[op.job][op.index]
    }

    /// Processing time of `op`.
    #[inline]
    pub fn duration_of(&self, op: Operation) -> i64 {
        self.durations[op.job][op.index]
    }

    /// Whether `op` refers to an operation of this instance.
    #[inline]
    pub fn contains(&self, op: Operation) -> bool {
        op.job < self.num_jobs() && op.index < self.num_machines
    }

    /// Total processing time of a job.
    pub fn job_duration(&self, job: usize) -> i64 {
        self.durations[job].iter().sum()
    }

    /// The operation of `job` that runs on `machine`.
    pub fn operation_on(&self, job: usize, machine: usize) -> Option<Operation> {
        self.machines
            .get(job)?
            .iter()
            .position(|&m| m == machine)
            .map(|index| Operation::new(job, index))
    }

    /// All operations, job by job.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        (0..self.num_jobs())
            .flat_map(move |job| (0..self.num_machines).map(move |index| Operation::new(job, index)))
    }

    /// Trivial makespan lower bound: max(largest machine load, longest job).
    ///
    /// A schedule reaching this value is optimal.
    pub fn lower_bound(&self) -> i64 {
        if self.num_jobs() == 0 {
            return 0;
        }
        let mut machine_load = vec![0i64; self.num_machines];
        for op in self.operations() {
            machine_load[self.machine_of(op)] += self.duration_of(op);
        }
        let max_load = machine_load.into_iter().max().unwrap_or(0);
        let max_job = (0..self.num_jobs())
            .map(|j| self.job_duration(j))
            .max()
            .unwrap_or(0);
        max_load.max(max_job)
    }
}

impl FromStr for Instance {
    type Err = JobShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

impl TryFrom<InstanceData> for Instance {
    type Error = JobShopError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Self::new(data.num_machines, data.jobs)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        let jobs = instance
            .machines
            .iter()
            .zip(&instance.durations)
            .map(|(ms, ds)| ms.iter().copied().zip(ds.iter().copied()).collect())
            .collect();
        Self {
            num_machines: instance.num_machines,
            jobs,
        }
    }
}

fn parse_numbers(line_no: usize, line: &str) -> JobShopResult<Vec<i64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| JobShopError::Parse {
                line: line_no,
                message: format!("'{token}' is not an integer"),
            })
        })
        .collect()
}
