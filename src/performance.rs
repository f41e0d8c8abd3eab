//! Throughput, speedup and efficiency accounting

use serde::Serialize;
use std::time::Duration;

use crate::error::ReportError;

/// Timings are floored to this many seconds before dividing
pub const TIMING_EPSILON_SECS: f64 = 1e-6;

/// Worker layout of the parallel run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerLayout {
    pub io_workers: usize,
    /// CPU workers per rank
    pub cpu_workers: usize,
    pub ranks: usize,
}

impl WorkerLayout {
    pub fn single_node(io_workers: usize, cpu_workers: usize) -> Self {
        Self {
            io_workers,
            cpu_workers,
            ranks: 1,
        }
    }

    pub fn distributed(ranks: usize, io_workers: usize, cpu_workers: usize) -> Self {
        Self {
            io_workers,
            cpu_workers,
            ranks,
        }
    }

    /// Divisor of the efficiency figure: CPU workers across all ranks
    pub fn effective_workers(&self) -> usize {
        self.ranks * self.cpu_workers
    }
}

/// Size and duration of one engine run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workload {
    /// Files the engine was given
    pub files: usize,
    pub elapsed: Duration,
}

/// Figures derived once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub sequential_time_seconds: f64,
    pub parallel_time_seconds: f64,
    pub throughput_files_per_sec: f64,
    pub speedup: f64,
    pub efficiency: f64,
    pub io_workers: usize,
    pub cpu_workers: usize,
    pub rank_count: usize,
}

pub struct PerformanceReporter;

impl PerformanceReporter {
    /// Compare a baseline and a parallel run over the same workload
    ///
    /// `files_processed` is the number of files the parallel run analyzed
    /// successfully. Fails if the two runs were given different file counts.
    pub fn report(
        baseline: Workload,
        parallel: Workload,
        files_processed: usize,
        layout: WorkerLayout,
    ) -> Result<PerformanceReport, ReportError> {
        if baseline.files != parallel.files {
            return Err(ReportError::MismatchedWorkload {
                baseline: baseline.files,
                parallel: parallel.files,
            });
        }

        Ok(Self::compute(
            baseline.elapsed.as_secs_f64(),
            parallel.elapsed.as_secs_f64(),
            files_processed,
            layout,
        ))
    }

    /// Apply the formulas to raw timings
    pub fn compute(
        sequential_secs: f64,
        parallel_secs: f64,
        files_processed: usize,
        layout: WorkerLayout,
    ) -> PerformanceReport {
        let sequential = sequential_secs.max(TIMING_EPSILON_SECS);
        let parallel = parallel_secs.max(TIMING_EPSILON_SECS);
        let speedup = sequential / parallel;
        let workers = layout.effective_workers();
        let efficiency = if workers == 0 {
            0.0
        } else {
            speedup / workers as f64
        };

        PerformanceReport {
            sequential_time_seconds: sequential,
            parallel_time_seconds: parallel,
            throughput_files_per_sec: files_processed as f64 / parallel,
            speedup,
            efficiency,
            io_workers: layout.io_workers,
            cpu_workers: layout.cpu_workers,
            rank_count: layout.ranks,
        }
    }
}
