//! Coordinating rank: partition, scatter, run locally, gather, merge.

use std::time::Duration;

use super::{COORDINATOR, LocalTransport, Rank, RankReport, RankWorker, Transport, distribute};
use crate::aggregate::{AggregateStats, ResultAggregator};
use crate::error::CoordinationError;
use crate::pipeline::{FileOutcomes, FileTask, HybridPipeline};

/// Merged outcome of a distributed run
#[derive(Debug, Clone)]
pub struct DistributedRun {
    /// Outcome of every task across all ranks
    pub outcomes: FileOutcomes,
    /// Totals with frequencies merged from the per-rank counters
    pub stats: AggregateStats,
    /// Slowest rank's elapsed time
    pub parallel_elapsed: Duration,
    /// Elapsed time per rank, rank ascending
    pub rank_elapsed: Vec<(Rank, Duration)>,
}

/// Drives one distributed run from rank 0
pub struct DistributedCoordinator<T: Transport> {
    transport: T,
    local: RankWorker,
}

impl DistributedCoordinator<LocalTransport> {
    /// `ranks` in-process ranks, every one running a copy of `pipeline`
    pub fn local(ranks: usize, pipeline: HybridPipeline) -> Result<Self, CoordinationError> {
        let transport = LocalTransport::spawn(ranks, pipeline.clone())?;
        Ok(Self::new(transport, pipeline))
    }
}

impl<T: Transport> DistributedCoordinator<T> {
    pub fn new(transport: T, pipeline: HybridPipeline) -> Self {
        Self {
            transport,
            local: RankWorker::new(COORDINATOR, pipeline),
        }
    }

    /// Run every task across all ranks and merge the reports
    pub fn run(mut self, tasks: Vec<FileTask>) -> Result<DistributedRun, CoordinationError> {
        let expected = tasks.len();
        let ranks = self.transport.rank_count();
        tracing::info!("Distributing {} files across {} ranks", expected, ranks);

        let partitions = distribute(tasks, ranks)?;
        let local = self.transport.scatter(partitions)?;
        let local_report = self.local.run(local)?;

        let mut reports = self.transport.gather()?;
        reports.push(local_report);
        let run = collect(reports, expected)?;

        tracing::info!(
            "Gathered {} outcomes from {} ranks, slowest rank took {:.3}s",
            run.outcomes.len(),
            ranks,
            run.parallel_elapsed.as_secs_f64()
        );
        Ok(run)
    }
}

/// Merge rank reports into one run; every task must be reported exactly once
fn collect(
    mut reports: Vec<RankReport>,
    expected: usize,
) -> Result<DistributedRun, CoordinationError> {
    reports.sort_by_key(|report| report.rank);

    let mut outcomes = FileOutcomes::new();
    let mut aggregator = ResultAggregator::new();
    let mut rank_elapsed = Vec::with_capacity(reports.len());

    for report in reports {
        aggregator.merge_frequencies(&report.words, &report.histogram);
        rank_elapsed.push((
            report.rank,
            Duration::try_from_secs_f64(report.elapsed_secs).unwrap_or_default(),
        ));

        for (task, outcome) in report.outcomes {
            aggregator.add_totals(&task, &outcome);
            let file = task.to_string();
            if outcomes.insert(task, outcome).is_some() {
                return Err(CoordinationError::DuplicateFile { file });
            }
        }
    }

    if outcomes.len() != expected {
        return Err(CoordinationError::IncompleteGather {
            expected,
            received: outcomes.len(),
        });
    }

    let parallel_elapsed = rank_elapsed
        .iter()
        .map(|(_, elapsed)| *elapsed)
        .max()
        .unwrap_or_default();

    Ok(DistributedRun {
        outcomes,
        stats: aggregator.finish(),
        parallel_elapsed,
        rank_elapsed,
    })
}
