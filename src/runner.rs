//! End-to-end run: discovery, baseline, parallel engine, aggregation, accounting

use std::time::Duration;
use uuid::Uuid;

use crate::aggregate::{AggregateStats, ResultAggregator};
use crate::config::{RunConfig, RunMode};
use crate::discovery::FileDiscovery;
use crate::distributed::{DistributedCoordinator, Rank};
use crate::error::Result;
use crate::performance::{PerformanceReporter, Workload};
use crate::pipeline::{AnalysisContext, FileOutcomes, FileTask, HybridPipeline, SequentialBaseline};
use crate::reports::RunReport;

/// Runs the baseline and the configured parallel engine over one file set
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunConfig,
    ctx: AnalysisContext,
}

struct ParallelRun {
    outcomes: FileOutcomes,
    stats: AggregateStats,
    elapsed: Duration,
    rank_elapsed: Vec<(Rank, Duration)>,
}

impl Runner {
    /// Runner reading from the filesystem with the reference analyzer
    pub fn new(config: RunConfig) -> Self {
        let ctx = AnalysisContext::standard(config.options);
        Self { config, ctx }
    }

    /// Execute the run; only discovery and coordination failures are errors
    pub fn run(&self) -> Result<RunReport> {
        let tasks = FileDiscovery::new(&self.config.extension)?
            .with_limit(self.config.file_limit)
            .discover(&self.config.source_directory)?;
        let files_discovered = tasks.len();

        let baseline = SequentialBaseline::new(self.ctx.clone()).run(&tasks);
        let parallel = self.run_parallel(tasks)?;

        let performance = PerformanceReporter::report(
            Workload {
                files: baseline.outcomes.len(),
                elapsed: baseline.elapsed,
            },
            Workload {
                files: parallel.outcomes.len(),
                elapsed: parallel.elapsed,
            },
            parallel.stats.files,
            self.config.layout(),
        )?;

        tracing::info!(
            "{} run complete: {} of {} files processed, speedup {:.2}x",
            self.config.mode,
            parallel.stats.files,
            files_discovered,
            performance.speedup
        );

        Ok(RunReport {
            run_id: Uuid::new_v4(),
            mode: self.config.mode,
            source_directory: self.config.source_directory.clone(),
            files_discovered,
            options: self.config.options,
            aggregate: parallel.stats,
            performance,
            outcomes: parallel.outcomes,
            derived: self.config.derived.clone(),
            rank_elapsed: parallel.rank_elapsed,
        })
    }

    fn run_parallel(&self, tasks: Vec<FileTask>) -> Result<ParallelRun> {
        let pipeline = HybridPipeline::new(
            self.ctx.clone(),
            self.config.io_workers,
            self.config.cpu_workers,
        )
        .with_buffer_multiplier(self.config.channel_buffer_multiplier);

        match self.config.mode {
            RunMode::Hybrid => {
                let run = pipeline.run(tasks)?;
                let stats = ResultAggregator::fold(&run.outcomes);
                Ok(ParallelRun {
                    outcomes: run.outcomes,
                    stats,
                    elapsed: run.elapsed,
                    rank_elapsed: Vec::new(),
                })
            }
            RunMode::Distributed => {
                let run = DistributedCoordinator::local(self.config.ranks, pipeline)?.run(tasks)?;
                Ok(ParallelRun {
                    outcomes: run.outcomes,
                    stats: run.stats,
                    elapsed: run.parallel_elapsed,
                    rank_elapsed: run.rank_elapsed,
                })
            }
        }
    }
}
