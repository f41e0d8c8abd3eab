use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::{AnalyzerConfig, DerivedParams};
use crate::analysis::AnalysisOptions;
use crate::performance::WorkerLayout;

/// Which parallel engine a run compares against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Hybrid,
    Distributed,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Hybrid => write!(f, "hybrid"),
            RunMode::Distributed => write!(f, "distributed"),
        }
    }
}

/// Fully resolved parameters of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mode: RunMode,
    pub source_directory: PathBuf,
    pub extension: String,
    pub options: AnalysisOptions,
    pub file_limit: Option<usize>,
    pub io_workers: usize,
    /// CPU workers per rank
    pub cpu_workers: usize,
    pub ranks: usize,
    pub channel_buffer_multiplier: usize,
    pub derived: Option<DerivedParams>,
}

impl RunConfig {
    /// Baseline plus one hybrid pipeline sized by `[pipeline]`
    pub fn single_node(config: &AnalyzerConfig) -> Self {
        Self::base(
            config,
            RunMode::Hybrid,
            config.pipeline.io_workers,
            config.pipeline.cpu_workers(),
            1,
        )
    }

    /// Baseline plus `[distributed]` ranks
    pub fn distributed(config: &AnalyzerConfig) -> Self {
        Self::base(
            config,
            RunMode::Distributed,
            config.distributed.io_workers,
            config.distributed.cpu_workers,
            config.distributed.ranks,
        )
    }

    fn base(
        config: &AnalyzerConfig,
        mode: RunMode,
        io_workers: usize,
        cpu_workers: usize,
        ranks: usize,
    ) -> Self {
        let options = if config.run.detailed {
            AnalysisOptions::detailed(config.run.top_k)
        } else {
            AnalysisOptions::basic()
        };

        Self {
            mode,
            source_directory: config.run.source_directory.clone(),
            extension: config.discovery.extension.clone(),
            options,
            file_limit: config.run.file_limit,
            io_workers,
            cpu_workers,
            ranks,
            channel_buffer_multiplier: config.pipeline.channel_buffer_multiplier,
            derived: None,
        }
    }

    /// Replace worker counts and the file limit with derived values
    ///
    /// `explicit_limit` is a limit given on the command line; when present the
    /// smaller of it and the derived limit applies.
    pub fn with_derived(mut self, derived: DerivedParams, explicit_limit: Option<usize>) -> Self {
        self.io_workers = derived.io_workers;
        self.cpu_workers = derived.cpu_workers;
        self.file_limit = Some(match explicit_limit {
            Some(limit) => limit.min(derived.file_limit),
            None => derived.file_limit,
        });
        self.derived = Some(derived);
        self
    }

    pub fn layout(&self) -> WorkerLayout {
        WorkerLayout::distributed(self.ranks, self.io_workers, self.cpu_workers)
    }
}
