//! Error taxonomy for analysis runs
//!
//! Only [`DiscoveryError`] and [`CoordinationError`] (plus configuration and
//! report I/O problems raised before or after the run) are fatal. Per-file
//! [`ReadError`]s and [`AnalysisError`]s are captured inline as failure markers
//! by the engines and never propagate out of them.

use std::path::PathBuf;
use thiserror::Error;

use crate::distributed::Rank;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for a run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Coordination(#[from] CoordinationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The source directory could not be listed
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("source directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to list source directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("invalid extension filter '{extension}': {source}")]
    InvalidFilter {
        extension: String,
        #[source]
        source: globset::Error,
    },
}

/// A single file could not be read
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The analyzer could not produce a result for one file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analyzer panicked: {0}")]
    Panicked(String),
}

/// The identifier given for parameter derivation is unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("identifier '{identifier}' must have at least 3 digits")]
    TooShort { identifier: String },

    #[error("identifier '{identifier}' must contain only ASCII digits")]
    NonDigit { identifier: String },
}

/// A worker thread of the hybrid pipeline died outside per-item capture
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline worker thread panicked")]
    WorkerPanicked,
}

/// The distributed run could not complete scatter or gather
#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("distributed run needs at least one rank")]
    NoRanks,

    #[error("rank {rank} is not reachable for scatter")]
    ScatterFailed { rank: Rank },

    #[error("rank {rank} stopped before reporting its results")]
    RankLost { rank: Rank },

    #[error("received a report from unexpected rank {rank}")]
    UnexpectedRank { rank: Rank },

    #[error("file {file} was reported by more than one rank")]
    DuplicateFile { file: String },

    #[error("gather returned {received} file outcomes, expected {expected}")]
    IncompleteGather { expected: usize, received: usize },

    #[error("rank {rank} failed: {source}")]
    RankFailed {
        rank: Rank,
        #[source]
        source: PipelineError,
    },
}

/// Performance or artifact reporting failed
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(
        "baseline processed {baseline} files but the parallel run processed {parallel}; \
         speedup needs the same workload"
    )]
    MismatchedWorkload { baseline: usize, parallel: usize },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration could not be loaded or is invalid
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
