//! # Hybrid Analyzer - bulk text analysis at three levels of parallelism
//!
//! Every file with the configured extension in one folder is analyzed for
//! word, vowel, digit and symbol counts, and optionally for top words and a
//! word-length histogram. The same file set runs through:
//!
//! - a **sequential baseline** that reads and analyzes one file at a time
//! - a **hybrid pipeline** overlapping blocking reads with CPU analysis
//! - a **distributed coordinator** that scatters files across ranks, each
//!   running its own hybrid pipeline, and gathers the partial results
//!
//! Results are merged into one aggregate and compared against the baseline
//! as speedup, efficiency and throughput.
//!
//! ## Quick Start
//!
//! ```bash
//! hybrid-analyzer analyze --folder data --detailed
//! hybrid-analyzer distributed --ranks 4 --folder data --write-files
//! hybrid-analyzer params 237006081
//! ```

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod distributed;
pub mod error;
pub mod performance;
pub mod pipeline;
pub mod reports;
pub mod runner;

pub use aggregate::{AggregateStats, ResultAggregator};
pub use analysis::{AnalysisOptions, AnalysisResult, Analyzer, TextAnalyzer};
pub use config::{AnalyzerConfig, RunConfig, RunMode};
pub use error::{Error, Result};
pub use pipeline::{FileTask, HybridPipeline, SequentialBaseline};
pub use runner::Runner;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
