//! Text analysis collaborators
//!
//! The engines only see the [`Analyzer`] and [`Reader`] traits. [`TextAnalyzer`]
//! and [`FsReader`] are the implementations used by the CLI.

mod counter;
mod reader;
mod text;

pub use counter::{LengthHistogram, WordCounter};
pub use reader::{FsReader, Reader};
pub use text::TextAnalyzer;

use serde::{Deserialize, Serialize};

/// Which set of statistics to compute per file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Basic,
    Detailed,
}

/// Mode plus the number of top words kept in detailed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub mode: AnalysisMode,
    pub top_k: usize,
}

impl AnalysisOptions {
    pub fn basic() -> Self {
        Self {
            mode: AnalysisMode::Basic,
            top_k: 0,
        }
    }

    pub fn detailed(top_k: usize) -> Self {
        Self {
            mode: AnalysisMode::Detailed,
            top_k,
        }
    }

    pub fn is_detailed(&self) -> bool {
        self.mode == AnalysisMode::Detailed
    }
}

/// Token frequencies and word-length histogram, detailed mode only
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedStats {
    pub top_words: Vec<(String, u64)>,
    pub len_histogram: LengthHistogram,
}

/// Statistics for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub words: u64,
    pub vowels: u64,
    pub digits: u64,
    pub symbols: u64,
    pub avg_len: f64,
    #[serde(flatten)]
    pub detail: Option<DetailedStats>,
}

/// Pure function from file content to statistics
///
/// Implementations must be deterministic and free of shared mutable state:
/// the hybrid pipeline calls `analyze` concurrently from every CPU worker.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str, options: AnalysisOptions) -> AnalysisResult;
}
