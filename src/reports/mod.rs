//! Structured run record and the optional artifact files

mod csv;
mod json;

pub use csv::csv_content;
pub use json::json_document;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::aggregate::AggregateStats;
use crate::analysis::AnalysisOptions;
use crate::config::{DerivedParams, RunMode};
use crate::distributed::Rank;
use crate::error::ReportError;
use crate::performance::PerformanceReport;
use crate::pipeline::FileOutcomes;

pub const JSON_ARTIFACT: &str = "results.json";
pub const CSV_ARTIFACT: &str = "results.csv";

/// Everything a run produced, rendered by every output surface
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub source_directory: PathBuf,
    pub files_discovered: usize,
    pub options: AnalysisOptions,
    pub aggregate: AggregateStats,
    pub performance: PerformanceReport,
    /// Parallel engine outcomes keyed by file
    pub outcomes: FileOutcomes,
    pub derived: Option<DerivedParams>,
    /// Per-rank elapsed time, empty for single-node runs
    pub rank_elapsed: Vec<(Rank, Duration)>,
}

impl RunReport {
    /// Files analyzed successfully
    pub fn files_processed(&self) -> usize {
        self.aggregate.files
    }

    /// Merged top words, cut to the configured `top_k`
    pub fn top_words(&self) -> Vec<(String, u64)> {
        if !self.options.is_detailed() {
            return Vec::new();
        }
        self.aggregate.most_common(self.options.top_k)
    }
}

/// Paths of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

pub struct ReportGenerator;

impl ReportGenerator {
    /// Write `results.json` and `results.csv` into `output_dir`, creating it if needed
    pub fn write_artifacts(
        report: &RunReport,
        output_dir: &Path,
    ) -> Result<ArtifactPaths, ReportError> {
        fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let json_path = output_dir.join(JSON_ARTIFACT);
        let document = serde_json::to_string_pretty(&json_document(report))?;
        write_file(&json_path, document)?;

        let csv_path = output_dir.join(CSV_ARTIFACT);
        write_file(&csv_path, csv_content(report))?;

        tracing::info!(
            "Wrote {} and {}",
            json_path.display(),
            csv_path.display()
        );
        Ok(ArtifactPaths {
            json: json_path,
            csv: csv_path,
        })
    }
}

fn write_file(path: &Path, content: String) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
