//! Flags shared by the run commands

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::config::{ConfigOverrides, RunMode};

/// How a finished run is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// The JSON document also written to results.json
    Json,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory holding the input files
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// File extension to analyze
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Threads in the I/O stage
    #[arg(long, value_name = "N")]
    pub io_workers: Option<usize>,

    /// Threads in the CPU stage
    #[arg(long, value_name = "N")]
    pub cpu_workers: Option<usize>,

    /// Also compute top words and the word-length histogram
    #[arg(long)]
    pub detailed: bool,

    /// Number of top words kept in detailed mode
    #[arg(long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Analyze at most this many files
    #[arg(long, visible_alias = "limit-data", value_name = "N")]
    pub limit: Option<usize>,

    /// Derive worker counts and the file limit from a numeric identifier
    #[arg(long, value_name = "ID")]
    pub nim: Option<String>,

    /// Write results.json and results.csv
    #[arg(long)]
    pub write_files: bool,

    /// Directory for written artifacts
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Config overrides for the flags that were given; worker counts land in
    /// the section the run mode reads
    pub fn overrides(&self, mode: RunMode) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        overrides.run.source_directory = self.folder.clone();
        overrides.run.detailed = self.detailed.then_some(true);
        overrides.run.top_k = self.top_k;
        overrides.run.file_limit = self.limit;
        overrides.discovery.extension = self.extension.clone();
        overrides.output.write_files = self.write_files.then_some(true);
        overrides.output.directory = self.output_dir.clone();

        match mode {
            RunMode::Hybrid => {
                overrides.pipeline.io_workers = self.io_workers;
                overrides.pipeline.cpu_workers = self.cpu_workers;
            }
            RunMode::Distributed => {
                overrides.distributed.io_workers = self.io_workers;
                overrides.distributed.cpu_workers = self.cpu_workers;
            }
        }
        overrides
    }
}
