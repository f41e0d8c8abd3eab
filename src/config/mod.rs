//! Configuration for analysis runs
//!
//! [`AnalyzerConfig`] is the layered settings tree loaded by [`core`]. It is
//! resolved once into a [`RunConfig`] before any engine starts; identifier
//! derived parameters ([`DerivedParams`]) are applied during that resolution.

pub mod core;
pub mod params;
pub mod run;

pub use self::core::{CONFIG_BASENAME, ConfigFormat, ConfigOverrides, ENV_PREFIX};
pub use params::DerivedParams;
pub use run::{RunConfig, RunMode};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Complete settings tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub run: RunSettings,
    pub discovery: DiscoverySettings,
    pub pipeline: PipelineSettings,
    pub distributed: DistributedSettings,
    pub output: OutputSettings,
}

/// What to analyze and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub source_directory: PathBuf,
    pub detailed: bool,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_limit: Option<usize>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            source_directory: PathBuf::from("data"),
            detailed: false,
            top_k: 20,
            file_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Extension without the leading dot
    pub extension: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
        }
    }
}

/// Single-node pipeline sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub io_workers: usize,
    /// `None` uses every available core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_workers: Option<usize>,
    pub channel_buffer_multiplier: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            io_workers: crate::pipeline::DEFAULT_IO_WORKERS,
            cpu_workers: None,
            channel_buffer_multiplier: crate::pipeline::DEFAULT_BUFFER_MULTIPLIER,
        }
    }
}

impl PipelineSettings {
    pub fn cpu_workers(&self) -> usize {
        self.cpu_workers.unwrap_or_else(num_cpus::get)
    }
}

/// Rank count and per-rank pipeline sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributedSettings {
    pub ranks: usize,
    pub io_workers: usize,
    pub cpu_workers: usize,
}

impl Default for DistributedSettings {
    fn default() -> Self {
        Self {
            ranks: 4,
            io_workers: 2,
            cpu_workers: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub write_files: bool,
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            write_files: false,
            directory: PathBuf::from("."),
        }
    }
}

impl AnalyzerConfig {
    /// Reject settings no run can execute with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("run.top_k", self.run.top_k),
            ("pipeline.io_workers", self.pipeline.io_workers),
            ("pipeline.cpu_workers", self.pipeline.cpu_workers.unwrap_or(1)),
            (
                "pipeline.channel_buffer_multiplier",
                self.pipeline.channel_buffer_multiplier,
            ),
            ("distributed.ranks", self.distributed.ranks),
            ("distributed.io_workers", self.distributed.io_workers),
            ("distributed.cpu_workers", self.distributed.cpu_workers),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be greater than 0")));
        }

        if self.discovery.extension.trim_start_matches('.').trim().is_empty() {
            return Err(ConfigError::Invalid(
                "discovery.extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
