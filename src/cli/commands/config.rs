use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

use crate::cli::output::Output;
use crate::config::{AnalyzerConfig, ConfigFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ShowFormat::Toml)]
        format: ShowFormat,
    },
    /// Load and validate the configuration
    Validate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShowFormat {
    Toml,
    Json,
    Yaml,
}

impl From<ShowFormat> for ConfigFormat {
    fn from(format: ShowFormat) -> Self {
        match format {
            ShowFormat::Toml => ConfigFormat::Toml,
            ShowFormat::Json => ConfigFormat::Json,
            ShowFormat::Yaml => ConfigFormat::Yaml,
        }
    }
}

pub async fn execute(
    args: ConfigArgs,
    custom_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let config =
        AnalyzerConfig::load(custom_config, None).context("Failed to load configuration")?;

    match args.command {
        ConfigCommand::Show { format } => {
            let rendered = config.export(format.into())?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
        }
        ConfigCommand::Validate => output.success("Configuration is valid"),
    }
    Ok(())
}
