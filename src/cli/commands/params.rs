use anyhow::{Context, Result};
use clap::Args;

use crate::cli::args::OutputFormat;
use crate::cli::output::Output;
use crate::config::DerivedParams;

#[derive(Args)]
pub struct ParamsArgs {
    /// Numeric identifier, at least three digits
    pub identifier: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn execute(args: ParamsArgs, output: &Output) -> Result<()> {
    let derived = DerivedParams::from_identifier(&args.identifier)
        .context("Cannot derive parameters")?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&derived)?),
        OutputFormat::Text => {
            output.header(&format!("Parameters for {}", derived.identifier));
            output.table_row("IO workers", &derived.io_workers.to_string());
            output.table_row("CPU workers", &derived.cpu_workers.to_string());
            output.table_row("File limit", &derived.file_limit.to_string());
        }
    }
    Ok(())
}
