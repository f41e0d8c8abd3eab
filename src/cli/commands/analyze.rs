use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::report::execute_run;
use crate::cli::args::RunArgs;
use crate::cli::output::Output;
use crate::config::RunMode;

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub async fn execute(
    args: AnalyzeArgs,
    custom_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let overrides = args.run.overrides(RunMode::Hybrid);
    execute_run(&args.run, RunMode::Hybrid, overrides, custom_config, output).await
}
