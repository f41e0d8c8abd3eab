use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::report::execute_run;
use crate::cli::args::RunArgs;
use crate::cli::output::Output;
use crate::config::RunMode;

#[derive(Args)]
pub struct DistributedArgs {
    /// Number of ranks, the coordinator included
    #[arg(long, short = 'n', value_name = "N")]
    pub ranks: Option<usize>,

    #[command(flatten)]
    pub run: RunArgs,
}

pub async fn execute(
    args: DistributedArgs,
    custom_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let mut overrides = args.run.overrides(RunMode::Distributed);
    overrides.distributed.ranks = args.ranks;
    execute_run(&args.run, RunMode::Distributed, overrides, custom_config, output).await
}
