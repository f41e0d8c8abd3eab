use anyhow::Result;
use clap::Parser;

use hybrid_analyzer::cli::commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
