use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use super::output::Output;

pub mod analyze;
pub mod config;
pub mod distributed;
pub mod params;
pub mod report;
pub mod version;

#[derive(Parser)]
#[command(
    name = "hybrid-analyzer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bulk text analysis with sequential, hybrid and distributed engines",
    long_about = "Analyzes every matching file in a folder three ways: a sequential baseline, \
                  a pipeline overlapping file reads with CPU analysis, and a coordinator \
                  scattering files across ranks. Reports aggregates and speedup."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the sequential baseline with the hybrid pipeline
    Analyze(analyze::AnalyzeArgs),
    /// Compare the sequential baseline with the rank coordinator
    Distributed(distributed::DistributedArgs),
    /// Show parameters derived from a numeric identifier
    Params(params::ParamsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.config.as_deref();

        match self.command {
            Some(Commands::Analyze(args)) => analyze::execute(args, config, &output).await,
            Some(Commands::Distributed(args)) => distributed::execute(args, config, &output).await,
            Some(Commands::Params(args)) => params::execute(args, &output).await,
            Some(Commands::Config(args)) => config::execute(args, config, &output).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout carries reports and `--format json` documents
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
