use anyhow::Result;
use clap::Args;

#[derive(Args, Default)]
pub struct VersionArgs {
    /// Also show build details
    #[arg(long)]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs) -> Result<()> {
    let git_sha = option_env!("GIT_SHA").unwrap_or("unknown");
    println!("{} {} ({})", crate::PKG_NAME, crate::VERSION, git_sha);

    if args.detailed {
        println!("  cpus available: {}", num_cpus::get());
        println!("  default io workers: {}", crate::pipeline::DEFAULT_IO_WORKERS);
        println!("  target: {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    }
    Ok(())
}
