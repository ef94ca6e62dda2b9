mod cmd;
mod config;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use clap::{Args, Parser, Subcommand};

use crate::cmd::config as config_cmd;
use crate::cmd::run::{self as run_cmd, RunCommandArgs};
use crate::config::Settings;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "rm-closer",
    author,
    version,
    about = "Closes Redmine issues referenced by closed GitHub pull requests"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the repository events and close referenced issues (default).
    Run(RunArgs),
    /// Show the configuration resolved from the environment (secrets masked).
    Config,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Stop after a single poll cycle.
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Some(Commands::Config) => config_cmd::run(&settings),
        Some(Commands::Run(args)) => run_bridge(&settings, args).await,
        None => run_bridge(&settings, RunArgs::default()).await,
    }
}

async fn run_bridge(settings: &Settings, args: RunArgs) -> AppResult<()> {
    logging::init(&settings.log_level)?;
    settings.log_resolved();

    run_cmd::run(settings, RunCommandArgs { once: args.once }).await
}
