//! Daybreak command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use daybreak_core::Config;
use daybreak_notify::Notifier;

#[derive(Parser)]
#[command(name = "daybreak")]
#[command(about = "Compose and deliver the daily notification", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("daybreak aborted: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load_validated(&cli.config)?;
    let notifier = Notifier::new(config)?;

    let today = chrono::Local::now().date_naive();
    notifier.run(today).await?;

    Ok(())
}
