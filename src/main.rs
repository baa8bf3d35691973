mod cli;
mod config;
mod error;
mod orchestrator;
mod tfe;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tfc_destroy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Cli::parse();
    match cli::run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Single exit point for every fatal error; the orchestration
            // layers only propagate.
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    }
}
