use crate::config::DestroyConfig;
use crate::orchestrator::{self, PollPolicy};
use crate::tfe::{ClientConfig, TfcClient};
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "tfc-destroy",
    version,
    about = "Destroy a Terraform Cloud workspace and delete it once the destroy run applies"
)]
pub struct Cli {
    /// Terraform Cloud organization name (falls back to TERRAFORM_CLOUD_ORGANIZATION)
    #[arg(long)]
    pub organization: Option<String>,

    /// Terraform Cloud workspace name (falls back to TERRAFORM_CLOUD_WORKSPACE)
    #[arg(long)]
    pub workspace: Option<String>,

    /// Base URL for the Terraform Cloud API
    #[arg(long, default_value = "https://app.terraform.io")]
    pub base_url: String,

    /// Message attached to the destroy run
    #[arg(long, default_value = "Automatically started via GitHub Actions")]
    pub message: String,

    /// Delay between run status checks
    #[arg(long, default_value = "10s")]
    pub poll_interval: humantime::Duration,

    /// Give up after this many status checks
    #[arg(long, default_value_t = 360)]
    pub max_polls: u32,

    /// Use --retry-server-errors true or --retry-server-errors false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub retry_server_errors: bool,
}

pub async fn run(args: Cli) -> Result<()> {
    // Configuration must be complete before anything touches the network.
    let cfg = DestroyConfig::resolve(args.organization.clone(), args.workspace.clone())?;

    let client = TfcClient::new(ClientConfig {
        base_url: args.base_url.clone(),
        token: cfg.token.clone(),
        retry_server_errors: args.retry_server_errors,
    })?;

    let policy = PollPolicy {
        interval: Duration::from(args.poll_interval),
        max_polls: args.max_polls,
    };

    orchestrator::destroy_and_delete(&client, &cfg, &args.message, &policy).await?;
    Ok(())
}
