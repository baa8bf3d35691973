//! Minimal Terraform Cloud API client: workspace read/delete plus destroy
//! runs. Everything else the API offers is out of scope for this tool.

mod client;
mod types;

pub use client::{ApiError, ClientConfig, TfcClient};
pub use types::RunStatus;
