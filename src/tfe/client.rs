use super::types::{Document, ErrorDocument, Run, RunCreateRequest, Workspace};
use reqwest::{header, Method, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const CONTENT_TYPE_JSON_API: &str = "application/vnd.api+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to Terraform Cloud failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Terraform Cloud returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub retry_server_errors: bool,
}

/// Authenticated HTTPS client for the handful of Terraform Cloud endpoints
/// the destroy flow needs.
pub struct TfcClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry_server_errors: bool,
}

impl TfcClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("tfc-destroy/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            token: cfg.token,
            retry_server_errors: cfg.retry_server_errors,
        })
    }

    pub async fn read_workspace(
        &self,
        organization: &str,
        workspace: &str,
    ) -> Result<Workspace, ApiError> {
        let path = format!("/api/v2/organizations/{organization}/workspaces/{workspace}");
        let resp = self.execute(|| self.request(Method::GET, &path)).await?;
        let doc: Document<Workspace> = resp.json().await?;
        Ok(doc.data)
    }

    pub async fn create_destroy_run(
        &self,
        workspace_id: &str,
        message: &str,
    ) -> Result<Run, ApiError> {
        let body = RunCreateRequest::destroy(workspace_id, message);
        let resp = self
            .execute(|| self.request(Method::POST, "/api/v2/runs").json(&body))
            .await?;
        let doc: Document<Run> = resp.json().await?;
        Ok(doc.data)
    }

    pub async fn read_run(&self, run_id: &str) -> Result<Run, ApiError> {
        let path = format!("/api/v2/runs/{run_id}");
        let resp = self.execute(|| self.request(Method::GET, &path)).await?;
        let doc: Document<Run> = resp.json().await?;
        Ok(doc.data)
    }

    pub async fn delete_workspace(
        &self,
        organization: &str,
        workspace: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/v2/organizations/{organization}/workspaces/{workspace}");
        self.execute(|| self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON_API)
    }

    /// Send a request, retrying rate-limit and server errors a bounded
    /// number of times when configured. Any other failure surfaces as-is.
    async fn execute(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            let resp = build().send().await?;
            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if self.retry_server_errors && retryable && attempt < MAX_RETRIES {
                attempt += 1;
                debug!(%status, attempt, "retrying request after server error");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                continue;
            }

            return Err(ApiError::Status {
                status,
                message: error_message(resp).await,
            });
        }
    }
}

/// Pull the human-readable messages out of a JSON:API error body, falling
/// back to a placeholder when the body is empty or not JSON.
async fn error_message(resp: reqwest::Response) -> String {
    match resp.json::<ErrorDocument>().await {
        Ok(doc) if !doc.errors.is_empty() => doc
            .errors
            .iter()
            .map(|e| e.render())
            .collect::<Vec<_>>()
            .join("; "),
        _ => "no error details in response".to_string(),
    }
}
