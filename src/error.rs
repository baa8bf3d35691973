use crate::tfe::{ApiError, RunStatus};
use thiserror::Error;

/// Fatal error taxonomy for a destroy invocation. Every variant terminates
/// the process; nothing above the HTTP client retries.
#[derive(Debug, Error)]
pub enum DestroyError {
    #[error("{what} must be provided either as an input parameter or in the {env_var} environment variable")]
    MissingConfig {
        what: &'static str,
        env_var: &'static str,
    },

    #[error("{env_var} environment variable must be set with a valid token")]
    MissingToken { env_var: &'static str },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("could not destroy environment: run {run_id} reached status {status}, check Terraform Cloud for details")]
    RunFailed { run_id: String, status: RunStatus },

    #[error("destroy run {run_id} took more time than expected ({polls} status checks), please check status in Terraform Cloud")]
    PollTimeout { run_id: String, polls: u32 },
}
