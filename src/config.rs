use crate::error::DestroyError;

pub const ENV_TOKEN: &str = "TERRAFORM_CLOUD_TOKEN";
pub const ENV_ORGANIZATION: &str = "TERRAFORM_CLOUD_ORGANIZATION";
pub const ENV_WORKSPACE: &str = "TERRAFORM_CLOUD_WORKSPACE";

/// Resolved invocation parameters. Built once at startup, read-only after.
#[derive(Debug, Clone)]
pub struct DestroyConfig {
    pub organization: String,
    pub workspace: String,
    pub token: String,
}

impl DestroyConfig {
    /// Resolve organization and workspace from flags with environment
    /// fallback; the token comes from the environment only.
    pub fn resolve(
        organization: Option<String>,
        workspace: Option<String>,
    ) -> Result<Self, DestroyError> {
        Self::resolve_from(organization, workspace, |name| std::env::var(name).ok())
    }

    /// Resolution against an injectable environment lookup so tests never
    /// mutate process-global state. An empty value counts as unset.
    fn resolve_from(
        organization: Option<String>,
        workspace: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DestroyError> {
        let organization = match organization.filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                tracing::info!(
                    "no organization name provided as input argument, falling back to {ENV_ORGANIZATION}"
                );
                env(ENV_ORGANIZATION)
                    .filter(|v| !v.is_empty())
                    .ok_or(DestroyError::MissingConfig {
                        what: "the organization name",
                        env_var: ENV_ORGANIZATION,
                    })?
            }
        };

        let workspace = match workspace.filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                tracing::info!(
                    "no workspace name provided as input argument, falling back to {ENV_WORKSPACE}"
                );
                env(ENV_WORKSPACE)
                    .filter(|v| !v.is_empty())
                    .ok_or(DestroyError::MissingConfig {
                        what: "a workspace name",
                        env_var: ENV_WORKSPACE,
                    })?
            }
        };

        let token = env(ENV_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or(DestroyError::MissingToken { env_var: ENV_TOKEN })?;

        Ok(Self {
            organization,
            workspace,
            token,
        })
    }
}
