use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON:API envelope for single-resource responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Document<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub attributes: WorkspaceAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub attributes: RunAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunAttributes {
    pub status: RunStatus,
}

/// Run states reported by Terraform Cloud. Only `Applied` and `Errored` are
/// terminal for this tool; everything else keeps the poll loop going, so
/// unrecognized values map to `Unknown` rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Fetching,
    PlanQueued,
    Planning,
    Planned,
    CostEstimating,
    PolicyChecking,
    Confirmed,
    ApplyQueued,
    Applying,
    Applied,
    Discarded,
    Errored,
    Canceled,
    PlannedAndFinished,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "pending",
            RunStatus::Fetching => "fetching",
            RunStatus::PlanQueued => "plan_queued",
            RunStatus::Planning => "planning",
            RunStatus::Planned => "planned",
            RunStatus::CostEstimating => "cost_estimating",
            RunStatus::PolicyChecking => "policy_checking",
            RunStatus::Confirmed => "confirmed",
            RunStatus::ApplyQueued => "apply_queued",
            RunStatus::Applying => "applying",
            RunStatus::Applied => "applied",
            RunStatus::Discarded => "discarded",
            RunStatus::Errored => "errored",
            RunStatus::Canceled => "canceled",
            RunStatus::PlannedAndFinished => "planned_and_finished",
            RunStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Request body for `POST /api/v2/runs`.
#[derive(Debug, Serialize)]
pub(crate) struct RunCreateRequest {
    data: RunCreateData,
}

#[derive(Debug, Serialize)]
struct RunCreateData {
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: RunCreateAttributes,
    relationships: RunCreateRelationships,
}

#[derive(Debug, Serialize)]
struct RunCreateAttributes {
    message: String,
    #[serde(rename = "is-destroy")]
    is_destroy: bool,
    #[serde(rename = "auto-apply")]
    auto_apply: bool,
}

#[derive(Debug, Serialize)]
struct RunCreateRelationships {
    workspace: RelationshipRef,
}

#[derive(Debug, Serialize)]
struct RelationshipRef {
    data: ResourceRef,
}

#[derive(Debug, Serialize)]
struct ResourceRef {
    #[serde(rename = "type")]
    kind: &'static str,
    id: String,
}

impl RunCreateRequest {
    /// A destroy run with auto-apply, the only kind this tool creates.
    pub(crate) fn destroy(workspace_id: &str, message: &str) -> Self {
        Self {
            data: RunCreateData {
                kind: "runs",
                attributes: RunCreateAttributes {
                    message: message.to_string(),
                    is_destroy: true,
                    auto_apply: true,
                },
                relationships: RunCreateRelationships {
                    workspace: RelationshipRef {
                        data: ResourceRef {
                            kind: "workspaces",
                            id: workspace_id.to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// JSON:API error payload returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDocument {
    #[serde(default)]
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorObject {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ErrorObject {
    pub(crate) fn render(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{title}: {detail}"),
            (Some(title), None) => title.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "unspecified error".to_string(),
        }
    }
}
