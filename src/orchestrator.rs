//! Sequential destroy flow: look up the workspace, start a destroy run,
//! poll until it applies, then delete the workspace. Every step is fatal on
//! error; the caller owns the process exit.

use crate::config::DestroyConfig;
use crate::error::DestroyError;
use crate::tfe::{ApiError, RunStatus, TfcClient};
use std::time::Duration;
use tracing::info;

/// Fixed-delay polling parameters. The iteration cap substitutes for a
/// wall-clock timeout.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

/// Source of run status observations, so the poll loop can be driven by a
/// scripted fake in tests.
pub(crate) trait RunStatusReader {
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ApiError>;
}

impl RunStatusReader for TfcClient {
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ApiError> {
        Ok(self.read_run(run_id).await?.attributes.status)
    }
}

pub async fn destroy_and_delete(
    client: &TfcClient,
    cfg: &DestroyConfig,
    message: &str,
    policy: &PollPolicy,
) -> Result<(), DestroyError> {
    let workspace = client
        .read_workspace(&cfg.organization, &cfg.workspace)
        .await?;
    info!(
        workspace_id = %workspace.id,
        "resolved workspace {}/{}", cfg.organization, workspace.attributes.name
    );

    let run = client.create_destroy_run(&workspace.id, message).await?;
    info!(run_id = %run.id, "destroy run created");

    poll_run(client, &run.id, policy).await?;

    // Deletion is reached only after an applied status was observed.
    info!("deleting workspace {}/{}", cfg.organization, cfg.workspace);
    client
        .delete_workspace(&cfg.organization, &cfg.workspace)
        .await?;
    Ok(())
}

/// Poll run status at a fixed interval until it is terminal. The logged
/// elapsed figure is interval times iteration count, which under-reports by
/// the accumulated request latency; kept to match the original behavior.
pub(crate) async fn poll_run(
    reader: &impl RunStatusReader,
    run_id: &str,
    policy: &PollPolicy,
) -> Result<(), DestroyError> {
    let mut iterations: u32 = 0;
    loop {
        let status = reader.run_status(run_id).await?;
        match status {
            RunStatus::Applied => {
                info!("destroy plan finished");
                return Ok(());
            }
            RunStatus::Errored => {
                return Err(DestroyError::RunFailed {
                    run_id: run_id.to_string(),
                    status,
                });
            }
            status => {
                info!(
                    %status,
                    "destroying ... ({}s)",
                    policy.interval.as_secs() * u64::from(iterations)
                );
            }
        }

        tokio::time::sleep(policy.interval).await;
        iterations += 1;
        if iterations > policy.max_polls {
            return Err(DestroyError::PollTimeout {
                run_id: run_id.to_string(),
                polls: iterations,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedReader {
        script: Mutex<VecDeque<Result<RunStatus, ApiError>>>,
        reads: AtomicU32,
    }

    impl ScriptedReader {
        fn new(script: Vec<Result<RunStatus, ApiError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                reads: AtomicU32::new(0),
            }
        }

        fn statuses(script: Vec<RunStatus>) -> Self {
            Self::new(script.into_iter().map(Ok).collect())
        }

        fn reads(&self) -> u32 {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl RunStatusReader for ScriptedReader {
        async fn run_status(&self, _run_id: &str) -> Result<RunStatus, ApiError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("poll loop read past the scripted statuses")
        }
    }

    fn policy(interval_secs: u64, max_polls: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(interval_secs),
            max_polls,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn applied_after_two_planning_reads_sleeps_twice() {
        let reader = ScriptedReader::statuses(vec![
            RunStatus::Planning,
            RunStatus::Planning,
            RunStatus::Applied,
        ]);
        let start = tokio::time::Instant::now();

        poll_run(&reader, "run-1", &policy(10, 360)).await.unwrap();

        assert_eq!(reader.reads(), 3);
        // Two sleeps of the fixed interval; the terminal read exits before
        // sleeping again.
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn errored_run_is_fatal_after_second_read() {
        let reader = ScriptedReader::statuses(vec![RunStatus::Planning, RunStatus::Errored]);

        let err = poll_run(&reader, "run-1", &policy(10, 360))
            .await
            .unwrap_err();

        assert_eq!(reader.reads(), 2);
        assert!(matches!(
            err,
            DestroyError::RunFailed {
                status: RunStatus::Errored,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn never_terminal_times_out_after_cap_plus_one_reads() {
        let reader = ScriptedReader::statuses(vec![RunStatus::Planning; 361]);

        let err = poll_run(&reader, "run-1", &policy(10, 360))
            .await
            .unwrap_err();

        assert_eq!(reader.reads(), 361);
        assert!(matches!(err, DestroyError::PollTimeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn read_failure_is_immediately_fatal() {
        let reader = ScriptedReader::new(vec![
            Ok(RunStatus::Planning),
            Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: "upstream unavailable".into(),
            }),
        ]);

        let err = poll_run(&reader, "run-1", &policy(10, 360))
            .await
            .unwrap_err();

        assert_eq!(reader.reads(), 2);
        assert!(matches!(err, DestroyError::Api(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_statuses_keep_polling() {
        let reader =
            ScriptedReader::statuses(vec![RunStatus::Unknown, RunStatus::Applying, RunStatus::Applied]);

        poll_run(&reader, "run-1", &policy(10, 360)).await.unwrap();

        assert_eq!(reader.reads(), 3);
    }
}
