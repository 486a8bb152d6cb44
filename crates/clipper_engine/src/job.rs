//! Submitting the full-auto job and polling it to a terminal state.

use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::sink::EventSink;
use crate::wire::{FullAutoRequest, JobState};
use crate::EngineEvent;

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Wait before every status request, including the first.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1500),
        }
    }
}

/// How a job run ended, from the engine's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRunOutcome {
    Rejected,
    SubmitFailed,
    Done,
    Failed,
    Cancelled,
}

/// Polls `job_id` until the server reports `done` or `error`, or `cancel`
/// fires. Each accepted report is forwarded to `sink`. Transport failures
/// and `success: false` replies are logged and polling continues.
pub async fn poll_until_terminal(
    client: &dyn ApiClient,
    job_id: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> JobRunOutcome {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return JobRunOutcome::Cancelled,
            _ = tokio::time::sleep(settings.interval) => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return JobRunOutcome::Cancelled,
            result = client.job_status(job_id) => result,
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                engine_warn!("Status poll for job {} failed: {}", job_id, err);
                continue;
            }
        };
        let detail = response.error.clone();
        let Some(report) = response.into_report(job_id) else {
            engine_warn!(
                "Status poll for job {} returned no status: {}",
                job_id,
                detail.as_deref().unwrap_or("no detail")
            );
            continue;
        };

        engine_debug!(
            "Job {} {:?} step {}/{}",
            job_id,
            report.state,
            report.step,
            report.total_steps
        );
        let state = report.state;
        sink.emit(EngineEvent::JobStatus(report));
        match state {
            JobState::Running => {}
            JobState::Done => return JobRunOutcome::Done,
            JobState::Error => return JobRunOutcome::Failed,
        }
    }
}

/// Submits `request` and, once accepted, polls the job. Cancellation is
/// honoured during submission as well as polling.
pub async fn run_job(
    client: &dyn ApiClient,
    request: &FullAutoRequest,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> JobRunOutcome {
    let submitted = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = client.start_job(request) => Some(result),
    };

    let outcome = match submitted {
        None => JobRunOutcome::Cancelled,
        Some(Err(err)) => {
            engine_warn!("Job submission failed: {}", err);
            sink.emit(EngineEvent::JobSubmitFailed(err));
            return JobRunOutcome::SubmitFailed;
        }
        Some(Ok(response)) => match (response.success, response.job_id) {
            (true, Some(job_id)) => {
                engine_info!("Job {} accepted", job_id);
                sink.emit(EngineEvent::JobAccepted {
                    job_id: job_id.clone(),
                });
                poll_until_terminal(client, &job_id, settings, cancel, sink).await
            }
            _ => {
                engine_warn!("Job submission rejected");
                sink.emit(EngineEvent::JobRejected {
                    output: response.output,
                });
                return JobRunOutcome::Rejected;
            }
        },
    };

    if outcome == JobRunOutcome::Cancelled {
        engine_info!("Job polling cancelled");
        sink.emit(EngineEvent::JobCancelled);
    }
    outcome
}

/// A running job task. Dropping the handle does not stop the task; call
/// [`JobHandle::cancel`].
pub struct JobHandle {
    cancel: CancellationToken,
    task: JoinHandle<JobRunOutcome>,
}

impl JobHandle {
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        client: Arc<dyn ApiClient>,
        request: FullAutoRequest,
        settings: PollSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = runtime.spawn(async move {
            run_job(
                client.as_ref(),
                &request,
                &settings,
                &token,
                sink.as_ref(),
            )
            .await
        });
        Self { cancel, task }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the task has returned. A cancelled task still counts as
    /// unfinished until it has emitted [`EngineEvent::JobCancelled`].
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// `None` if the task panicked.
    pub async fn join(self) -> Option<JobRunOutcome> {
        self.task.await.ok()
    }
}
