//! Client-side handle for one remote execution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

use alsvid_api::{JobId, JobStatus, ProgramId, RuntimeClient, SessionId};

use crate::error::{ClientError, ClientResult};

/// Payload conversion for terminal error statuses: the backend reports
/// errors through the same result query as successes.
fn payload_to_string(payload: Option<Value>) -> String {
    match payload {
        None => String::new(),
        Some(Value::String(s)) => s,
        Some(value) => value.to_string(),
    }
}

/// A handle to one remote execution: identity, status reads and blocking
/// result retrieval.
///
/// The handle discovers progress purely through repeated status reads — the
/// service never pushes. [`result`](RuntimeJob::result) is the blocking
/// sleep-poll loop; [`status`](RuntimeJob::status) is a single non-blocking
/// read.
pub struct RuntimeJob {
    client: Arc<dyn RuntimeClient>,
    job_id: JobId,
    program_id: ProgramId,
    session_id: SessionId,
    cached_result: Option<Value>,
}

impl RuntimeJob {
    /// Default interval between status polls.
    pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

    /// Create a handle for an already-submitted job.
    pub fn new(
        client: Arc<dyn RuntimeClient>,
        job_id: JobId,
        program_id: ProgramId,
        session_id: SessionId,
    ) -> Self {
        Self {
            client,
            job_id,
            program_id,
            session_id,
            cached_result: None,
        }
    }

    /// The job id.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// The program this job runs.
    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    /// The session this job belongs to.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Read the job's current status. A single non-blocking poll.
    pub async fn status(&self) -> ClientResult<JobStatus> {
        Ok(self.client.job_status(&self.job_id).await?)
    }

    /// Block until the job is terminal and return its payload.
    ///
    /// Polls every `wait` until the status is terminal or `timeout` elapses.
    /// The timeout is advisory to the client only — it stops the wait loop
    /// without cancelling any server-side work.
    ///
    /// # Errors
    ///
    /// - [`ClientError::JobTimeout`] with the last observed status when
    ///   `timeout` elapses first.
    /// - [`ClientError::JobFailed`] / [`ClientError::JobCancelledRanTooLong`]
    ///   carrying the backend error payload verbatim.
    /// - [`ClientError::JobCancelled`] when the job was cancelled.
    #[instrument(skip(self), fields(job_id = %self.job_id))]
    pub async fn result(
        &mut self,
        timeout: Option<Duration>,
        wait: Duration,
    ) -> ClientResult<Value> {
        if let Some(result) = &self.cached_result {
            return Ok(result.clone());
        }

        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let status = self.client.job_status(&self.job_id).await?;

            match status {
                JobStatus::Completed => {
                    let payload =
                        self.client.job_result(&self.job_id).await?.ok_or_else(|| {
                            ClientError::Decode(format!(
                                "job {} completed without a payload",
                                self.job_id
                            ))
                        })?;
                    self.cached_result = Some(payload.clone());
                    return Ok(payload);
                }
                JobStatus::Failed => {
                    let payload = self.client.job_result(&self.job_id).await?;
                    return Err(ClientError::JobFailed(payload_to_string(payload)));
                }
                JobStatus::CancelledRanTooLong => {
                    let payload = self.client.job_result(&self.job_id).await?;
                    return Err(ClientError::JobCancelledRanTooLong(payload_to_string(
                        payload,
                    )));
                }
                JobStatus::Cancelled => return Err(ClientError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    let pause = match deadline {
                        Some(deadline) => {
                            let remaining = deadline.saturating_duration_since(Instant::now());
                            if remaining.is_zero() {
                                debug!(job_id = %self.job_id, last_status = %status,
                                       "wait loop timed out");
                                return Err(ClientError::JobTimeout {
                                    job_id: self.job_id.clone(),
                                    last_status: status,
                                });
                            }
                            wait.min(remaining)
                        }
                        None => wait,
                    };
                    sleep(pause).await;
                }
            }
        }
    }

    /// Request cancellation.
    ///
    /// A no-op when the job is already terminal: the backend gave a final
    /// answer, so there is nothing left to cancel.
    pub async fn cancel(&self) -> ClientResult<()> {
        let status = self.client.job_status(&self.job_id).await?;
        if status.is_terminal() {
            debug!(job_id = %self.job_id, status = %status,
                   "cancel requested on terminal job, ignoring");
            return Ok(());
        }
        Ok(self.client.job_cancel(&self.job_id).await?)
    }
}

impl std::fmt::Debug for RuntimeJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeJob")
            .field("job_id", &self.job_id)
            .field("program_id", &self.program_id)
            .field("session_id", &self.session_id)
            .field("cached", &self.cached_result.is_some())
            .finish()
    }
}
