//! Session protocol: dependent submissions under one server-side identifier.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use alsvid_api::{JobId, JobStatus, JobSubmission, ProgramId, RuntimeClient, SessionId};

use crate::error::{ClientError, ClientResult};
use crate::job::RuntimeJob;

/// Snapshot of a session's state, as returned by [`Session::info`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    /// The pinned backend name, or "unknown".
    pub backend: String,
    /// Id of the most recently submitted job, if any.
    pub job_id: Option<JobId>,
    /// Current status of that job, if any.
    pub job_status: Option<JobStatus>,
}

/// A sequence of dependent job submissions sharing one server-side context.
///
/// The write/read contract layers on [`RuntimeJob`]: `write` submits (or
/// extends) under the session id assigned by the first job, `read` blocks on
/// the stored job's result. Once [`close`](Session::close)d the session is
/// inert — any further `write` or `read` fails with
/// [`ClientError::SessionClosed`], while results already returned stay valid.
///
/// Methods take `&mut self`, so concurrent writes on one session are ruled
/// out by the borrow checker rather than by a runtime lock. Dropping the
/// session is closing it; the server-side context simply expires.
pub struct Session {
    client: Arc<dyn RuntimeClient>,
    program_id: ProgramId,
    backend_name: Option<String>,
    base_inputs: Map<String, Value>,
    options: Map<String, Value>,
    session_id: Option<SessionId>,
    job: Option<RuntimeJob>,
    active: bool,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl Session {
    /// Create a session for `program_id` with the given base inputs and
    /// resolved options.
    pub fn new(
        client: Arc<dyn RuntimeClient>,
        program_id: impl Into<ProgramId>,
        base_inputs: Map<String, Value>,
        options: Map<String, Value>,
    ) -> Self {
        Self {
            client,
            program_id: program_id.into(),
            backend_name: None,
            base_inputs,
            options,
            session_id: None,
            job: None,
            active: true,
            poll_interval: RuntimeJob::DEFAULT_WAIT,
            timeout: None,
        }
    }

    /// Pin a backend for all submissions of this session.
    pub fn with_backend(mut self, backend_name: impl Into<String>) -> Self {
        self.backend_name = Some(backend_name.into());
        self
    }

    /// Set the interval between status polls in [`read`](Session::read).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set a default client-side timeout for [`read`](Session::read).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether the session still accepts operations.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The server-assigned session id, once the first `write` completed.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The most recently submitted job, if any.
    pub fn current_job(&self) -> Option<&RuntimeJob> {
        self.job.as_ref()
    }

    fn ensure_active(&self) -> ClientResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(ClientError::SessionClosed)
        }
    }

    /// Write to the session: overlay `overrides` onto the base inputs and
    /// submit a job under the session's id.
    ///
    /// The first write lets the backend assign a fresh session id — the new
    /// job's id — which every subsequent write reuses.
    #[instrument(skip(self, overrides), fields(program_id = %self.program_id))]
    pub async fn write(&mut self, overrides: Map<String, Value>) -> ClientResult<()> {
        self.ensure_active()?;

        let mut inputs = self.base_inputs.clone();
        inputs.extend(overrides);

        let mut submission = JobSubmission::new(self.program_id.clone())
            .with_inputs(inputs)
            .with_options(self.options.clone());
        if let Some(session_id) = &self.session_id {
            submission = submission.with_session(session_id.clone());
        }
        if let Some(backend_name) = &self.backend_name {
            submission = submission.with_backend(backend_name.clone());
        }

        let response = self.client.job_submit(submission).await?;
        debug!(job_id = %response.job_id, program_id = %self.program_id,
               "submitted session job");

        let session_id = self
            .session_id
            .get_or_insert_with(|| SessionId::from(response.job_id.clone()))
            .clone();
        self.job = Some(RuntimeJob::new(
            Arc::clone(&self.client),
            response.job_id,
            self.program_id.clone(),
            session_id,
        ));
        Ok(())
    }

    /// Read from the session: block until the stored job is terminal and
    /// return its payload, using the session's configured timeout and poll
    /// interval.
    pub async fn read(&mut self) -> ClientResult<Value> {
        let timeout = self.timeout;
        let wait = self.poll_interval;
        self.read_with(timeout, wait).await
    }

    /// [`read`](Session::read) with explicit timeout and poll interval.
    pub async fn read_with(
        &mut self,
        timeout: Option<Duration>,
        wait: Duration,
    ) -> ClientResult<Value> {
        self.ensure_active()?;
        let job = self.job.as_mut().ok_or(ClientError::NoJob)?;
        job.result(timeout, wait).await
    }

    /// Return a snapshot of the session without mutating it.
    pub async fn info(&self) -> ClientResult<SessionInfo> {
        let backend = self
            .backend_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let (job_id, job_status) = match &self.job {
            None => (None, None),
            Some(job) => (Some(job.job_id().clone()), Some(job.status().await?)),
        };
        Ok(SessionInfo {
            backend,
            job_id,
            job_status,
        })
    }

    /// Close the session. Already-returned results remain valid; any later
    /// `write` or `read` fails with [`ClientError::SessionClosed`].
    pub fn close(&mut self) {
        self.active = false;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("program_id", &self.program_id)
            .field("backend_name", &self.backend_name)
            .field("session_id", &self.session_id)
            .field("active", &self.active)
            .finish()
    }
}
