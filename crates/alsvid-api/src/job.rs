//! Job submission and registry wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{JobId, ProgramId, SessionId};
use crate::status::JobStatus;

/// Ownership triple under which jobs are submitted and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Hub name.
    pub hub: String,
    /// Group name.
    pub group: String,
    /// Project name.
    pub project: String,
}

impl Owner {
    /// Create an ownership triple.
    pub fn new(
        hub: impl Into<String>,
        group: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            hub: hub.into(),
            group: group.into(),
            project: project.into(),
        }
    }
}

/// A job submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Program to run.
    pub program_id: ProgramId,
    /// Session to extend; `None` starts a new session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Backend to run on, if the caller pinned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_name: Option<String>,
    /// Program inputs.
    pub inputs: Map<String, Value>,
    /// Resolved execution options.
    pub options: Map<String, Value>,
}

impl JobSubmission {
    /// Create a submission with empty inputs and options.
    pub fn new(program_id: impl Into<ProgramId>) -> Self {
        Self {
            program_id: program_id.into(),
            session_id: None,
            backend_name: None,
            inputs: Map::new(),
            options: Map::new(),
        }
    }

    /// Extend an existing session.
    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Pin a backend.
    pub fn with_backend(mut self, backend_name: impl Into<String>) -> Self {
        self.backend_name = Some(backend_name.into());
        self
    }

    /// Set the program inputs.
    pub fn with_inputs(mut self, inputs: Map<String, Value>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the resolved options.
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }
}

/// Response to a job submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmitResponse {
    /// The id assigned to the new job.
    pub job_id: JobId,
}

/// A job record as returned by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job identifier.
    pub id: JobId,
    /// Program the job runs.
    pub program_id: ProgramId,
    /// Session the job belongs to.
    pub session_id: SessionId,
    /// Current status.
    pub status: JobStatus,
    /// Backend the job was submitted to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_name: Option<String>,
    /// Ownership triple.
    pub owner: Owner,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filter for listing jobs.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// `Some(true)` keeps only pending jobs, `Some(false)` only terminal ones.
    pub pending: Option<bool>,
    /// Filter by program.
    pub program_id: Option<ProgramId>,
    /// Filter by ownership triple.
    pub owner: Option<Owner>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    pub skip: usize,
}

impl JobFilter {
    /// Create a filter for pending jobs.
    pub fn pending() -> Self {
        Self {
            pending: Some(true),
            ..Default::default()
        }
    }

    /// Create a filter for terminal jobs.
    pub fn terminal() -> Self {
        Self {
            pending: Some(false),
            ..Default::default()
        }
    }

    /// Filter by program.
    pub fn with_program(mut self, program_id: impl Into<ProgramId>) -> Self {
        self.program_id = Some(program_id.into());
        self
    }

    /// Filter by ownership triple.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Limit results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip leading results.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Check if a job record matches this filter.
    ///
    /// Pagination (`limit`/`skip`) is applied by the caller over the matched
    /// set, not here.
    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(pending) = self.pending {
            if job.status.is_pending() != pending {
                return false;
            }
        }

        if let Some(ref program_id) = self.program_id {
            if &job.program_id != program_id {
                return false;
            }
        }

        if let Some(ref owner) = self.owner {
            if &job.owner != owner {
                return false;
            }
        }

        true
    }
}
