//! Job status as reported by the runtime service.
//!
//! The job state machine:
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                             │
//!                             ├──→ Failed
//!                             │
//!                             ├──→ CancelledRanTooLong
//!                             │
//!                   cancel() ─┴──→ Cancelled
//! ```
//!
//! **Invariants:**
//! - Submission always yields `Queued`.
//! - Transitions are monotonic — a job never moves backward.
//! - Terminal states are permanent.
//! - A result payload exists only once the status is terminal.

use serde::{Deserialize, Serialize};

/// Status of a job, mirroring the six wire-level status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    #[serde(rename = "QUEUED")]
    Queued,
    /// Job is currently running.
    #[serde(rename = "RUNNING")]
    Running,
    /// Job completed successfully.
    #[serde(rename = "COMPLETED")]
    Completed,
    /// Job failed; the error payload is available via the result query.
    #[serde(rename = "FAILED")]
    Failed,
    /// Job was cancelled on request.
    #[serde(rename = "CANCELLED")]
    Cancelled,
    /// Job was cancelled by the server for exceeding its time budget.
    #[serde(rename = "CANCELLED - RAN TOO LONG")]
    CancelledRanTooLong,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    /// Check if the job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    /// The wire-level status string.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::CancelledRanTooLong => "CANCELLED - RAN TOO LONG",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}
