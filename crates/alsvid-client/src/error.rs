//! Error handling for the orchestration client.

use alsvid_api::{ApiError, JobId, JobStatus};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Operation attempted on a closed session.
    #[error("The session is closed")]
    SessionClosed,

    /// `read` called before any `write` produced a job.
    #[error("No job has been submitted on this session")]
    NoJob,

    /// Client-side wait exceeded; the job may still finish server-side.
    #[error("Timeout waiting for job {job_id} (last status: {last_status})")]
    JobTimeout {
        /// The job being waited on.
        job_id: JobId,
        /// The last status observed before giving up.
        last_status: JobStatus,
    },

    /// Job reached `FAILED`; carries the backend error payload verbatim.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job reached `CANCELLED`.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job was cancelled by the server for running too long.
    #[error("Job cancelled, ran too long: {0}")]
    JobCancelledRanTooLong(String),

    /// A result payload did not have the expected shape.
    #[error("Failed to decode result: {0}")]
    Decode(String),

    /// Error from the runtime service.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid option assignment.
    #[error(transparent)]
    Options(#[from] alsvid_options::OptionsError),
}
