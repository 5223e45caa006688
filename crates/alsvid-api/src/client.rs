//! The runtime service contract.
//!
//! [`RuntimeClient`] is the seam between the orchestration layer and the
//! remote service. Everything above it (jobs, sessions, primitives) is
//! transport-agnostic; an implementation may speak HTTP to a real deployment
//! or run entirely in process, as the fake runtime does for tests.
//!
//! ## Method table
//!
//! | Method | Keyed by | Returns |
//! |--------|----------|---------|
//! | `program_create` | — | `ProgramId` (conflict on duplicates) |
//! | `program_get` | `ProgramId` | `ProgramRecord` |
//! | `program_update` | `ProgramId` | `()` |
//! | `program_delete` | `ProgramId` | `()` |
//! | `program_list` | `ProgramFilter` | `Vec<ProgramRecord>` |
//! | `job_submit` | — | `JobSubmitResponse` |
//! | `job_get` | `JobId` | `JobRecord` |
//! | `job_list` | `JobFilter` | `Vec<JobRecord>` |
//! | `job_status` | `JobId` | `JobStatus` |
//! | `job_result` | `JobId` | `Option<Value>` (`None` while pending) |
//! | `job_cancel` | `JobId` | `()` |
//! | `job_delete` | `JobId` | `()` |

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiResult;
use crate::ids::{JobId, ProgramId};
use crate::job::{JobFilter, JobRecord, JobSubmission, JobSubmitResponse};
use crate::program::{ProgramFilter, ProgramRecord, ProgramUpdate};
use crate::status::JobStatus;

/// Client interface to the runtime service.
///
/// # Contract
///
/// - `program_create` MUST fail with `Conflict` when the id is taken.
/// - Operations on unknown ids MUST fail with `NotFound`.
/// - `job_submit` MUST create the job in `Queued` status. When the
///   submission carries no session id, the new job's id becomes the session
///   id for subsequent submissions.
/// - `job_status` is a single non-blocking read; clients discover progress
///   purely through repeated status reads.
/// - `job_result` returns `None` while the job is pending and the final
///   payload (result or error, verbatim) once terminal.
/// - `job_cancel` on an already-terminal job is a no-op, not an error.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Register a new program.
    async fn program_create(&self, program: ProgramRecord) -> ApiResult<ProgramId>;

    /// Fetch a program by id.
    async fn program_get(&self, program_id: &ProgramId) -> ApiResult<ProgramRecord>;

    /// Update a program's descriptive fields.
    async fn program_update(
        &self,
        program_id: &ProgramId,
        update: ProgramUpdate,
    ) -> ApiResult<()>;

    /// Delete a program.
    async fn program_delete(&self, program_id: &ProgramId) -> ApiResult<()>;

    /// List programs matching a filter.
    async fn program_list(&self, filter: ProgramFilter) -> ApiResult<Vec<ProgramRecord>>;

    /// Submit a job for execution.
    async fn job_submit(&self, submission: JobSubmission) -> ApiResult<JobSubmitResponse>;

    /// Fetch a job record by id.
    async fn job_get(&self, job_id: &JobId) -> ApiResult<JobRecord>;

    /// List jobs matching a filter.
    async fn job_list(&self, filter: JobFilter) -> ApiResult<Vec<JobRecord>>;

    /// Read a job's current status.
    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobStatus>;

    /// Fetch a job's final payload, or `None` while still pending.
    async fn job_result(&self, job_id: &JobId) -> ApiResult<Option<Value>>;

    /// Request cancellation of a job.
    async fn job_cancel(&self, job_id: &JobId) -> ApiResult<()>;

    /// Delete a job record.
    async fn job_delete(&self, job_id: &JobId) -> ApiResult<()>;
}
