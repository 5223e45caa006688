//! The fake runtime service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use alsvid_api::{
    ApiError, ApiResult, JobFilter, JobId, JobRecord, JobStatus, JobSubmission,
    JobSubmitResponse, Owner, ProgramFilter, ProgramId, ProgramRecord, ProgramUpdate,
    RuntimeClient, SessionId,
};

use crate::profile::JobProfile;

/// Status and payload of one simulated job, shared between the progression
/// task and the polling side. The poller only ever observes these fields;
/// there is no other channel between the two. A single mutex keeps the
/// terminal status and its payload atomic: a poller can never see a terminal
/// status without the payload, nor a payload while still pending.
struct JobState {
    inner: Mutex<JobInner>,
}

struct JobInner {
    status: JobStatus,
    result: Option<Value>,
    cancelled: bool,
}

impl JobState {
    fn new() -> Self {
        Self {
            inner: Mutex::new(JobInner {
                status: JobStatus::Queued,
                result: None,
                cancelled: false,
            }),
        }
    }

    fn status(&self) -> JobStatus {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).status
    }

    /// Advance the status unless a cancel already won the race.
    fn advance(&self, status: JobStatus) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !inner.cancelled {
            inner.status = status;
        }
    }

    /// Reach a terminal status together with its payload.
    fn finish(&self, status: JobStatus, payload: Value) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !inner.cancelled {
            inner.status = status;
            inner.result = Some(payload);
        }
    }

    fn result(&self) -> Option<Value> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .result
            .clone()
    }

    /// Cancel unless a terminal status already landed. The terminal check
    /// happens under the same lock as the transition, so a `finish()` racing
    /// in from the progression task can never be overwritten. Returns whether
    /// the job actually moved to `Cancelled`.
    fn cancel(&self) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.status.is_terminal() {
            return false;
        }
        inner.cancelled = true;
        inner.status = JobStatus::Cancelled;
        true
    }
}

struct FakeJob {
    program_id: ProgramId,
    session_id: SessionId,
    backend_name: Option<String>,
    owner: Owner,
    created_at: DateTime<Utc>,
    state: Arc<JobState>,
    progression: JoinHandle<()>,
}

impl FakeJob {
    fn record(&self, id: &JobId) -> JobRecord {
        JobRecord {
            id: id.clone(),
            program_id: self.program_id.clone(),
            session_id: self.session_id.clone(),
            status: self.state.status(),
            backend_name: self.backend_name.clone(),
            owner: self.owner.clone(),
            created_at: self.created_at,
        }
    }
}

/// Drive a job's status on its own task, independent of any poller.
fn spawn_progression(
    state: Arc<JobState>,
    profile: JobProfile,
    step: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match profile {
            JobProfile::Normal => {
                run_script(&state, step, JobStatus::Completed, json!("foo")).await;
            }
            JobProfile::CustomResult(payload) => {
                run_script(&state, step, JobStatus::Completed, payload).await;
            }
            JobProfile::Failing => {
                run_script(&state, step, JobStatus::Failed, json!("Kaboom!")).await;
            }
            JobProfile::RanTooLong => {
                run_script(&state, step, JobStatus::CancelledRanTooLong, json!("Kaboom!"))
                    .await;
            }
            JobProfile::Cancelable => {
                sleep(step).await;
                state.advance(JobStatus::Queued);
                sleep(step).await;
                state.advance(JobStatus::Running);
                // Never terminal; only an explicit cancel ends this job.
            }
            JobProfile::Timed(run_time) => {
                state.advance(JobStatus::Running);
                sleep(run_time).await;
                state.finish(JobStatus::Completed, json!("foo"));
            }
        }
    })
}

async fn run_script(state: &JobState, step: Duration, terminal: JobStatus, payload: Value) {
    sleep(step).await;
    state.advance(JobStatus::Queued);
    sleep(step).await;
    state.advance(JobStatus::Running);
    sleep(step).await;
    state.finish(terminal, payload);
}

/// An in-process runtime service for testing the client core.
///
/// Jobs progress autonomously on a background task per job, so a client
/// under test discovers state purely through polling — never through
/// synchronization with the progression — mirroring real network latency.
/// Progression pace is controlled by `step` (default 25 ms).
pub struct FakeRuntime {
    programs: Mutex<FxHashMap<ProgramId, ProgramRecord>>,
    jobs: Mutex<FxHashMap<JobId, FakeJob>>,
    profiles: Mutex<VecDeque<JobProfile>>,
    owner: Owner,
    step: Duration,
}

impl FakeRuntime {
    /// Default delay between scripted status transitions.
    pub const DEFAULT_STEP: Duration = Duration::from_millis(25);

    /// Create a fake runtime with the default step and owner.
    pub fn new() -> Self {
        Self {
            programs: Mutex::new(FxHashMap::default()),
            jobs: Mutex::new(FxHashMap::default()),
            profiles: Mutex::new(VecDeque::new()),
            owner: Owner::new("test-hub", "test-group", "test-project"),
            step: Self::DEFAULT_STEP,
        }
    }

    /// Override the delay between status transitions.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Override the ownership triple assigned to submitted jobs.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    /// Queue a progression profile for the next submitted job.
    ///
    /// Profiles are consumed FIFO; submissions beyond the queued ones get
    /// [`JobProfile::Normal`].
    pub fn push_profile(&self, profile: JobProfile) {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(profile);
    }

    fn next_profile(&self) -> JobProfile {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(JobProfile::Normal)
    }
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn program_create(&self, program: ProgramRecord) -> ApiResult<ProgramId> {
        let mut programs = self
            .programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if programs.contains_key(&program.id) {
            return Err(ApiError::Conflict(format!(
                "program already exists: {}",
                program.id
            )));
        }
        let id = program.id.clone();
        programs.insert(id.clone(), program);
        Ok(id)
    }

    async fn program_get(&self, program_id: &ProgramId) -> ApiResult<ProgramRecord> {
        self.programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(program_id)
            .cloned()
            .ok_or_else(|| ApiError::program_not_found(program_id.as_str()))
    }

    async fn program_update(
        &self,
        program_id: &ProgramId,
        update: ProgramUpdate,
    ) -> ApiResult<()> {
        let mut programs = self
            .programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let program = programs
            .get_mut(program_id)
            .ok_or_else(|| ApiError::program_not_found(program_id.as_str()))?;
        program.apply(update);
        Ok(())
    }

    async fn program_delete(&self, program_id: &ProgramId) -> ApiResult<()> {
        let mut programs = self
            .programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        programs
            .remove(program_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::program_not_found(program_id.as_str()))
    }

    async fn program_list(&self, filter: ProgramFilter) -> ApiResult<Vec<ProgramRecord>> {
        let programs = self
            .programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut matched: Vec<_> = programs
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let out = matched
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(out)
    }

    async fn job_submit(&self, submission: JobSubmission) -> ApiResult<JobSubmitResponse> {
        let job_id = JobId::new(Uuid::new_v4().simple().to_string());
        let session_id = submission
            .session_id
            .unwrap_or_else(|| SessionId::from(job_id.clone()));
        let profile = self.next_profile();
        debug!(job_id = %job_id, session_id = %session_id, profile = ?profile,
               "fake job submitted");

        let state = Arc::new(JobState::new());
        let progression = spawn_progression(Arc::clone(&state), profile, self.step);

        let job = FakeJob {
            program_id: submission.program_id,
            session_id,
            backend_name: submission.backend_name,
            owner: self.owner.clone(),
            created_at: Utc::now(),
            state,
            progression,
        };
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.clone(), job);
        Ok(JobSubmitResponse { job_id })
    }

    async fn job_get(&self, job_id: &JobId) -> ApiResult<JobRecord> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(job_id)
            .map(|job| job.record(job_id))
            .ok_or_else(|| ApiError::job_not_found(job_id.as_str()))
    }

    async fn job_list(&self, filter: JobFilter) -> ApiResult<Vec<JobRecord>> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut matched: Vec<_> = jobs
            .iter()
            .map(|(id, job)| job.record(id))
            .filter(|record| filter.matches(record))
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let out = matched
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(out)
    }

    async fn job_status(&self, job_id: &JobId) -> ApiResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(job_id)
            .map(|job| job.state.status())
            .ok_or_else(|| ApiError::job_not_found(job_id.as_str()))
    }

    async fn job_result(&self, job_id: &JobId) -> ApiResult<Option<Value>> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(job_id)
            .map(|job| job.state.result())
            .ok_or_else(|| ApiError::job_not_found(job_id.as_str()))
    }

    async fn job_cancel(&self, job_id: &JobId) -> ApiResult<()> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let job = jobs
            .get(job_id)
            .ok_or_else(|| ApiError::job_not_found(job_id.as_str()))?;
        // No-op when the progression already gave a final answer.
        if job.state.cancel() {
            debug!(job_id = %job_id, "cancelling fake job");
            job.progression.abort();
        }
        Ok(())
    }

    async fn job_delete(&self, job_id: &JobId) -> ApiResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let job = jobs
            .remove(job_id)
            .ok_or_else(|| ApiError::job_not_found(job_id.as_str()))?;
        job.progression.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(program: &str) -> JobSubmission {
        JobSubmission::new(program).with_backend("fake_lagos")
    }

    #[tokio::test]
    async fn test_program_registry_conflict_and_not_found() {
        let runtime = FakeRuntime::new();
        let program = ProgramRecord::new("prog-1", "sampler", "data", 600, "Samples");

        runtime.program_create(program.clone()).await.unwrap();
        assert!(matches!(
            runtime.program_create(program).await,
            Err(ApiError::Conflict(_))
        ));

        assert!(matches!(
            runtime.program_get(&ProgramId::new("missing")).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(
            runtime.program_delete(&ProgramId::new("missing")).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_program_update_patches_fields() {
        let runtime = FakeRuntime::new();
        let program = ProgramRecord::new("prog-1", "sampler", "data", 600, "Samples");
        runtime.program_create(program).await.unwrap();

        runtime
            .program_update(
                &ProgramId::new("prog-1"),
                ProgramUpdate::default().cost(900),
            )
            .await
            .unwrap();

        let fetched = runtime.program_get(&ProgramId::new("prog-1")).await.unwrap();
        assert_eq!(fetched.cost, 900);
        assert_eq!(fetched.name, "sampler");
    }

    #[tokio::test]
    async fn test_program_list_search_and_pagination() {
        let runtime = FakeRuntime::new();
        for i in 0..4 {
            let program = ProgramRecord::new(
                format!("prog-{i}"),
                format!("sampler-{i}"),
                "data",
                600,
                "Samples circuits",
            );
            runtime.program_create(program).await.unwrap();
        }

        let all = runtime.program_list(ProgramFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);

        let page = runtime
            .program_list(ProgramFilter::default().with_limit(2).with_skip(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);

        let hits = runtime
            .program_list(ProgramFilter::default().search("sampler-2"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_starts_queued_without_result() {
        let runtime = FakeRuntime::new();
        let job_id = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;

        assert_eq!(runtime.job_status(&job_id).await.unwrap(), JobStatus::Queued);
        assert!(runtime.job_result(&job_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profiles_consumed_fifo() {
        let runtime = FakeRuntime::new().with_step(Duration::from_millis(1));
        runtime.push_profile(JobProfile::Failing);

        let first = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;
        let second = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;

        sleep(Duration::from_millis(50)).await;
        // First consumed the queued Failing profile, second fell back to Normal.
        assert_eq!(runtime.job_status(&first).await.unwrap(), JobStatus::Failed);
        assert_eq!(
            runtime.job_status(&second).await.unwrap(),
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_job_list_filters() {
        let runtime = FakeRuntime::new().with_step(Duration::from_millis(1));
        runtime.push_profile(JobProfile::Cancelable);

        let pending_id = runtime
            .job_submit(submission("prog-a"))
            .await
            .unwrap()
            .job_id;
        let done_id = runtime
            .job_submit(submission("prog-b"))
            .await
            .unwrap()
            .job_id;
        sleep(Duration::from_millis(50)).await;

        let pending = runtime.job_list(JobFilter::pending()).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, pending_id);

        let terminal = runtime.job_list(JobFilter::terminal()).await.unwrap();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].id, done_id);

        let by_program = runtime
            .job_list(JobFilter::default().with_program("prog-a"))
            .await
            .unwrap();
        assert_eq!(by_program.len(), 1);

        let by_owner = runtime
            .job_list(
                JobFilter::default().with_owner(Owner::new("other", "g", "p")),
            )
            .await
            .unwrap();
        assert!(by_owner.is_empty());
    }

    #[test]
    fn test_cancel_after_finish_keeps_terminal_status_and_payload() {
        // Orders the two transitions the way a lost race would: the
        // progression finishes between a poller's status read and its cancel.
        let state = JobState::new();
        state.advance(JobStatus::Running);
        state.finish(JobStatus::Completed, json!("foo"));

        assert!(!state.cancel());
        assert_eq!(state.status(), JobStatus::Completed);
        assert_eq!(state.result(), Some(json!("foo")));
    }

    #[tokio::test]
    async fn test_cancel_on_completed_job_is_a_noop() {
        let runtime = FakeRuntime::new().with_step(Duration::from_millis(1));
        let job_id = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;

        sleep(Duration::from_millis(50)).await;
        assert_eq!(
            runtime.job_status(&job_id).await.unwrap(),
            JobStatus::Completed
        );

        runtime.job_cancel(&job_id).await.unwrap();
        assert_eq!(
            runtime.job_status(&job_id).await.unwrap(),
            JobStatus::Completed
        );
        assert!(runtime.job_result(&job_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_job_delete_removes_record() {
        let runtime = FakeRuntime::new();
        let job_id = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;

        runtime.job_delete(&job_id).await.unwrap();
        assert!(matches!(
            runtime.job_status(&job_id).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(
            runtime.job_delete(&job_id).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_session_id_follows_submission() {
        let runtime = FakeRuntime::new();
        let first = runtime
            .job_submit(submission("prog-1"))
            .await
            .unwrap()
            .job_id;
        let first_record = runtime.job_get(&first).await.unwrap();
        assert_eq!(first_record.session_id.as_str(), first.as_str());

        let second = runtime
            .job_submit(
                submission("prog-1").with_session(first_record.session_id.clone()),
            )
            .await
            .unwrap()
            .job_id;
        let second_record = runtime.job_get(&second).await.unwrap();
        assert_eq!(second_record.session_id, first_record.session_id);
    }
}
