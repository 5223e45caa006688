//! In-process fake runtime service.
//!
//! [`FakeRuntime`] implements [`alsvid_api::RuntimeClient`] entirely in
//! memory: a program registry, a job registry, and an autonomous
//! status-progression task per job. It is a drop-in substitute for the real
//! transport beneath the job/session core, used to validate client behavior
//! against deterministic or timed progressions.
//!
//! Per-job behavior is scripted through [`JobProfile`]s queued with
//! [`FakeRuntime::push_profile`] and consumed FIFO on submission.

pub mod profile;
pub mod runtime;

pub use profile::JobProfile;
pub use runtime::FakeRuntime;
