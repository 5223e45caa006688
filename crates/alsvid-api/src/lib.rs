//! Alsvid runtime service contract.
//!
//! This crate defines the types and the client trait shared between the
//! orchestration layer and any runtime service implementation:
//!
//! - Identifier newtypes ([`ProgramId`], [`JobId`], [`SessionId`])
//! - The six-state [`JobStatus`] machine
//! - Wire types for submission and the program/job registries
//! - The [`RuntimeClient`] trait — the only seam the client core depends on
//!
//! Transport, authentication and persistence live behind implementations of
//! [`RuntimeClient`]; this crate carries no I/O of its own.

pub mod client;
pub mod error;
pub mod ids;
pub mod job;
pub mod program;
pub mod status;

pub use client::RuntimeClient;
pub use error::{ApiError, ApiResult};
pub use ids::{JobId, ProgramId, SessionId};
pub use job::{JobFilter, JobRecord, JobSubmission, JobSubmitResponse, Owner};
pub use program::{ProgramFilter, ProgramRecord, ProgramSpec, ProgramUpdate};
pub use status::JobStatus;
