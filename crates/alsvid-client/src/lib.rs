//! Alsvid orchestration client.
//!
//! This crate is the client core above the [`RuntimeClient`] service seam:
//!
//! - [`RuntimeJob`]: identity, status reads and the blocking sleep-poll
//!   result loop for one remote execution.
//! - [`Session`]: the write/read protocol grouping dependent submissions
//!   under one server-assigned session id.
//! - [`Estimator`] / [`Sampler`]: primitive front ends translating a domain
//!   request into session inputs and decoding raw payloads into typed
//!   results.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use alsvid_client::Sampler;
//! use serde_json::json;
//!
//! # async fn run(client: Arc<dyn alsvid_api::RuntimeClient>) -> Result<(), alsvid_client::ClientError> {
//! let sampler = Sampler::new(client).with_backend("fake_lagos");
//! let mut session = sampler.run(vec![json!("OPENQASM 3.0; ...")], None, false);
//! let result = session.execute(None).await?;
//! println!("{:?}", result.quasi_dists);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod primitives;
pub mod result;
pub mod session;

pub use error::{ClientError, ClientResult};
pub use job::RuntimeJob;
pub use primitives::{
    ESTIMATOR_PROGRAM_ID, Estimator, EstimatorSession, SAMPLER_PROGRAM_ID, Sampler,
    SamplerSession,
};
pub use result::{EstimatorResult, QuasiDistribution, SamplerResult};
pub use session::{Session, SessionInfo};

pub use alsvid_api::RuntimeClient;
