//! Typed results decoded from raw job payloads.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// A quasi-probability distribution over measurement outcomes.
pub type QuasiDistribution = FxHashMap<String, f64>;

/// Result of an expectation-value estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorResult {
    /// Estimated expectation values, one per circuit/observable pair.
    pub values: Vec<f64>,
    /// Variances of the estimates.
    pub variances: Vec<f64>,
}

impl EstimatorResult {
    /// Decode from a raw job payload.
    pub fn from_raw(raw: Value) -> ClientResult<Self> {
        serde_json::from_value(raw)
            .map_err(|e| ClientError::Decode(format!("estimator payload: {e}")))
    }
}

/// Result of a sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerResult {
    /// One quasi-distribution per sampled circuit.
    pub quasi_dists: Vec<QuasiDistribution>,
}

impl SamplerResult {
    /// Decode from a raw job payload.
    pub fn from_raw(raw: Value) -> ClientResult<Self> {
        serde_json::from_value(raw)
            .map_err(|e| ClientError::Decode(format!("sampler payload: {e}")))
    }
}
