//! Error types for the runtime service contract.

use thiserror::Error;

/// Errors returned by [`RuntimeClient`](crate::RuntimeClient) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("program" or "job").
        kind: &'static str,
        /// The unknown identifier.
        id: String,
    },

    /// An entity with the same id already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic backend-side error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ApiError {
    /// A not-found error for a program id.
    pub fn program_not_found(id: impl Into<String>) -> Self {
        ApiError::NotFound {
            kind: "program",
            id: id.into(),
        }
    }

    /// A not-found error for a job id.
    pub fn job_not_found(id: impl Into<String>) -> Self {
        ApiError::NotFound {
            kind: "job",
            id: id.into(),
        }
    }
}

/// Result type for runtime service operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::job_not_found("job-123");
        assert_eq!(err.to_string(), "job not found: job-123");

        let err = ApiError::Conflict("program already exists".to_string());
        assert_eq!(err.to_string(), "Conflict: program already exists");
    }
}
