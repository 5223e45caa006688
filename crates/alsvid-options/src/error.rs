//! Error types for option validation.

use thiserror::Error;

/// Errors raised at option assignment time.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptionsError {
    /// A field value or cross-field constraint was violated.
    #[error("Invalid value for `{field}`: {constraint}")]
    InvalidOption {
        /// The offending field.
        field: String,
        /// The violated constraint.
        constraint: String,
    },
}

impl OptionsError {
    /// Build an invalid-option error.
    pub fn invalid(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        OptionsError::InvalidOption {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// Result type for option operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OptionsError::invalid("optimization_level", "valid range is 0-3");
        assert_eq!(
            err.to_string(),
            "Invalid value for `optimization_level`: valid range is 0-3"
        );
    }
}
