//! Shared error types for the decision engine

use thiserror::Error;

/// Main error type for dermamap engine operations.
///
/// Every variant is a caller fault over the engine boundary; the engine
/// itself is a total function over validated input. The "inconsistent"
/// outcome is a first-class decision status, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A recognized context field failed its type or range check.
    /// The message names the offending field verbatim.
    #[error("{field} {problem}")]
    InvalidContext { field: String, problem: String },

    /// No image observations were supplied.
    #[error("at least one image observation is required")]
    NoObservations,
}

impl EngineError {
    /// Create a context validation error for a named field.
    pub fn invalid_context(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidContext {
            field: field.into(),
            problem: problem.into(),
        }
    }

    /// The offending context field, when this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidContext { field, .. } => Some(field),
            Self::NoObservations => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = EngineError::invalid_context("age", "must be an integer between 0 and 120");
        assert_eq!(err.to_string(), "age must be an integer between 0 and 120");
        assert_eq!(err.field(), Some("age"));
    }

    #[test]
    fn empty_input_error_has_no_field() {
        assert_eq!(EngineError::NoObservations.field(), None);
    }
}
