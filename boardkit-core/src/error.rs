/// Structured error types for boardkit-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The engine crate wraps these together with its storage errors;
/// library consumers get structured, composable errors either way.

use thiserror::Error;

/// Main error type for boardkit domain operations
#[derive(Error, Debug)]
pub enum BoardError {
    /// Caller-supplied data failed a policy or consistency check
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    /// An update or lookup targeted an id that does not exist
    #[error("Content item {id} not found")]
    NotFound { id: i64 },

    /// Upload batch violated a policy limit
    #[error("Upload rejected: {reason}")]
    UploadRejected { reason: String },
}

/// Result type alias for boardkit-core operations
pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Create an upload rejection error
    pub fn upload_rejected(reason: impl Into<String>) -> Self {
        Self::UploadRejected {
            reason: reason.into(),
        }
    }

    /// True for errors caused by caller input rather than the engine
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UploadRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::validation("end date precedes start date");
        assert_eq!(
            err.to_string(),
            "Validation failed: end date precedes start date"
        );

        let err = BoardError::not_found(42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_is_validation() {
        assert!(BoardError::validation("x").is_validation());
        assert!(BoardError::upload_rejected("x").is_validation());
        assert!(!BoardError::not_found(1).is_validation());
    }
}
