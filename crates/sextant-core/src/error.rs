//! Error types for Sextant.
//!
//! Declared failures travel as data inside [`ActionResult`]. [`ActionError`]
//! only appears when a caller asserts success on a failed result, or when a
//! panic guard turns a panic into a value.

use crate::codes;
use crate::result::ActionResult;
use thiserror::Error;

/// Standard error type for Sextant.
///
/// # Example
///
/// ```
/// use sextant_core::{error_with_code, ActionError, ActionResult};
///
/// let result: ActionResult<()> = error_with_code("Not found", "NOT_FOUND");
/// let err = result.into_data().unwrap_err();
///
/// assert_eq!(err.to_string(), "Not found");
/// assert_eq!(err.code(), Some("NOT_FOUND"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Success was asserted on a failure result.
    #[error("{message}")]
    Failed {
        /// The failure's human-readable message.
        message: String,
        /// The failure's machine-readable code, if any.
        code: Option<String>,
    },

    /// A handler or middleware panicked and the panic was caught.
    #[error("action panicked: {message}")]
    Panicked {
        /// The panic payload rendered as text.
        message: String,
    },
}

impl ActionError {
    /// Creates a failed-result error.
    pub fn failed(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Failed {
            message: message.into(),
            code,
        }
    }

    /// Creates a caught-panic error.
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }

    /// Returns the machine-readable code associated with this error.
    ///
    /// Caught panics always report [`codes::INTERNAL_ERROR`].
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Failed { code, .. } => code.as_deref(),
            Self::Panicked { .. } => Some(codes::INTERNAL_ERROR),
        }
    }

    /// Converts the error back into a failure envelope.
    #[must_use]
    pub fn into_result<T>(self) -> ActionResult<T> {
        match self {
            Self::Failed { message, code } => ActionResult::Failure { message, code },
            Self::Panicked { message } => {
                ActionResult::error_with_code(message, codes::INTERNAL_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_is_message() {
        let err = ActionError::failed("Unauthorized", Some("UNAUTHORIZED".to_string()));
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(err.code(), Some("UNAUTHORIZED"));
    }

    #[test]
    fn test_panicked_display() {
        let err = ActionError::panicked("boom");
        assert_eq!(err.to_string(), "action panicked: boom");
        assert_eq!(err.code(), Some("INTERNAL_ERROR"));
    }

    #[test]
    fn test_into_result_round_trips_failure() {
        let err = ActionError::failed("gone", None);
        let result: ActionResult<u8> = err.into_result();
        assert_eq!(result, ActionResult::error("gone"));
    }

    #[test]
    fn test_panicked_into_result_carries_internal_code() {
        let result: ActionResult<u8> = ActionError::panicked("boom").into_result();
        assert_eq!(result.code(), Some("INTERNAL_ERROR"));
        assert_eq!(result.message(), Some("boom"));
    }
}
