//! The result envelope.
//!
//! Every handler and middleware link produces an [`ActionResult`]. Failures
//! are ordinary values: they are returned, never raised, and flow back out
//! through every enclosing middleware unchanged unless one rewrites them.
//!
//! # Wire Shape
//!
//! ```json
//! { "ok": true, "data": { "id": 1 } }
//! { "ok": false, "message": "Unauthorized", "code": "UNAUTHORIZED" }
//! ```
//!
//! `code` is omitted when absent. Objects mixing the two shapes are rejected.

use crate::error::ActionError;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Uniform success/failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionResult<T> {
    /// The action completed and produced `data`.
    Success {
        /// The payload.
        data: T,
    },
    /// The action declined or failed.
    Failure {
        /// Human-readable description.
        message: String,
        /// Machine-readable code.
        code: Option<String>,
    },
}

impl<T> ActionResult<T> {
    /// Wraps `data` in a success.
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Creates a failure without a code.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a failure with a machine-readable code.
    pub fn error_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Returns `true` for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` for the failure variant.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the payload of a success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the message of a failure.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    /// Returns the code of a failure, if it has one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { code, .. } => code.as_deref(),
        }
    }

    /// Asserts success and returns the payload.
    ///
    /// A failure becomes [`ActionError::Failed`], whose description is the
    /// failure's message.
    pub fn into_data(self) -> Result<T, ActionError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { message, code } => Err(ActionError::Failed { message, code }),
        }
    }

    /// Returns the payload, or `default` for a failure.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Success { data } => data,
            Self::Failure { .. } => default,
        }
    }

    /// Returns the payload, or computes one from the failure's message and code.
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(&str, Option<&str>) -> T,
    {
        match self {
            Self::Success { data } => data,
            Self::Failure { message, code } => f(&message, code.as_deref()),
        }
    }

    /// Maps the payload of a success, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> ActionResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { data } => ActionResult::Success { data: f(data) },
            Self::Failure { message, code } => ActionResult::Failure { message, code },
        }
    }

    /// Rewrites the message of a failure. Successes and codes are untouched.
    #[must_use]
    pub fn map_failure_message<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            Self::Failure { message, code } => Self::Failure {
                message: f(message),
                code,
            },
            success => success,
        }
    }

    /// Converts into a standard `Result`. Same as [`into_data`](Self::into_data).
    pub fn into_std(self) -> Result<T, ActionError> {
        self.into_data()
    }
}

impl<T> From<ActionResult<T>> for Result<T, ActionError> {
    fn from(result: ActionResult<T>) -> Self {
        result.into_data()
    }
}

/// Wraps `data` in a success.
pub fn success<T>(data: T) -> ActionResult<T> {
    ActionResult::success(data)
}

/// Creates a failure without a code.
pub fn error<T>(message: impl Into<String>) -> ActionResult<T> {
    ActionResult::error(message)
}

/// Creates a failure with a machine-readable code.
pub fn error_with_code<T>(message: impl Into<String>, code: impl Into<String>) -> ActionResult<T> {
    ActionResult::error_with_code(message, code)
}

/// Returns `true` for the success variant.
pub const fn is_success<T>(result: &ActionResult<T>) -> bool {
    result.is_success()
}

/// Returns `true` for the failure variant.
pub const fn is_error<T>(result: &ActionResult<T>) -> bool {
    result.is_error()
}

/// Asserts success and returns the payload.
///
/// # Example
///
/// ```
/// use sextant_core::{error, success, unwrap, ActionResult};
///
/// assert_eq!(unwrap(success(3)).unwrap(), 3);
///
/// let failed: ActionResult<i32> = error("database unavailable");
/// assert_eq!(unwrap(failed).unwrap_err().to_string(), "database unavailable");
/// ```
pub fn unwrap<T>(result: ActionResult<T>) -> Result<T, ActionError> {
    result.into_data()
}

/// Returns the payload, or `default` for a failure.
pub fn unwrap_or<T>(result: ActionResult<T>, default: T) -> T {
    result.unwrap_or(default)
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data } => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure { message, code } => {
                let len = if code.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("ActionResult", len)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("message", message)?;
                match code {
                    Some(code) => state.serialize_field("code", code)?,
                    None => state.skip_field("code")?,
                }
                state.end()
            }
        }
    }
}

/// Flat view of the wire shape, checked before becoming an [`ActionResult`].
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
struct RawResult<T> {
    ok: bool,
    #[serde(default, deserialize_with = "present")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// A present `data` field is always `Some`, even when it holds `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawResult::<T>::deserialize(deserializer)? {
            RawResult {
                ok: true,
                data: Some(data),
                message: None,
                code: None,
            } => Ok(Self::Success { data }),
            RawResult {
                ok: true,
                data: None,
                ..
            } => Err(de::Error::missing_field("data")),
            RawResult { ok: true, .. } => Err(de::Error::custom(
                "a success result cannot carry `message` or `code`",
            )),
            RawResult {
                ok: false,
                data: Some(_),
                ..
            } => Err(de::Error::custom("a failure result cannot carry `data`")),
            RawResult {
                ok: false,
                message: Some(message),
                code,
                ..
            } => Ok(Self::Failure { message, code }),
            RawResult {
                ok: false,
                message: None,
                ..
            } => Err(de::Error::missing_field("message")),
        }
    }
}
