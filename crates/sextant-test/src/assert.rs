//! Result assertions.

use sextant_core::ActionResult;
use std::fmt::Debug;

/// Asserts that `result` is a success and returns its payload.
///
/// # Panics
///
/// Panics with the failure's message and code if `result` is a failure.
#[track_caller]
pub fn assert_success<T: Debug>(result: ActionResult<T>) -> T {
    match result {
        ActionResult::Success { data } => data,
        ActionResult::Failure { message, code } => {
            panic!("expected success, got failure: message={message:?} code={code:?}")
        }
    }
}

/// Asserts that `result` is a failure with the given code and returns its
/// message.
///
/// Pass `None` to require a failure without a code.
///
/// # Panics
///
/// Panics if `result` is a success or carries a different code.
#[track_caller]
pub fn assert_failure<T: Debug>(result: ActionResult<T>, code: Option<&str>) -> String {
    match result {
        ActionResult::Success { data } => panic!("expected failure, got success: {data:?}"),
        ActionResult::Failure {
            message,
            code: actual,
        } => {
            assert_eq!(
                actual.as_deref(),
                code,
                "failure code mismatch (message: {message:?})"
            );
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_success_returns_data() {
        assert_eq!(assert_success(ActionResult::success(5)), 5);
    }

    #[test]
    #[should_panic(expected = "expected success")]
    fn test_assert_success_panics_on_failure() {
        assert_success(ActionResult::<()>::error("boom"));
    }

    #[test]
    fn test_assert_failure_returns_message() {
        let result = ActionResult::<()>::error_with_code("Unauthorized", "UNAUTHORIZED");
        assert_eq!(assert_failure(result, Some("UNAUTHORIZED")), "Unauthorized");
        assert_eq!(assert_failure(ActionResult::<()>::error("x"), None), "x");
    }

    #[test]
    #[should_panic(expected = "failure code mismatch")]
    fn test_assert_failure_checks_code() {
        assert_failure(ActionResult::<()>::error_with_code("m", "A"), Some("B"));
    }

    #[test]
    #[should_panic(expected = "expected failure")]
    fn test_assert_failure_panics_on_success() {
        assert_failure(ActionResult::success(1), None);
    }
}
