//! Panic guard middleware.
//!
//! Chains do not catch panics on their own. Placing [`CatchPanicMiddleware`]
//! at the outermost position turns a panic anywhere downstream into an
//! ordinary failure, which is what a server boundary usually wants.

use crate::builder::Action;
use crate::compose::{apply_middleware, boxed};
use crate::middleware::{Middleware, Next};
use futures_util::FutureExt;
use sextant_core::{codes, ActionError, ActionFn, ActionResult, BoxFuture};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Message returned in place of a panic.
pub const DEFAULT_MESSAGE: &str = "An unexpected error occurred";

/// Middleware that converts downstream panics into failures.
#[derive(Debug, Clone)]
pub struct CatchPanicMiddleware {
    message: String,
    code: String,
}

impl CatchPanicMiddleware {
    /// Creates a panic guard with the default message and code.
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            code: codes::INTERNAL_ERROR.to_string(),
        }
    }

    /// Sets the message returned for a panic.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the code returned for a panic.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

impl Default for CatchPanicMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, T> Middleware<Args, T> for CatchPanicMiddleware
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "catch_panic"
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            match AssertUnwindSafe(next.run(args)).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    let error = ActionError::panicked(panic_message(payload.as_ref()));
                    tracing::error!(error = %error, "action panicked");
                    ActionResult::error_with_code(self.message.clone(), self.code.clone())
                }
            }
        })
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Wraps an action so a panic anywhere inside it becomes a failure.
///
/// # Example
///
/// ```
/// use sextant_core::{action_fn, codes, ActionResult};
/// use sextant_middleware::stages::server_action;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let flaky = server_action(action_fn(|n: u32| async move {
///     if n == 0 {
///         panic!("division by zero");
///     }
///     ActionResult::success(100 / n)
/// }));
///
/// assert_eq!(flaky.call(4).await, ActionResult::success(25));
/// assert_eq!(flaky.call(0).await.code(), Some(codes::INTERNAL_ERROR));
/// # });
/// ```
pub fn server_action<Args, T, A>(action: A) -> Action<Args, T>
where
    A: ActionFn<Args, T> + 'static,
    Args: Send + 'static,
    T: Send + 'static,
{
    apply_middleware(action, [boxed(CatchPanicMiddleware::new())])
}
