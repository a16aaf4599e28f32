//! Call/outcome logging middleware.
//!
//! [`LoggingMiddleware`] observes each invocation through an
//! [`ActionLogger`] and never alters the result. The arguments are cloned
//! before the call so they can be handed to the post-call hooks.

use crate::middleware::{Middleware, Next};
use sextant_core::{ActionResult, BoxFuture};
use std::fmt::Debug;
use std::sync::Arc;

/// Receives notifications about an invocation.
///
/// Every hook defaults to a no-op.
pub trait ActionLogger<Args, T>: Send + Sync + 'static {
    /// Called before the rest of the chain runs.
    fn on_call(&self, _args: &Args) {}

    /// Called after a success.
    fn on_success(&self, _data: &T, _args: &Args) {}

    /// Called after a failure.
    fn on_error(&self, _message: &str, _code: Option<&str>, _args: &Args) {}
}

/// Middleware that reports each call to an [`ActionLogger`].
pub struct LoggingMiddleware<L> {
    logger: L,
}

impl<L> LoggingMiddleware<L> {
    /// Creates a logging middleware.
    pub const fn new(logger: L) -> Self {
        Self { logger }
    }
}

impl<L> std::fmt::Debug for LoggingMiddleware<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingMiddleware").finish_non_exhaustive()
    }
}

impl<Args, T, L> Middleware<Args, T> for LoggingMiddleware<L>
where
    L: ActionLogger<Args, T>,
    Args: Clone + Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "logging"
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            self.logger.on_call(&args);
            let result = next.run(args.clone()).await;
            match &result {
                ActionResult::Success { data } => self.logger.on_success(data, &args),
                ActionResult::Failure { message, code } => {
                    self.logger.on_error(message, code.as_deref(), &args);
                }
            }
            result
        })
    }
}

/// Creates a [`LoggingMiddleware`] for `logger`.
pub fn with_logging<L>(logger: L) -> LoggingMiddleware<L> {
    LoggingMiddleware::new(logger)
}

type CallHook<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type SuccessHook<Args, T> = Arc<dyn Fn(&T, &Args) + Send + Sync>;
type ErrorHook<Args> = Arc<dyn Fn(&str, Option<&str>, &Args) + Send + Sync>;

/// An [`ActionLogger`] assembled from closures.
///
/// # Example
///
/// ```rust,ignore
/// let logger = FnLogger::new()
///     .when_called(|order: &Order| println!("placing {}", order.id))
///     .when_failed(|message, code, _order| eprintln!("{message} ({code:?})"));
/// ```
pub struct FnLogger<Args, T> {
    on_call: Option<CallHook<Args>>,
    on_success: Option<SuccessHook<Args, T>>,
    on_error: Option<ErrorHook<Args>>,
}

impl<Args, T> FnLogger<Args, T> {
    /// Creates a logger with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_call: None,
            on_success: None,
            on_error: None,
        }
    }

    /// Sets the pre-call hook.
    #[must_use]
    pub fn when_called<F>(mut self, f: F) -> Self
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.on_call = Some(Arc::new(f));
        self
    }

    /// Sets the success hook.
    #[must_use]
    pub fn when_succeeded<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &Args) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Sets the failure hook.
    #[must_use]
    pub fn when_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&str>, &Args) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl<Args, T> Default for FnLogger<Args, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, T> Clone for FnLogger<Args, T> {
    fn clone(&self) -> Self {
        Self {
            on_call: self.on_call.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<Args: 'static, T: 'static> ActionLogger<Args, T> for FnLogger<Args, T> {
    fn on_call(&self, args: &Args) {
        if let Some(hook) = &self.on_call {
            hook(args);
        }
    }

    fn on_success(&self, data: &T, args: &Args) {
        if let Some(hook) = &self.on_success {
            hook(data, args);
        }
    }

    fn on_error(&self, message: &str, code: Option<&str>, args: &Args) {
        if let Some(hook) = &self.on_error {
            hook(message, code, args);
        }
    }
}

/// An [`ActionLogger`] that emits `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    action: &'static str,
}

impl TracingLogger {
    /// Creates a logger that tags events with `action`.
    #[must_use]
    pub const fn new(action: &'static str) -> Self {
        Self { action }
    }
}

impl<Args: Debug, T> ActionLogger<Args, T> for TracingLogger {
    fn on_call(&self, args: &Args) {
        tracing::debug!(action = self.action, args = ?args, "action called");
    }

    fn on_success(&self, _data: &T, _args: &Args) {
        tracing::info!(action = self.action, outcome = "success", "action completed");
    }

    fn on_error(&self, message: &str, code: Option<&str>, _args: &Args) {
        tracing::warn!(
            action = self.action,
            outcome = "failure",
            code = code.unwrap_or(""),
            error = message,
            "action failed"
        );
    }
}
