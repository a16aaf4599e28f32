//! Error masking middleware.
//!
//! Replaces failure details that should not leave the server with a
//! generic message. Failures whose code is explicitly exposed pass through
//! untouched, as do all successes.

use crate::middleware::{Middleware, Next};
use sextant_config::MaskingConfig;
use sextant_core::{codes, ActionResult, BoxFuture};
use std::collections::HashSet;

/// Message substituted for masked failures.
pub const DEFAULT_MESSAGE: &str = "An internal error occurred";

/// Middleware that masks unexposed failures.
///
/// # Example
///
/// ```rust,ignore
/// let masking = MaskErrorsMiddleware::new()
///     .expose_code("UNAUTHORIZED")
///     .expose_code("VALIDATION_ERROR");
/// ```
#[derive(Debug, Clone)]
pub struct MaskErrorsMiddleware {
    enabled: bool,
    message: String,
    code: String,
    exposed: HashSet<String>,
}

impl MaskErrorsMiddleware {
    /// Creates a masking middleware that exposes no codes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            message: DEFAULT_MESSAGE.to_string(),
            code: codes::INTERNAL_ERROR.to_string(),
            exposed: HashSet::new(),
        }
    }

    /// Creates a masking middleware from configuration.
    #[must_use]
    pub fn from_config(config: &MaskingConfig) -> Self {
        Self {
            enabled: config.enabled,
            message: config.message.clone(),
            code: config.code.clone(),
            exposed: config.exposed_codes.iter().cloned().collect(),
        }
    }

    /// Lets failures with `code` through unmasked.
    #[must_use]
    pub fn expose_code(mut self, code: impl Into<String>) -> Self {
        self.exposed.insert(code.into());
        self
    }

    /// Sets the replacement message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the replacement code.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Returns `true` if a failure with `code` is passed through.
    #[must_use]
    pub fn is_exposed(&self, code: Option<&str>) -> bool {
        !self.enabled || code.is_some_and(|code| self.exposed.contains(code))
    }
}

impl Default for MaskErrorsMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, T> Middleware<Args, T> for MaskErrorsMiddleware
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "mask_errors"
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            match next.run(args).await {
                ActionResult::Failure { message, code } if !self.is_exposed(code.as_deref()) => {
                    tracing::debug!(original_code = ?code, original_message = %message, "masking failure");
                    ActionResult::error_with_code(self.message.clone(), self.code.clone())
                }
                result => result,
            }
        })
    }
}
