//! Timing and metrics middleware.
//!
//! # Metrics Emitted
//!
//! - `sextant_action_calls_total` - Counter of calls by action and outcome
//! - `sextant_action_duration_seconds` - Histogram of call latency
//! - `sextant_actions_in_flight` - Gauge of calls currently running
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder the calls are no-ops.

use crate::middleware::{Middleware, Next};
use sextant_core::{ActionResult, BoxFuture};
use sextant_telemetry::metrics::{record_action, InFlightGuard, Outcome};
use std::time::Instant;

/// Middleware that times each call and records metrics for it.
#[derive(Debug, Clone)]
pub struct TelemetryMiddleware {
    action: String,
}

impl TelemetryMiddleware {
    /// Creates a telemetry middleware labelling metrics with `action`.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    /// Returns the action label.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl<Args, T> Middleware<Args, T> for TelemetryMiddleware
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            let _in_flight = InFlightGuard::new();
            let start = Instant::now();

            let result = next.run(args).await;

            let elapsed = start.elapsed();
            let outcome = if result.is_success() {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            record_action(&self.action, outcome, elapsed);

            tracing::debug!(
                action = %self.action,
                outcome = outcome.as_str(),
                code = result.code().unwrap_or(""),
                duration_ms = elapsed.as_secs_f64() * 1000.0,
                "action finished"
            );

            result
        })
    }
}
