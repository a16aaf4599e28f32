//! Action metrics.
//!
//! Recording goes through the `metrics` facade. Installing an exporter
//! (Prometheus, StatsD, ...) is left to the host application; without one
//! every call here is a no-op.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Duration;

/// Counter of action calls, labelled by `action` and `outcome`.
pub const ACTION_CALLS_TOTAL: &str = "sextant_action_calls_total";

/// Histogram of action latency in seconds, labelled by `action`.
pub const ACTION_DURATION_SECONDS: &str = "sextant_action_duration_seconds";

/// Gauge of calls currently in progress.
pub const ACTIONS_IN_FLIGHT: &str = "sextant_actions_in_flight";

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The call produced a success.
    Success,
    /// The call produced a failure.
    Failure,
}

impl Outcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Registers descriptions for every Sextant metric with the installed recorder.
///
/// Call once after installing an exporter.
pub fn describe_metrics() {
    describe_counter!(ACTION_CALLS_TOTAL, Unit::Count, "Total number of action calls");
    describe_histogram!(
        ACTION_DURATION_SECONDS,
        Unit::Seconds,
        "Action call duration in seconds"
    );
    describe_gauge!(ACTIONS_IN_FLIGHT, Unit::Count, "Action calls currently in progress");
}

/// Records a completed call.
///
/// # Arguments
///
/// * `action` - The action label
/// * `outcome` - Whether the call succeeded
/// * `duration` - Time spent in the call
pub fn record_action(action: &str, outcome: Outcome, duration: Duration) {
    counter!(
        ACTION_CALLS_TOTAL,
        "action" => action.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(ACTION_DURATION_SECONDS, "action" => action.to_string()).record(duration.as_secs_f64());
}

/// Increments the in-flight gauge.
pub fn increment_in_flight() {
    gauge!(ACTIONS_IN_FLIGHT).increment(1.0);
}

/// Decrements the in-flight gauge.
pub fn decrement_in_flight() {
    gauge!(ACTIONS_IN_FLIGHT).decrement(1.0);
}

/// Guard that decrements the in-flight gauge on drop, including on panic.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        increment_in_flight();
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        decrement_in_flight();
    }
}
