//! Ordered call recording.

use parking_lot::Mutex;
use sextant_core::{ActionResult, BoxFuture};
use sextant_middleware::{Middleware, Next};
use std::sync::Arc;

/// A shared, ordered log of events.
///
/// Clones share the same log, so one recorder can be handed to several
/// middleware and a handler and inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl CallRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Creates a middleware that records into this recorder.
    #[must_use]
    pub fn middleware(&self, name: &'static str) -> RecordingMiddleware {
        RecordingMiddleware {
            name,
            recorder: self.clone(),
        }
    }
}

/// Middleware that records `enter:<name>` before and `exit:<name>` after
/// the rest of the chain.
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    name: &'static str,
    recorder: CallRecorder,
}

impl<Args, T> Middleware<Args, T> for RecordingMiddleware
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            self.recorder.record(format!("enter:{}", self.name));
            let result = next.run(args).await;
            self.recorder.record(format!("exit:{}", self.name));
            result
        })
    }
}
