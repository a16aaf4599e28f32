//! Mock handlers.

use crate::recorder::CallRecorder;
use parking_lot::Mutex;
use sextant_core::{action_fn, ActionFn, ActionResult, BoxFuture};
use sextant_middleware::Context;
use std::sync::Arc;

/// A handler that returns a canned result and remembers its arguments.
///
/// Clones share the call log.
pub struct MockHandler<Args, T> {
    result: ActionResult<T>,
    calls: Arc<Mutex<Vec<Args>>>,
    recorder: Option<CallRecorder>,
}

impl<Args, T: Clone> Clone for MockHandler<Args, T> {
    fn clone(&self) -> Self {
        Self {
            result: self.result.clone(),
            calls: Arc::clone(&self.calls),
            recorder: self.recorder.clone(),
        }
    }
}

impl<Args, T: std::fmt::Debug> std::fmt::Debug for MockHandler<Args, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHandler")
            .field("result", &self.result)
            .field("call_count", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}

impl<Args, T> MockHandler<Args, T>
where
    Args: Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a mock that always returns `result`.
    #[must_use]
    pub fn returning(result: ActionResult<T>) -> Self {
        Self {
            result,
            calls: Arc::default(),
            recorder: None,
        }
    }

    /// Creates a mock that always succeeds with `data`.
    #[must_use]
    pub fn succeeding(data: T) -> Self {
        Self::returning(ActionResult::success(data))
    }

    /// Creates a mock that always fails with `message` and `code`.
    #[must_use]
    pub fn failing(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::returning(ActionResult::error_with_code(message, code))
    }

    /// Also records a `handler` event into `recorder` on every call.
    #[must_use]
    pub fn with_recorder(mut self, recorder: &CallRecorder) -> Self {
        self.recorder = Some(recorder.clone());
        self
    }

    /// Returns how many times the mock was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` if the mock was called at least once.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Returns the arguments of every call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Args> {
        self.calls.lock().clone()
    }

    fn respond(&self, args: Args) -> ActionResult<T> {
        self.calls.lock().push(args);
        if let Some(recorder) = &self.recorder {
            recorder.record("handler");
        }
        self.result.clone()
    }

    /// Returns a handler suitable for [`ActionBuilder::handle`](sextant_middleware::ActionBuilder::handle).
    ///
    /// The context is ignored.
    pub fn handler<K: 'static>(
        &self,
    ) -> impl Fn(Context<K>, Args) -> BoxFuture<'static, ActionResult<T>> + Send + Sync + 'static
    {
        let mock = self.clone();
        move |_ctx: Context<K>, args: Args| -> BoxFuture<'static, ActionResult<T>> {
            let result = mock.respond(args);
            Box::pin(async move { result })
        }
    }

    /// Returns the mock as a standalone [`ActionFn`].
    pub fn action(&self) -> impl ActionFn<Args, T> + Clone + 'static {
        let mock = self.clone();
        action_fn(move |args: Args| {
            let result = mock.respond(args);
            async move { result }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_action_counts_calls() {
        let mock = MockHandler::<u8, &str>::succeeding("done");
        assert!(!mock.was_called());

        let action = mock.action();
        assert_eq!(action.invoke(1_u8).await, ActionResult::success("done"));
        assert_eq!(action.invoke(2_u8).await, ActionResult::success("done"));

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failing_mock_records_handler_event() {
        let recorder = CallRecorder::new();
        let mock: MockHandler<(), ()> = MockHandler::failing("nope", "DENIED").with_recorder(&recorder);

        let result = mock.action().invoke(()).await;
        assert_eq!(result, ActionResult::error_with_code("nope", "DENIED"));
        assert_eq!(recorder.events(), ["handler"]);
    }

    #[test]
    fn test_clones_share_call_log() {
        let mock = MockHandler::<u8, u8>::succeeding(0);
        let clone = mock.clone();
        let _ = tokio_test::block_on(clone.action().invoke(9));
        assert_eq!(mock.calls(), vec![9]);
    }
}
