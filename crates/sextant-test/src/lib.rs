//! # Sextant Test
//!
//! Test utilities for Sextant actions and middleware.
//!
//! ## Key Features
//!
//! - **Call Recording**: [`CallRecorder`] collects an ordered trace, and
//!   [`RecordingMiddleware`] writes `enter:<name>` / `exit:<name>` into it
//! - **Mock Handlers**: [`MockHandler`] returns a canned result and counts
//!   its calls
//! - **Assertions**: [`assert_success`] and [`assert_failure`] with readable
//!   panic messages
//!
//! ## Example
//!
//! ```
//! use sextant_core::ActionResult;
//! use sextant_middleware::ActionBuilder;
//! use sextant_test::{assert_success, CallRecorder, MockHandler};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let recorder = CallRecorder::new();
//! let handler = MockHandler::returning(ActionResult::success(7)).with_recorder(&recorder);
//!
//! let action = ActionBuilder::<&str, i32>::new()
//!     .use_middleware(recorder.middleware("outer"))
//!     .use_middleware(recorder.middleware("inner"))
//!     .handle(handler.handler());
//!
//! assert_eq!(assert_success(action.call("args").await), 7);
//! assert_eq!(
//!     recorder.events(),
//!     ["enter:outer", "enter:inner", "handler", "exit:inner", "exit:outer"]
//! );
//! assert_eq!(handler.calls(), vec!["args"]);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/sextant-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assert;
mod mock;
mod recorder;

pub use assert::{assert_failure, assert_success};
pub use mock::MockHandler;
pub use recorder::{CallRecorder, RecordingMiddleware};
