//! # Sextant Core
//!
//! Core types shared by every Sextant crate.
//!
//! - [`ActionResult`] - The uniform success/failure envelope every handler and
//!   middleware produces
//! - [`ActionError`] - Error kind for asserting success on a failed result
//! - [`ActionFn`] - The contract any callable action satisfies
//! - [`codes`] - Well-known failure codes used by the built-in stages
//!
//! ## Example
//!
//! ```
//! use sextant_core::{error_with_code, success, ActionResult};
//!
//! let ok: ActionResult<u32> = success(7);
//! assert!(ok.is_success());
//! assert_eq!(ok.unwrap_or(0), 7);
//!
//! let denied: ActionResult<u32> = error_with_code("Unauthorized", "UNAUTHORIZED");
//! assert_eq!(denied.code(), Some("UNAUTHORIZED"));
//! assert_eq!(denied.into_data().unwrap_err().to_string(), "Unauthorized");
//! ```

#![doc(html_root_url = "https://docs.rs/sextant-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod codes;
mod error;
mod result;

pub use action::{action_fn, ActionFn, BoxFuture, FnAction};
pub use error::ActionError;
pub use result::{
    error, error_with_code, is_error, is_success, success, unwrap, unwrap_or, ActionResult,
};
