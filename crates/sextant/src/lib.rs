//! # Sextant
//!
//! **Typed action results and a context-accumulating middleware engine**
//!
//! - **Uniform envelope**: every action returns an [`ActionResult`], a success
//!   carrying data or a failure carrying a message and optional code
//! - **Ordered chains**: middleware wraps the handler in attachment order,
//!   with short-circuiting and post-processing
//! - **Typed context**: context-aware middleware adds values that later
//!   links and the handler read by type, checked at compile time
//! - **Built-in stages**: validation, logging, error masking, a panic guard
//!   and telemetry
//!
//! ## Quick Start
//!
//! ```
//! use sextant::prelude::*;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = SextantConfig::default();
//!
//! let shout = ActionBuilder::<String, String>::new()
//!     .use_middleware(CatchPanicMiddleware::new())
//!     .use_middleware(MaskErrorsMiddleware::from_config(&config.masking))
//!     .use_middleware(ValidationMiddleware::from_config(
//!         schema_fn(|s: String| {
//!             if s.is_empty() {
//!                 ParseOutcome::issue("text must not be empty")
//!             } else {
//!                 ParseOutcome::success(s)
//!             }
//!         }),
//!         &config.validation,
//!     ))
//!     .handle(|_ctx, text: String| async move { ActionResult::success(text.to_uppercase()) });
//!
//! assert_eq!(shout.call("hi".to_string()).await, ActionResult::success("HI".to_string()));
//! assert_eq!(shout.call(String::new()).await.code(), Some(codes::VALIDATION_ERROR));
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! call(args) → CatchPanic → MaskErrors → Validation → handler
//!                                                        ↓
//! result     ← CatchPanic ← MaskErrors ← Validation ←────┘
//! ```

#![doc(html_root_url = "https://docs.rs/sextant/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use sextant_core as core;

// Re-export the chain engine
pub use sextant_middleware as middleware;

// Re-export built-in stages
pub use sextant_middleware::stages;

// Re-export configuration
pub use sextant_config as config;

// Re-export telemetry
pub use sextant_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use sextant::prelude::*;
/// ```
pub mod prelude {
    pub use sextant_core::{action_fn, codes, ActionError, ActionFn, ActionResult, BoxFuture};

    pub use sextant_middleware::{
        apply_middleware, boxed, compose_middleware, create_context_middleware, create_middleware,
        Action, ActionBuilder, And, Context, ContextMiddleware, ContextNext, Empty, Middleware,
        Next, Replaced,
    };

    pub use sextant_middleware::stages::{
        schema_fn, server_action, validate, validate_into, validate_json, with_logging,
        ActionLogger, CatchPanicMiddleware, FnLogger, JsonSchema, MaskErrorsMiddleware,
        ParseOutcome, Schema, SchemaError, TelemetryMiddleware, TracingLogger,
        TypedValidationMiddleware, Validated, ValidationMiddleware,
    };

    pub use sextant_config::{ConfigLoader, SextantConfig};

    pub use sextant_telemetry::{init_logging, LogConfig};
}
