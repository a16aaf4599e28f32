//! Built-in middleware stages.
//!
//! Unlike a fixed pipeline, none of these are installed implicitly. Each is
//! an ordinary plain middleware attached with
//! [`use_middleware`](crate::ActionBuilder::use_middleware) wherever the
//! caller wants it. The one exception is [`TypedValidationMiddleware`],
//! which is context-aware and attached with
//! [`use_context`](crate::ActionBuilder::use_context).
//!
//! | Stage                 | Purpose                                       |
//! |-----------------------|-----------------------------------------------|
//! | [`validation`]        | Parse and normalize the argument with a schema |
//! | [`logging`]           | Report calls and outcomes to a logger          |
//! | [`masking`]           | Hide failure details behind a generic message  |
//! | [`panic`]             | Turn downstream panics into failures           |
//! | [`telemetry`]         | Record timing and call metrics                 |
//!
//! A typical server-facing order, outermost first:
//!
//! ```text
//! CatchPanic → Telemetry → MaskErrors → Logging → Validation → ... → Handler
//! ```

pub mod logging;
pub mod masking;
pub mod panic;
pub mod telemetry;
pub mod validation;

pub use logging::{with_logging, ActionLogger, FnLogger, LoggingMiddleware, TracingLogger};
pub use masking::MaskErrorsMiddleware;
pub use panic::{server_action, CatchPanicMiddleware};
pub use telemetry::TelemetryMiddleware;
pub use validation::{
    schema_fn, validate, validate_into, validate_json, FnSchema, JsonParse, JsonSchema,
    ParseOutcome, Schema, SchemaError, SchemaIssue, TypedValidationMiddleware, Validated,
    ValidationMiddleware,
};
