//! Argument validation middleware.
//!
//! Parses the action's argument with a [`Schema`] before the rest of the
//! chain runs. A rejected argument short-circuits with a failure; an
//! accepted one is replaced by the schema's parsed output.
//!
//! # Failure Message
//!
//! Unless a formatter is supplied, the failure message is picked in order:
//!
//! 1. the first issue's message
//! 2. the schema error's own message
//! 3. the configured default (`"Validation failed"`)
//!
//! # Typed Output
//!
//! [`ValidationMiddleware`] keeps the argument type, so a schema over
//! `serde_json::Value` can only hand the handler another `Value`.
//! [`TypedValidationMiddleware`] is the context-aware counterpart: it leaves
//! the argument untouched and provides the parsed value as [`Validated<D>`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sextant_middleware::stages::{schema_fn, validate, ParseOutcome};
//!
//! let non_empty = schema_fn(|name: String| {
//!     if name.is_empty() {
//!         ParseOutcome::issue("name is required")
//!     } else {
//!         ParseOutcome::success(name)
//!     }
//! });
//!
//! let action = ActionBuilder::new()
//!     .use_middleware(validate(non_empty).code("BAD_NAME"))
//!     .handle(|_ctx: Context, name: String| async move { success(name) });
//! ```

use crate::context::{And, Context, Empty};
use crate::middleware::{ContextMiddleware, ContextNext, Middleware, Next};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sextant_config::ValidationConfig;
use sextant_core::{codes, ActionResult, BoxFuture};
use std::marker::PhantomData;
use std::sync::Arc;

/// Default message when a schema error carries no detail.
pub const DEFAULT_MESSAGE: &str = "Validation failed";

/// One problem found by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Human-readable description.
    pub message: String,
}

impl SchemaIssue {
    /// Creates an issue.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a schema rejected its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaError {
    /// Overall description, if the schema gives one.
    pub message: Option<String>,
    /// Individual issues, most relevant first.
    pub errors: Vec<SchemaIssue>,
}

impl SchemaError {
    /// Creates an error with a single issue.
    pub fn issue(message: impl Into<String>) -> Self {
        Self {
            message: None,
            errors: vec![SchemaIssue::new(message)],
        }
    }

    /// Creates an error with only an overall message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    /// Returns the most specific message available.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .first()
            .map(|issue| issue.message.as_str())
            .or(self.message.as_deref())
    }
}

/// Outcome of [`Schema::safe_parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<A> {
    /// The input is valid; `data` is the parsed value.
    Success {
        /// Parsed value.
        data: A,
    },
    /// The input is invalid.
    Failure {
        /// What went wrong.
        error: SchemaError,
    },
}

impl<A> ParseOutcome<A> {
    /// Accepts `data`.
    pub fn success(data: A) -> Self {
        Self::Success { data }
    }

    /// Rejects with a single issue.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Failure {
            error: SchemaError::issue(message),
        }
    }
}

/// Something that can check and normalize a value.
///
/// Never raises: rejection is reported through [`ParseOutcome::Failure`].
pub trait Schema<A>: Send + Sync + 'static {
    /// Parses `input`.
    fn safe_parse(&self, input: A) -> ParseOutcome<A>;
}

impl<A, S> Schema<A> for Arc<S>
where
    S: Schema<A> + ?Sized,
{
    fn safe_parse(&self, input: A) -> ParseOutcome<A> {
        (**self).safe_parse(input)
    }
}

/// A schema backed by a closure. Created with [`schema_fn`].
#[derive(Clone)]
pub struct FnSchema<F> {
    func: F,
}

/// Wraps a closure as a [`Schema`].
pub fn schema_fn<A, F>(func: F) -> FnSchema<F>
where
    F: Fn(A) -> ParseOutcome<A> + Send + Sync + 'static,
{
    FnSchema { func }
}

impl<A, F> Schema<A> for FnSchema<F>
where
    F: Fn(A) -> ParseOutcome<A> + Send + Sync + 'static,
{
    fn safe_parse(&self, input: A) -> ParseOutcome<A> {
        (self.func)(input)
    }
}

/// A schema over JSON values that checks the value deserializes as `D`.
///
/// The parsed output is `D` serialized back to JSON, so unknown fields and
/// defaults are normalized according to `D`'s serde attributes.
pub struct JsonSchema<D> {
    _marker: PhantomData<fn() -> D>,
}

impl<D> JsonSchema<D> {
    /// Creates a schema for `D`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D> Default for JsonSchema<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for JsonSchema<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for JsonSchema<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JsonSchema")
            .field(&std::any::type_name::<D>())
            .finish()
    }
}

impl<D> Schema<serde_json::Value> for JsonSchema<D>
where
    D: DeserializeOwned + Serialize + 'static,
{
    fn safe_parse(&self, input: serde_json::Value) -> ParseOutcome<serde_json::Value> {
        let parsed = match serde_json::from_value::<D>(input) {
            Ok(parsed) => parsed,
            Err(e) => return ParseOutcome::issue(e.to_string()),
        };
        match serde_json::to_value(parsed) {
            Ok(data) => ParseOutcome::success(data),
            Err(e) => ParseOutcome::Failure {
                error: SchemaError::message(e.to_string()),
            },
        }
    }
}

type ErrorFormatter = Arc<dyn Fn(&SchemaError) -> String + Send + Sync>;

/// Middleware that validates the argument before the rest of the chain.
pub struct ValidationMiddleware<S> {
    schema: S,
    code: String,
    default_message: String,
    formatter: Option<ErrorFormatter>,
}

impl<S> ValidationMiddleware<S> {
    /// Creates a validation middleware with default settings.
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            code: codes::VALIDATION_ERROR.to_string(),
            default_message: DEFAULT_MESSAGE.to_string(),
            formatter: None,
        }
    }

    /// Creates a validation middleware using the configured code and message.
    pub fn from_config(schema: S, config: &ValidationConfig) -> Self {
        Self {
            code: config.error_code.clone(),
            default_message: config.default_message.clone(),
            ..Self::new(schema)
        }
    }

    /// Sets the failure code.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Replaces the message selection with a custom formatter.
    #[must_use]
    pub fn format_error<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&SchemaError) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    fn failure_message(&self, error: &SchemaError) -> String {
        select_message(self.formatter.as_ref(), error, &self.default_message)
    }
}

fn select_message(formatter: Option<&ErrorFormatter>, error: &SchemaError, default: &str) -> String {
    match formatter {
        Some(format) => format(error),
        None => error.first_message().unwrap_or(default).to_string(),
    }
}

impl<S> std::fmt::Debug for ValidationMiddleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationMiddleware")
            .field("code", &self.code)
            .field("default_message", &self.default_message)
            .field("custom_formatter", &self.formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl<A, T, S> Middleware<A, T> for ValidationMiddleware<S>
where
    S: Schema<A>,
    A: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "validation"
    }

    fn process<'a>(&'a self, args: A, next: Next<A, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            match self.schema.safe_parse(args) {
                ParseOutcome::Success { data } => next.run(data).await,
                ParseOutcome::Failure { error } => {
                    let message = self.failure_message(&error);
                    tracing::debug!(code = %self.code, issues = error.errors.len(), "argument rejected");
                    ActionResult::error_with_code(message, self.code.clone())
                }
            }
        })
    }
}

/// Creates a [`ValidationMiddleware`] for `schema`.
pub fn validate<S>(schema: S) -> ValidationMiddleware<S> {
    ValidationMiddleware::new(schema)
}

/// A value that passed validation, placed in the context by
/// [`TypedValidationMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<D>(pub D);

impl<D> Validated<D> {
    /// Unwraps the validated value.
    pub fn into_inner(self) -> D {
        self.0
    }
}

impl<D> std::ops::Deref for Validated<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.0
    }
}

/// Context-aware validation that provides the parsed value as [`Validated<D>`].
///
/// The argument itself is forwarded unchanged. Failure code, message
/// selection and configuration match [`ValidationMiddleware`].
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use sextant_core::ActionResult;
/// use sextant_middleware::stages::{validate_json, Validated};
/// use sextant_middleware::ActionBuilder;
///
/// #[derive(Deserialize)]
/// struct NewPost {
///     title: String,
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let create = ActionBuilder::<serde_json::Value, String>::new()
///     .use_context(validate_json::<NewPost>())
///     .handle(|ctx, _raw| async move {
///         let post = ctx.get::<Validated<NewPost>, _>();
///         ActionResult::success(post.title.clone())
///     });
///
/// let created = create.call(serde_json::json!({"title": "hello"})).await;
/// assert_eq!(created, ActionResult::success("hello".to_string()));
/// assert!(create.call(serde_json::json!({})).await.is_error());
/// # });
/// ```
pub struct TypedValidationMiddleware<F, D> {
    parse: F,
    code: String,
    default_message: String,
    formatter: Option<ErrorFormatter>,
    _marker: PhantomData<fn() -> D>,
}

impl<F, D> TypedValidationMiddleware<F, D> {
    /// Creates a typed validation middleware from a parse function.
    pub fn new(parse: F) -> Self {
        Self {
            parse,
            code: codes::VALIDATION_ERROR.to_string(),
            default_message: DEFAULT_MESSAGE.to_string(),
            formatter: None,
            _marker: PhantomData,
        }
    }

    /// Creates a typed validation middleware using the configured code and message.
    pub fn from_config(parse: F, config: &ValidationConfig) -> Self {
        Self {
            code: config.error_code.clone(),
            default_message: config.default_message.clone(),
            ..Self::new(parse)
        }
    }

    /// Sets the failure code.
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Replaces the message selection with a custom formatter.
    #[must_use]
    pub fn format_error<E>(mut self, formatter: E) -> Self
    where
        E: Fn(&SchemaError) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }
}

impl<F, D> std::fmt::Debug for TypedValidationMiddleware<F, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedValidationMiddleware")
            .field("output", &std::any::type_name::<D>())
            .field("code", &self.code)
            .field("default_message", &self.default_message)
            .finish_non_exhaustive()
    }
}

impl<A, T, F, D> ContextMiddleware<A, T> for TypedValidationMiddleware<F, D>
where
    F: Fn(&A) -> ParseOutcome<D> + Send + Sync + 'static,
    D: Send + Sync + 'static,
    A: Send + 'static,
    T: Send + 'static,
{
    type Requires = Empty;
    type Provides = Validated<D>;

    fn name(&self) -> &'static str {
        "typed_validation"
    }

    fn process<'a>(
        &'a self,
        ctx: Context<Empty>,
        args: A,
        next: ContextNext<And<Validated<D>, Empty>, A, T>,
    ) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin(async move {
            let outcome = (self.parse)(&args);
            match outcome {
                ParseOutcome::Success { data } => next.run(ctx.provide(Validated(data)), args).await,
                ParseOutcome::Failure { error } => {
                    let message = select_message(self.formatter.as_ref(), &error, &self.default_message);
                    tracing::debug!(code = %self.code, issues = error.errors.len(), "argument rejected");
                    ActionResult::error_with_code(message, self.code.clone())
                }
            }
        })
    }
}

/// Creates a [`TypedValidationMiddleware`] from a parse function.
pub fn validate_into<A, D, F>(parse: F) -> TypedValidationMiddleware<F, D>
where
    F: Fn(&A) -> ParseOutcome<D> + Send + Sync + 'static,
{
    TypedValidationMiddleware::new(parse)
}

/// Parse function that deserializes a JSON argument into `D`.
pub type JsonParse<D> = fn(&serde_json::Value) -> ParseOutcome<D>;

/// Creates a [`TypedValidationMiddleware`] that deserializes a JSON argument into `D`.
pub fn validate_json<D>() -> TypedValidationMiddleware<JsonParse<D>, D>
where
    D: DeserializeOwned + Send + Sync + 'static,
{
    TypedValidationMiddleware::new(parse_json::<D> as JsonParse<D>)
}

fn parse_json<D: DeserializeOwned>(input: &serde_json::Value) -> ParseOutcome<D> {
    match D::deserialize(input) {
        Ok(data) => ParseOutcome::success(data),
        Err(e) => ParseOutcome::issue(e.to_string()),
    }
}
