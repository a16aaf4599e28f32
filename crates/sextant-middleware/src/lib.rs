//! # Sextant Middleware
//!
//! The chain engine: wraps an action's handler in an ordered stack of
//! middleware, where every link can inspect or transform the arguments,
//! short-circuit with a failure, post-process the result, or (for
//! context-aware middleware) add typed values to a per-invocation context.
//!
//! ## Execution Order
//!
//! ```text
//! call(args) → A → B → C → handler
//!                              ↓
//! result     ← A ← B ← C ←────┘
//! ```
//!
//! Middleware attached first runs outermost. A link that does not call its
//! continuation stops the chain; the links it encloses and the handler never
//! run.
//!
//! ## Key Features
//!
//! - **Typed context**: a context-aware middleware declares what it reads
//!   and what it provides, and attaching it before its requirements are
//!   met does not compile
//! - **Branching**: builders are cheap to clone and each clone extends
//!   independently
//! - **Failures as values**: every link returns an
//!   [`ActionResult`](sextant_core::ActionResult); nothing is raised
//! - **Built-in stages**: validation, logging, error masking, a panic guard
//!   and telemetry in [`stages`]
//!
//! ## Example
//!
//! ```
//! use sextant_core::{ActionResult, BoxFuture};
//! use sextant_middleware::{ActionBuilder, And, Context, ContextMiddleware, ContextNext, Empty};
//!
//! struct User {
//!     name: String,
//! }
//!
//! struct Authenticate;
//!
//! impl ContextMiddleware<String, String> for Authenticate {
//!     type Requires = Empty;
//!     type Provides = User;
//!
//!     fn name(&self) -> &'static str {
//!         "authenticate"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: Context<Empty>,
//!         token: String,
//!         next: ContextNext<And<User, Empty>, String, String>,
//!     ) -> BoxFuture<'a, ActionResult<String>> {
//!         Box::pin(async move {
//!             if token != "secret" {
//!                 return ActionResult::error_with_code("Unauthorized", "UNAUTHORIZED");
//!             }
//!             let user = User { name: "ada".to_string() };
//!             next.run(ctx.provide(user), token).await
//!         })
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let whoami = ActionBuilder::new()
//!     .use_context(Authenticate)
//!     .handle(|ctx, _token: String| async move {
//!         ActionResult::success(ctx.get::<User, _>().name.clone())
//!     });
//!
//! assert_eq!(whoami.call("secret".to_string()).await, ActionResult::success("ada".to_string()));
//! assert_eq!(whoami.call("guess".to_string()).await.code(), Some("UNAUTHORIZED"));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/sextant-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod compose;
pub mod context;
pub mod middleware;
pub mod stages;

// Re-export main types at crate root
pub use builder::{Action, ActionBuilder};
pub use compose::{apply_middleware, boxed, compose_middleware, BoxedMiddleware, ComposedMiddleware};
pub use context::{And, Contains, ContainsAll, Context, Empty, Here, KeyList, Replaced, There};
pub use middleware::{
    create_context_middleware, create_middleware, ContextMiddleware, ContextNext,
    FnContextMiddleware, FnMiddleware, Middleware, Next,
};
pub use sextant_core::BoxFuture;
