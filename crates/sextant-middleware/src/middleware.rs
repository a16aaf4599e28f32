//! Core middleware traits and types.
//!
//! Two species of middleware can wrap an action's handler:
//!
//! - [`Middleware`] - plain middleware. Sees the arguments and the result,
//!   never the context. The context is threaded around it untouched.
//! - [`ContextMiddleware`] - context-aware middleware. Declares the context
//!   values it reads (`Requires`) and the one it adds (`Provides`).
//!
//! Both receive a continuation ([`Next`] or [`ContextNext`]) that is consumed
//! when run. Not running it short-circuits the chain; running it twice does
//! not compile.
//!
//! # Example
//!
//! ```ignore
//! use sextant_middleware::{BoxFuture, Middleware, Next};
//! use sextant_core::ActionResult;
//!
//! struct Timing;
//!
//! impl Middleware<Order, Receipt> for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         args: Order,
//!         next: Next<Order, Receipt>,
//!     ) -> BoxFuture<'a, ActionResult<Receipt>> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let result = next.run(args).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "order placed");
//!             result
//!         })
//!     }
//! }
//! ```

use crate::context::{And, Context, ErasedContext, KeyList};
use sextant_core::{ActionResult, BoxFuture};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Plain middleware.
///
/// # Invariants
///
/// - Middleware runs `next` at most once (enforced: `run` consumes it)
/// - Middleware that short-circuits SHOULD return a failure
/// - Middleware SHOULD NOT rewrite downstream failures unless that is its purpose
pub trait Middleware<Args, T>: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs and introspection.
    fn name(&self) -> &'static str;

    /// Processes one invocation.
    ///
    /// # Arguments
    ///
    /// * `args` - The invocation's arguments, possibly transformed upstream
    /// * `next` - Continuation to the rest of the chain
    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>>;
}

impl<Args, T, M> Middleware<Args, T> for Arc<M>
where
    M: Middleware<Args, T> + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        (**self).process(args, next)
    }
}

/// Context-aware middleware.
///
/// The middleware sees the context narrowed to `Requires` and must hand
/// `next` a context that also holds `Provides`. The only way to produce one
/// is [`Context::provide`] on the context it was given, so upstream values
/// are always forwarded.
pub trait ContextMiddleware<Args, T>: Send + Sync + 'static {
    /// Context values this middleware reads.
    type Requires: KeyList;

    /// The context value this middleware adds.
    type Provides: Send + Sync + 'static;

    /// Returns the name of this middleware, used in logs and introspection.
    fn name(&self) -> &'static str;

    /// Processes one invocation.
    fn process<'a>(
        &'a self,
        ctx: Context<Self::Requires>,
        args: Args,
        next: ContextNext<And<Self::Provides, Self::Requires>, Args, T>,
    ) -> BoxFuture<'a, ActionResult<T>>;
}

/// Context-aware middleware with its key lists erased, so it can sit in a
/// chain next to plain middleware.
pub(crate) trait ErasedContextMiddleware<Args, T>: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn process_erased<'a>(
        &'a self,
        ctx: ErasedContext,
        args: Args,
        next: Continuation<Args, T>,
    ) -> BoxFuture<'a, ActionResult<T>>;
}

impl<Args, T, M> ErasedContextMiddleware<Args, T> for M
where
    M: ContextMiddleware<Args, T>,
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        ContextMiddleware::name(self)
    }

    fn process_erased<'a>(
        &'a self,
        ctx: ErasedContext,
        args: Args,
        next: Continuation<Args, T>,
    ) -> BoxFuture<'a, ActionResult<T>> {
        self.process(ctx.retype(), args, ContextNext::new(next))
    }
}

/// One attached link of a chain, tagged with its species at attachment time.
pub(crate) enum Link<Args, T> {
    Plain(Arc<dyn Middleware<Args, T>>),
    Contextual(Arc<dyn ErasedContextMiddleware<Args, T>>),
}

impl<Args: 'static, T: 'static> Link<Args, T> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Plain(middleware) => middleware.name(),
            Self::Contextual(middleware) => middleware.name(),
        }
    }
}

impl<Args, T> Clone for Link<Args, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(middleware) => Self::Plain(Arc::clone(middleware)),
            Self::Contextual(middleware) => Self::Contextual(Arc::clone(middleware)),
        }
    }
}

/// The terminal handler with its key list erased.
pub(crate) type ErasedHandler<Args, T> =
    Arc<dyn Fn(ErasedContext, Args) -> BoxFuture<'static, ActionResult<T>> + Send + Sync>;

/// The rest of a chain, from some link down to the handler.
pub(crate) enum Continuation<Args, T> {
    /// More middleware to process
    Link {
        link: Link<Args, T>,
        next: Box<Continuation<Args, T>>,
    },
    /// End of chain - invoke the handler
    Handler(ErasedHandler<Args, T>),
}

impl<Args, T> Continuation<Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    /// Runs this continuation with the given context and arguments.
    pub(crate) fn run(self, ctx: ErasedContext, args: Args) -> BoxFuture<'static, ActionResult<T>> {
        match self {
            Self::Link {
                link: Link::Plain(middleware),
                next,
            } => Box::pin(async move { middleware.process(args, Next::new(*next, ctx)).await }),
            Self::Link {
                link: Link::Contextual(middleware),
                next,
            } => Box::pin(async move { middleware.process_erased(ctx, args, *next).await }),
            Self::Handler(handler) => handler(ctx, args),
        }
    }
}

/// Continuation handed to plain middleware.
///
/// Holds the invocation's context privately and passes it on unchanged.
pub struct Next<Args, T> {
    continuation: Continuation<Args, T>,
    ctx: ErasedContext,
}

impl<Args, T> Next<Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    pub(crate) fn new(continuation: Continuation<Args, T>, ctx: ErasedContext) -> Self {
        Self { continuation, ctx }
    }

    /// Creates a terminal `Next` that invokes `handler` with an empty context.
    ///
    /// Useful for exercising a single middleware in isolation.
    pub fn handler<F, Fut>(handler: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult<T>> + Send + 'static,
    {
        let erased: ErasedHandler<Args, T> = Arc::new(
            move |_ctx: ErasedContext, args: Args| -> BoxFuture<'static, ActionResult<T>> {
                Box::pin(handler(args))
            },
        );
        Self::new(Continuation::Handler(erased), Context::new().retype())
    }

    /// Invokes the rest of the chain.
    ///
    /// This consumes `self` to ensure it can only be called once.
    pub async fn run(self, args: Args) -> ActionResult<T> {
        self.continuation.run(self.ctx, args).await
    }

    /// Splits into the raw continuation and context.
    pub(crate) fn into_parts(self) -> (Continuation<Args, T>, ErasedContext) {
        (self.continuation, self.ctx)
    }
}

/// Continuation handed to context-aware middleware.
///
/// `K` is the key list the next link expects.
pub struct ContextNext<K, Args, T> {
    continuation: Continuation<Args, T>,
    _keys: PhantomData<fn() -> K>,
}

impl<K, Args, T> ContextNext<K, Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    pub(crate) fn new(continuation: Continuation<Args, T>) -> Self {
        Self {
            continuation,
            _keys: PhantomData,
        }
    }

    /// Invokes the rest of the chain with the extended context.
    ///
    /// This consumes `self` to ensure it can only be called once.
    pub async fn run(self, ctx: Context<K>, args: Args) -> ActionResult<T> {
        self.continuation.run(ctx.retype(), args).await
    }
}

/// A plain middleware created from an async function.
///
/// # Example
///
/// ```ignore
/// let require_token = FnMiddleware::new("require_token", |req: Request, next: Next<Request, Reply>| async move {
///     if req.token.is_empty() {
///         return ActionResult::error_with_code("Unauthorized", "UNAUTHORIZED");
///     }
///     next.run(req).await
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<Args, T, F, Fut> Middleware<Args, T> for FnMiddleware<F>
where
    F: Fn(Args, Next<Args, T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin((self.func)(args, next))
    }
}

/// Wraps an async function as plain middleware.
pub fn create_middleware<Args, T, F, Fut>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: Fn(Args, Next<Args, T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
{
    FnMiddleware::new(name, func)
}

/// A context-aware middleware created from an async function.
///
/// `R` is the key list it reads and `P` the value type it provides.
pub struct FnContextMiddleware<F, R, P> {
    name: &'static str,
    func: F,
    _marker: PhantomData<fn() -> (R, P)>,
}

impl<F, R, P> FnContextMiddleware<F, R, P> {
    /// Creates a new function-based context middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self {
            name,
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, R, P> std::fmt::Debug for FnContextMiddleware<F, R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnContextMiddleware")
            .field("name", &self.name)
            .field("provides", &std::any::type_name::<P>())
            .finish_non_exhaustive()
    }
}

impl<Args, T, F, Fut, R, P> ContextMiddleware<Args, T> for FnContextMiddleware<F, R, P>
where
    F: Fn(Context<R>, Args, ContextNext<And<P, R>, Args, T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
    R: KeyList,
    P: Send + Sync + 'static,
    Args: Send + 'static,
    T: Send + 'static,
{
    type Requires = R;
    type Provides = P;

    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: Context<R>,
        args: Args,
        next: ContextNext<And<P, R>, Args, T>,
    ) -> BoxFuture<'a, ActionResult<T>> {
        Box::pin((self.func)(ctx, args, next))
    }
}

/// Wraps an async function as context-aware middleware.
///
/// # Example
///
/// ```ignore
/// let with_user = create_context_middleware::<Empty, User, _, _, _, _>(
///     "with_user",
///     |ctx, args: Request, next| async move {
///         let user = lookup(&args.token).await;
///         next.run(ctx.provide(user), args).await
///     },
/// );
/// ```
pub fn create_context_middleware<R, P, Args, T, F, Fut>(
    name: &'static str,
    func: F,
) -> FnContextMiddleware<F, R, P>
where
    F: Fn(Context<R>, Args, ContextNext<And<P, R>, Args, T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
    R: KeyList,
    P: Send + Sync + 'static,
{
    FnContextMiddleware::new(name, func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Empty;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tagging {
        name: &'static str,
    }

    impl Middleware<Vec<&'static str>, Vec<&'static str>> for Tagging {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            mut args: Vec<&'static str>,
            next: Next<Vec<&'static str>, Vec<&'static str>>,
        ) -> BoxFuture<'a, ActionResult<Vec<&'static str>>> {
            Box::pin(async move {
                args.push(self.name);
                next.run(args).await
            })
        }
    }

    #[tokio::test]
    async fn test_middleware_name() {
        let mw = Tagging { name: "test" };
        assert_eq!(Middleware::name(&mw), "test");
    }

    #[tokio::test]
    async fn test_next_handler() {
        let next = Next::handler(|n: u32| async move { ActionResult::success(n + 1) });
        assert_eq!(next.run(1).await, ActionResult::success(2));
    }

    #[tokio::test]
    async fn test_middleware_transforms_args() {
        let mw = Tagging { name: "first" };
        let next = Next::handler(|args: Vec<&'static str>| async move { ActionResult::success(args) });

        let result = mw.process(vec!["start"], next).await;
        assert_eq!(result, ActionResult::success(vec!["start", "first"]));
    }

    #[tokio::test]
    async fn test_fn_middleware_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler_calls = calls.clone();

        let mw = FnMiddleware::new("deny", |_args: u32, _next: Next<u32, u32>| async {
            ActionResult::error_with_code("denied", "DENIED")
        });
        let next = Next::handler(move |n: u32| {
            handler_calls.fetch_add(1, Ordering::SeqCst);
            async move { ActionResult::success(n) }
        });

        let result = mw.process(5, next).await;
        assert_eq!(result, ActionResult::error_with_code("denied", "DENIED"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shared_middleware_delegates() {
        let mw: Arc<dyn Middleware<Vec<&'static str>, Vec<&'static str>>> =
            Arc::new(Tagging { name: "shared" });
        assert_eq!(mw.name(), "shared");

        let next = Next::handler(|args: Vec<&'static str>| async move { ActionResult::success(args) });
        let result = mw.process(Vec::new(), next).await;
        assert_eq!(result, ActionResult::success(vec!["shared"]));
    }

    #[test]
    fn test_fn_context_middleware_declares_keys() {
        #[derive(Debug)]
        struct Tenant;

        let mw = create_context_middleware::<Empty, Tenant, u8, u8, _, _>(
            "tenant",
            |ctx: Context<Empty>, args: u8, next: ContextNext<And<Tenant, Empty>, u8, u8>| async move {
                next.run(ctx.provide(Tenant), args).await
            },
        );
        assert_eq!(ContextMiddleware::<u8, u8>::name(&mw), "tenant");
    }
}
