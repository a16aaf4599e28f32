//! Action builder.
//!
//! An [`ActionBuilder`] accumulates an ordered list of middleware and is
//! finalized with a handler into an [`Action`]. The builder tracks, in its
//! `K` type parameter, which context values the attached context-aware
//! middleware will have provided by the time the handler runs.
//!
//! ## Execution Order
//!
//! ```text
//! call(args) → first attached → ... → last attached → handler
//!                                                        ↓
//! result     ← first attached ← ... ← last attached ←───┘
//! ```
//!
//! ## Context Requirements
//!
//! A context-aware middleware can only be attached once everything it
//! requires has been provided upstream. This does not compile, because
//! nothing provides `User` before `LoadProfile` asks for it:
//!
//! ```compile_fail
//! use sextant_core::{ActionResult, BoxFuture};
//! use sextant_middleware::{ActionBuilder, And, Context, ContextMiddleware, ContextNext, Empty};
//!
//! struct User;
//! struct Profile;
//! struct LoadProfile;
//!
//! impl ContextMiddleware<(), ()> for LoadProfile {
//!     type Requires = And<User, Empty>;
//!     type Provides = Profile;
//!
//!     fn name(&self) -> &'static str {
//!         "load_profile"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: Context<And<User, Empty>>,
//!         args: (),
//!         next: ContextNext<And<Profile, And<User, Empty>>, (), ()>,
//!     ) -> BoxFuture<'a, ActionResult<()>> {
//!         Box::pin(async move { next.run(ctx.provide(Profile), args).await })
//!     }
//! }
//!
//! let _builder = ActionBuilder::<(), ()>::new().use_context(LoadProfile);
//! ```

use crate::context::{And, Context, ContainsAll, Empty, ErasedContext};
use crate::middleware::{Continuation, ContextMiddleware, ErasedHandler, Link, Middleware};
use sextant_core::{ActionFn, ActionResult, BoxFuture};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builder for constructing an [`Action`].
///
/// Each `use_*` call returns the builder with one more link. Builders are
/// cheap to clone, and a clone can be extended independently to branch
/// several actions off a shared prefix.
///
/// # Example
///
/// ```
/// use sextant_core::ActionResult;
/// use sextant_middleware::{ActionBuilder, Context, FnMiddleware, Next};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let greet = ActionBuilder::new()
///     .use_middleware(FnMiddleware::new(
///         "trim",
///         |name: String, next: Next<String, String>| async move {
///             next.run(name.trim().to_string()).await
///         },
///     ))
///     .handle(|_ctx: Context, name: String| async move {
///         ActionResult::success(format!("hello {name}"))
///     });
///
/// assert_eq!(greet.call("  ada ".to_string()).await, ActionResult::success("hello ada".to_string()));
/// # });
/// ```
pub struct ActionBuilder<Args, T, K = Empty> {
    /// Attached links in attachment order
    links: Vec<Link<Args, T>>,
    _keys: PhantomData<fn() -> K>,
}

impl<Args, T> ActionBuilder<Args, T, Empty>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            _keys: PhantomData,
        }
    }
}

impl<Args, T> Default for ActionBuilder<Args, T, Empty>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, T, K> Clone for ActionBuilder<Args, T, K> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            _keys: PhantomData,
        }
    }
}

impl<Args: 'static, T: 'static, K> std::fmt::Debug for ActionBuilder<Args, T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionBuilder")
            .field("links", &self.link_names())
            .finish()
    }
}

impl<Args, T, K> ActionBuilder<Args, T, K>
where
    Args: Send + 'static,
    T: Send + 'static,
    K: 'static,
{
    /// Attaches plain middleware. The tracked context is unchanged.
    #[must_use]
    pub fn use_middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<Args, T>,
    {
        self.links.push(Link::Plain(Arc::new(middleware)));
        self
    }

    /// Attaches context-aware middleware.
    ///
    /// Only compiles when every value in `M::Requires` has already been
    /// provided. The returned builder additionally tracks `M::Provides`.
    #[must_use]
    pub fn use_context<M, I>(self, middleware: M) -> ActionBuilder<Args, T, And<M::Provides, K>>
    where
        M: ContextMiddleware<Args, T>,
        K: ContainsAll<M::Requires, I>,
    {
        let mut links = self.links;
        links.push(Link::Contextual(Arc::new(middleware)));
        ActionBuilder {
            links,
            _keys: PhantomData,
        }
    }

    /// Returns the number of attached links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if no middleware is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Finalizes the chain with a handler.
    ///
    /// The handler receives the fully accumulated context and the
    /// (possibly transformed) arguments.
    pub fn handle<H, Fut>(self, handler: H) -> Action<Args, T>
    where
        H: Fn(Context<K>, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult<T>> + Send + 'static,
    {
        let handler: ErasedHandler<Args, T> = Arc::new(
            move |ctx: ErasedContext, args: Args| -> BoxFuture<'static, ActionResult<T>> {
                Box::pin(handler(ctx.retype(), args))
            },
        );

        let action = Action {
            inner: Arc::new(ActionInner {
                links: self.links.into(),
                handler,
            }),
        };
        tracing::debug!(links = ?action.link_names(), "action assembled");
        action
    }
}

impl<Args: 'static, T: 'static, K> ActionBuilder<Args, T, K> {
    /// Returns the names of the attached links in attachment order.
    #[must_use]
    pub fn link_names(&self) -> Vec<&'static str> {
        self.links.iter().map(Link::name).collect()
    }
}

/// A finalized, callable action.
///
/// Cloning is cheap and clones share the same chain. Every call seeds a
/// fresh empty context, so concurrent calls never observe each other's
/// context values.
pub struct Action<Args, T> {
    inner: Arc<ActionInner<Args, T>>,
}

struct ActionInner<Args, T> {
    links: Arc<[Link<Args, T>]>,
    handler: ErasedHandler<Args, T>,
}

impl<Args, T> Clone for Action<Args, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Args: 'static, T: 'static> std::fmt::Debug for Action<Args, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("links", &self.link_names())
            .finish_non_exhaustive()
    }
}

impl<Args: 'static, T: 'static> Action<Args, T> {
    /// Returns the names of the links in execution order.
    #[must_use]
    pub fn link_names(&self) -> Vec<&'static str> {
        self.inner.links.iter().map(Link::name).collect()
    }

    /// Returns the number of middleware links in front of the handler.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.links.len()
    }

    /// Returns `true` if the handler is called directly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.links.is_empty()
    }
}

impl<Args, T> Action<Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    /// Invokes the action.
    ///
    /// The returned future does not borrow the action and can be spawned.
    /// Panics raised by middleware or the handler are not caught.
    pub fn call(&self, args: Args) -> BoxFuture<'static, ActionResult<T>> {
        self.build_chain().run(Context::new().retype(), args)
    }

    /// Builds the continuation chain for one invocation.
    fn build_chain(&self) -> Continuation<Args, T> {
        // Start with the handler as the terminal point
        let mut next = Continuation::Handler(Arc::clone(&self.inner.handler));

        // Wrap from the last attached link outwards
        for link in self.inner.links.iter().rev() {
            next = Continuation::Link {
                link: link.clone(),
                next: Box::new(next),
            };
        }

        next
    }
}

impl<Args, T> ActionFn<Args, T> for Action<Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn invoke(&self, args: Args) -> BoxFuture<'_, ActionResult<T>> {
        self.call(args)
    }
}
