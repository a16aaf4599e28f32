//! Composition helpers over plain middleware.
//!
//! These work with lists of type-erased middleware, for callers that
//! assemble chains dynamically. Both are thin layers over the same chain
//! machinery the [`ActionBuilder`] uses.

use crate::builder::{Action, ActionBuilder};
use crate::context::Context;
use crate::middleware::{Continuation, Link, Middleware, Next};
use sextant_core::{ActionFn, ActionResult, BoxFuture};
use std::sync::Arc;

/// A type-erased, shareable plain middleware.
pub type BoxedMiddleware<Args, T> = Arc<dyn Middleware<Args, T>>;

/// Erases a middleware into a [`BoxedMiddleware`].
pub fn boxed<Args, T, M>(middleware: M) -> BoxedMiddleware<Args, T>
where
    M: Middleware<Args, T>,
{
    Arc::new(middleware)
}

/// Wraps an existing action with a list of middleware.
///
/// The first middleware in the list is the outermost: it runs first and
/// sees the final result last.
///
/// # Example
///
/// ```
/// use sextant_core::{action_fn, success, ActionResult};
/// use sextant_middleware::{apply_middleware, boxed, FnMiddleware, Next};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let double = action_fn(|n: u32| async move { success(n * 2) });
/// let add_one = boxed(FnMiddleware::new("add_one", |n: u32, next: Next<u32, u32>| async move {
///     next.run(n + 1).await
/// }));
///
/// let action = apply_middleware(double, [add_one]);
/// assert_eq!(action.call(1).await, ActionResult::success(4));
/// # });
/// ```
pub fn apply_middleware<Args, T, A, I>(action: A, middleware: I) -> Action<Args, T>
where
    A: ActionFn<Args, T> + 'static,
    I: IntoIterator<Item = BoxedMiddleware<Args, T>>,
    Args: Send + 'static,
    T: Send + 'static,
{
    let builder = middleware
        .into_iter()
        .fold(ActionBuilder::new(), |builder, m| builder.use_middleware(m));

    let action = Arc::new(action);
    builder.handle(move |_ctx: Context, args: Args| {
        let action = Arc::clone(&action);
        async move { action.invoke(args).await }
    })
}

/// Combines a list of middleware into one.
///
/// The composed middleware runs the list in order and then continues with
/// whatever follows it in the enclosing chain. It can be attached to a
/// builder, passed to [`apply_middleware`], or composed again.
pub fn compose_middleware<Args, T, I>(middleware: I) -> ComposedMiddleware<Args, T>
where
    I: IntoIterator<Item = BoxedMiddleware<Args, T>>,
{
    ComposedMiddleware {
        name: "composed",
        links: middleware.into_iter().collect(),
    }
}

/// Several plain middleware acting as one.
///
/// Created with [`compose_middleware`].
pub struct ComposedMiddleware<Args, T> {
    name: &'static str,
    links: Arc<[BoxedMiddleware<Args, T>]>,
}

impl<Args: 'static, T: 'static> ComposedMiddleware<Args, T> {
    /// Overrides the name reported for the composed middleware.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns the names of the inner middleware in execution order.
    #[must_use]
    pub fn link_names(&self) -> Vec<&'static str> {
        self.links.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of inner middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the composition is a pass-through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<Args, T> Clone for ComposedMiddleware<Args, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            links: Arc::clone(&self.links),
        }
    }
}

impl<Args: 'static, T: 'static> std::fmt::Debug for ComposedMiddleware<Args, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("name", &self.name)
            .field("links", &self.link_names())
            .finish()
    }
}

impl<Args, T> Middleware<Args, T> for ComposedMiddleware<Args, T>
where
    Args: Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, args: Args, next: Next<Args, T>) -> BoxFuture<'a, ActionResult<T>> {
        let (mut chain, ctx) = next.into_parts();
        for middleware in self.links.iter().rev() {
            chain = Continuation::Link {
                link: Link::Plain(Arc::clone(middleware)),
                next: Box::new(chain),
            };
        }
        chain.run(ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::FnMiddleware;
    use parking_lot::Mutex;
    use sextant_core::{action_fn, success};

    fn push(name: &'static str) -> BoxedMiddleware<Vec<&'static str>, Vec<&'static str>> {
        boxed(FnMiddleware::new(
            name,
            move |mut args: Vec<&'static str>, next: Next<Vec<&'static str>, Vec<&'static str>>| async move {
                args.push(name);
                next.run(args).await
            },
        ))
    }

    fn echo() -> impl ActionFn<Vec<&'static str>, Vec<&'static str>> {
        action_fn(|args: Vec<&'static str>| async move { success(args) })
    }

    #[tokio::test]
    async fn test_apply_runs_first_listed_outermost() {
        let action = apply_middleware(echo(), [push("a"), push("b"), push("c")]);
        assert_eq!(action.link_names(), vec!["a", "b", "c"]);
        assert_eq!(action.call(Vec::new()).await, success(vec!["a", "b", "c"]));
    }

    #[tokio::test]
    async fn test_apply_with_no_middleware_is_identity() {
        let action = apply_middleware(echo(), Vec::new());
        assert!(action.is_empty());
        assert_eq!(action.call(vec!["x"]).await, success(vec!["x"]));
    }

    #[tokio::test]
    async fn test_composed_matches_direct_application() {
        let composed = compose_middleware([push("a"), push("b")]);
        assert_eq!(composed.link_names(), vec!["a", "b"]);

        let nested = apply_middleware(echo(), [boxed(composed), push("c")]);
        let flat = apply_middleware(echo(), [push("a"), push("b"), push("c")]);

        assert_eq!(nested.call(Vec::new()).await, flat.call(Vec::new()).await);
    }

    #[tokio::test]
    async fn test_composed_is_composable_again() {
        let inner = compose_middleware([push("a"), push("b")]).named("ab");
        let outer = compose_middleware([push("start"), boxed(inner)]);

        let action = ActionBuilder::new()
            .use_middleware(outer)
            .use_middleware(push("end"))
            .handle(|_ctx: Context, args: Vec<&'static str>| async move { success(args) });

        assert_eq!(
            action.call(Vec::new()).await,
            success(vec!["start", "a", "b", "end"])
        );
    }

    #[test]
    fn test_composed_debug_lists_inner_names() {
        let composed = compose_middleware([push("a"), push("b")]).named("ab");
        assert_eq!(composed.len(), 2);
        assert_eq!(
            format!("{composed:?}"),
            r#"ComposedMiddleware { name: "ab", links: ["a", "b"] }"#
        );
    }

    #[tokio::test]
    async fn test_empty_composition_passes_through() {
        let composed: ComposedMiddleware<Vec<&'static str>, Vec<&'static str>> =
            compose_middleware(Vec::new());
        assert!(composed.is_empty());

        let action = apply_middleware(echo(), [boxed(composed)]);
        assert_eq!(action.call(vec!["only"]).await, success(vec!["only"]));
    }

    #[tokio::test]
    async fn test_composed_short_circuit_stops_outer_chain() {
        let reached = Arc::new(Mutex::new(false));
        let flag = reached.clone();

        let deny = boxed(FnMiddleware::new(
            "deny",
            |_args: Vec<&'static str>, _next: Next<Vec<&'static str>, Vec<&'static str>>| async {
                ActionResult::error_with_code("stopped", "STOP")
            },
        ));
        let composed = compose_middleware([push("a"), deny]);

        let action = apply_middleware(
            action_fn(move |args: Vec<&'static str>| {
                *flag.lock() = true;
                async move { success(args) }
            }),
            [boxed(composed), push("after")],
        );

        let result = action.call(Vec::new()).await;
        assert_eq!(result.code(), Some("STOP"));
        assert!(!*reached.lock());
    }
}
