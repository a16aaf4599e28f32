//! The action contract.
//!
//! Anything that takes an argument value and eventually produces an
//! [`ActionResult`] is an action. Built actions, closures wrapped with
//! [`action_fn`], and shared handles all satisfy [`ActionFn`], so a state
//! tracker or an outer wrapper can accept any of them interchangeably.

use crate::result::ActionResult;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A callable action: `(args) -> Future<ActionResult<T>>`.
///
/// Multiple positional arguments are expressed as a tuple `Args`.
pub trait ActionFn<Args, T>: Send + Sync {
    /// Invokes the action.
    fn invoke(&self, args: Args) -> BoxFuture<'_, ActionResult<T>>;
}

impl<Args, T, A> ActionFn<Args, T> for Arc<A>
where
    A: ActionFn<Args, T> + ?Sized,
{
    fn invoke(&self, args: Args) -> BoxFuture<'_, ActionResult<T>> {
        (**self).invoke(args)
    }
}

/// An action backed by an async closure.
///
/// Created with [`action_fn`].
#[derive(Clone)]
pub struct FnAction<F> {
    func: F,
}

impl<F> std::fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}

/// Wraps an async closure as an [`ActionFn`].
///
/// # Example
///
/// ```
/// use sextant_core::{action_fn, success, ActionFn, ActionResult};
///
/// # tokio_test_block(async {
/// let double = action_fn(|n: u32| async move { success(n * 2) });
/// assert_eq!(double.invoke(21).await, success(42));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub fn action_fn<Args, T, F, Fut>(func: F) -> FnAction<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
{
    FnAction { func }
}

impl<Args, T, F, Fut> ActionFn<Args, T> for FnAction<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = ActionResult<T>> + Send + 'static,
{
    fn invoke(&self, args: Args) -> BoxFuture<'_, ActionResult<T>> {
        Box::pin((self.func)(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{error_with_code, success};

    #[tokio::test]
    async fn test_fn_action_invokes_closure() {
        let action = action_fn(|name: String| async move { success(format!("hello {name}")) });
        let result = action.invoke("ada".to_string()).await;
        assert_eq!(result, success("hello ada".to_string()));
    }

    #[tokio::test]
    async fn test_shared_action_delegates() {
        let action: Arc<dyn ActionFn<u8, u8>> =
            Arc::new(action_fn(|_n: u8| async { error_with_code("nope", "E") }));
        let result = action.invoke(1).await;
        assert_eq!(result.code(), Some("E"));
    }
}
