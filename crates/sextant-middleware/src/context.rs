//! Per-invocation context.
//!
//! The [`Context`] carries cross-cutting state (the authenticated user, a
//! database handle, request-scoped data) from context-aware middleware to
//! later middleware and the handler. Values are keyed by their Rust type.
//!
//! A fresh, empty context is created for every invocation of an action and
//! dropped when the invocation completes. It is never shared between calls.
//!
//! # Tracked Keys
//!
//! The type parameter `K` is a type-level list of the value types known to
//! be present, built from [`Empty`] and [`And`]. Each
//! [`provide`](Context::provide) prepends the new type to the list, and
//! [`get`](Context::get) only compiles when the requested type is in it:
//!
//! ```text
//! Context<Empty>
//!   └─ provide(User) ──► Context<And<User, Empty>>
//!        └─ provide(Db) ──► Context<And<Db, And<User, Empty>>>
//! ```
//!
//! There is no way to remove a value or to build a non-empty context from
//! scratch, so every key established upstream reaches every consumer
//! downstream.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

/// The empty key list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

/// A key list with `V` prepended to `Rest`.
pub struct And<V, Rest>(PhantomData<fn() -> (V, Rest)>);

/// Index marker: the key is at the head of the list.
pub struct Here;

/// Index marker: the key is somewhere in the tail of the list.
pub struct There<I>(PhantomData<fn() -> I>);

/// Marker for type-level key lists.
pub trait KeyList: 'static {}

impl KeyList for Empty {}

impl<V: 'static, Rest: KeyList> KeyList for And<V, Rest> {}

/// Implemented by key lists that contain `V` at index `I`.
///
/// The index is inferred; callers write `_` for it.
pub trait Contains<V, I> {}

impl<V, Rest> Contains<V, Here> for And<V, Rest> {}

impl<V, Head, Rest, I> Contains<V, There<I>> for And<Head, Rest> where Rest: Contains<V, I> {}

/// Implemented by key lists that contain every key in `Required`.
pub trait ContainsAll<Required, Indices> {}

impl<L> ContainsAll<Empty, Empty> for L {}

impl<L, V, Rest, I, Is> ContainsAll<And<V, Rest>, And<I, Is>> for L where
    L: Contains<V, I> + ContainsAll<Rest, Is>
{
}

/// Marker provided by a middleware that overwrote an existing `V`.
///
/// Declaring `type Provides = Replaced<User>` lets a context-aware
/// middleware swap the user for a new one while `User` stays a single,
/// unambiguous key. See [`Context::overwrite`].
pub struct Replaced<V>(PhantomData<fn() -> V>);

impl<V> Replaced<V> {
    /// Creates the marker.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V> Default for Replaced<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for Replaced<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Replaced")
            .field(&std::any::type_name::<V>())
            .finish()
    }
}

/// Key list of a context whose tracked keys are not statically known.
pub(crate) enum Opaque {}

/// The untyped view of a context passed between links of a chain.
pub(crate) type ErasedContext = Context<Opaque>;

/// A stored context value plus its type name for diagnostics.
struct Entry {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

/// Context accumulated during one action invocation.
///
/// # Example
///
/// ```ignore
/// // Inside a context-aware middleware that requires nothing:
/// let ctx = ctx.provide(User { id: 7 });
/// assert_eq!(ctx.get::<User, _>().id, 7);
/// ```
pub struct Context<K = Empty> {
    values: HashMap<TypeId, Entry>,
    _keys: PhantomData<fn() -> K>,
}

impl Context<Empty> {
    /// Creates the empty seed context for one invocation.
    pub(crate) fn new() -> Self {
        Self {
            values: HashMap::new(),
            _keys: PhantomData,
        }
    }
}

impl<K> Context<K> {
    /// Adds `value`, or overwrites the existing value of the same type.
    ///
    /// Returns the context with `V` added to its tracked keys. Providing a
    /// type that is already tracked lists it twice, after which `get` and
    /// later requirements on it no longer resolve. Use
    /// [`replace`](Self::replace) or [`overwrite`](Self::overwrite) to swap
    /// an existing value.
    pub fn provide<V: Send + Sync + 'static>(mut self, value: V) -> Context<And<V, K>> {
        self.values.insert(
            TypeId::of::<V>(),
            Entry {
                type_name: std::any::type_name::<V>(),
                value: Box::new(value),
            },
        );
        self.retype()
    }

    /// Swaps the tracked value of type `V` for `value`.
    ///
    /// The key list is unchanged.
    #[must_use]
    pub fn replace<V, I>(mut self, value: V) -> Self
    where
        V: Send + Sync + 'static,
        K: Contains<V, I>,
    {
        self.values.insert(
            TypeId::of::<V>(),
            Entry {
                type_name: std::any::type_name::<V>(),
                value: Box::new(value),
            },
        );
        self
    }

    /// Swaps the tracked value of type `V` and records a [`Replaced<V>`].
    ///
    /// This is the context a middleware declaring
    /// `type Provides = Replaced<V>` hands to its continuation.
    pub fn overwrite<V, I>(self, value: V) -> Context<And<Replaced<V>, K>>
    where
        V: Send + Sync + 'static,
        K: Contains<V, I>,
    {
        self.replace(value).provide(Replaced::new())
    }

    /// Returns the value of type `V`.
    ///
    /// Only compiles when `V` is a tracked key, so the lookup cannot miss.
    /// If `V` was provided more than once the index cannot be inferred;
    /// use [`try_get`](Self::try_get) in that case.
    #[must_use]
    pub fn get<V, I>(&self) -> &V
    where
        V: Send + Sync + 'static,
        K: Contains<V, I>,
    {
        self.try_get::<V>()
            .expect("tracked context key is present by construction")
    }

    /// Returns the value of type `V`, if any middleware provided one.
    #[must_use]
    pub fn try_get<V: Send + Sync + 'static>(&self) -> Option<&V> {
        self.values
            .get(&TypeId::of::<V>())
            .and_then(|entry| entry.value.downcast_ref())
    }

    /// Checks whether a value of type `V` is present.
    #[must_use]
    pub fn contains<V: Send + Sync + 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<V>())
    }

    /// Returns the number of distinct values present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been provided yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the type names of the values present, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.values().map(|entry| entry.type_name)
    }

    /// Reinterprets the tracked key list.
    ///
    /// Callers must only narrow to a list the builder has proven is
    /// contained in the real one.
    pub(crate) fn retype<K2>(self) -> Context<K2> {
        Context {
            values: self.values,
            _keys: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for Context<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.type_names().collect();
        names.sort_unstable();
        f.debug_struct("Context").field("values", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Db {
        url: &'static str,
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.len(), 0);
        assert!(ctx.try_get::<User>().is_none());
    }

    #[test]
    fn test_provide_and_get() {
        let ctx = Context::new().provide(User { id: 7 });
        assert_eq!(ctx.get::<User, _>(), &User { id: 7 });
        assert!(ctx.contains::<User>());
    }

    #[test]
    fn test_later_values_keep_earlier_ones() {
        let ctx = Context::new()
            .provide(User { id: 1 })
            .provide(Db { url: "postgres://" });

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get::<User, _>().id, 1);
        assert_eq!(ctx.get::<Db, _>().url, "postgres://");
    }

    #[test]
    fn test_provide_overwrites_same_type() {
        let ctx = Context::new().provide(User { id: 1 }).provide(User { id: 2 });
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.try_get::<User>(), Some(&User { id: 2 }));
    }

    #[test]
    fn test_replace_keeps_key_list() {
        let ctx = Context::new()
            .provide(User { id: 1 })
            .provide(Db { url: "postgres://" })
            .replace(User { id: 2 });

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get::<User, _>().id, 2);
        assert_eq!(ctx.get::<Db, _>().url, "postgres://");
    }

    #[test]
    fn test_overwrite_records_marker() {
        let ctx = Context::new().provide(User { id: 1 }).overwrite(User { id: 5 });
        assert_eq!(ctx.get::<User, _>().id, 5);
        assert!(ctx.contains::<Replaced<User>>());

        let ctx = ctx.overwrite(User { id: 6 });
        assert_eq!(ctx.get::<User, _>().id, 6);
    }

    #[test]
    fn test_retype_keeps_values() {
        let ctx: ErasedContext = Context::new().provide(User { id: 3 }).retype();
        assert_eq!(ctx.try_get::<User>(), Some(&User { id: 3 }));
    }

    #[test]
    fn test_debug_lists_type_names() {
        let ctx = Context::new().provide(User { id: 3 });
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("User"));
    }
}
