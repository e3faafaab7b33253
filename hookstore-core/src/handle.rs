//! Capability-restricted public handles over a store
//!
//! A store created in direct-update mode hands out a [`DirectHandle`], one
//! created with a reducer hands out a [`ReducerHandle`]. Each exposes exactly
//! one mutator. [`StoreHandle`] is the tagged union returned by name lookups;
//! its `set_state`/`dispatch` methods are lenient and degrade to a warning
//! when called on the wrong mode.

use std::fmt;
use std::sync::Arc;

use crate::callbacks::Subscriber;
use crate::store::{Store, StoreMode, Subscription};

/// Anything that names a registered store
pub trait NamedStore {
    /// Name of the underlying store
    fn store_name(&self) -> &str;
}

impl<S, A> NamedStore for Store<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn store_name(&self) -> &str {
        self.name()
    }
}

/// Identifies a store either by name or through a handle
#[derive(Clone, Copy)]
pub enum StoreId<'a> {
    /// Look the store up by its name
    ByName(&'a str),
    /// Look the store up by the name embedded in a handle
    ByHandle(&'a dyn NamedStore),
}

impl<'a> StoreId<'a> {
    /// The store name this identifier resolves through
    pub fn name(&self) -> &'a str {
        match *self {
            StoreId::ByName(name) => name,
            StoreId::ByHandle(handle) => handle.store_name(),
        }
    }
}

impl fmt::Debug for StoreId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreId::ByName(name) => f.debug_tuple("ByName").field(name).finish(),
            StoreId::ByHandle(handle) => f
                .debug_tuple("ByHandle")
                .field(&handle.store_name())
                .finish(),
        }
    }
}

impl<'a> From<&'a str> for StoreId<'a> {
    fn from(name: &'a str) -> Self {
        StoreId::ByName(name)
    }
}

impl<'a> From<&'a String> for StoreId<'a> {
    fn from(name: &'a String) -> Self {
        StoreId::ByName(name.as_str())
    }
}

impl<'a, S, A> From<&'a DirectHandle<S, A>> for StoreId<'a>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn from(handle: &'a DirectHandle<S, A>) -> Self {
        StoreId::ByHandle(handle)
    }
}

impl<'a, S, A> From<&'a ReducerHandle<S, A>> for StoreId<'a>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn from(handle: &'a ReducerHandle<S, A>) -> Self {
        StoreId::ByHandle(handle)
    }
}

impl<'a, S, A> From<&'a StoreHandle<S, A>> for StoreId<'a>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn from(handle: &'a StoreHandle<S, A>) -> Self {
        StoreId::ByHandle(handle)
    }
}

/// Public handle of a direct-update store
pub struct DirectHandle<S, A = S> {
    store: Arc<Store<S, A>>,
}

/// Public handle of a reducer store
pub struct ReducerHandle<S, A> {
    store: Arc<Store<S, A>>,
}

impl<S, A> DirectHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    pub(crate) fn new(store: Arc<Store<S, A>>) -> Self {
        Self { store }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn get_state(&self) -> S {
        self.store.get_state()
    }

    /// Subscribe to every update of the store
    ///
    /// Returns `None` if the callback is already subscribed.
    pub fn subscribe(&self, callback: Subscriber<S, A>) -> Option<Subscription> {
        self.store.subscribe(callback)
    }

    /// Replace the state with `value` and notify listeners
    pub fn set_state(&self, value: A) {
        self.store.set_state(value);
    }

    /// Replace the state, then call `completion` with the new state
    pub fn set_state_then<F: FnOnce(&S)>(&self, value: A, completion: F) {
        self.store.set_state_then(value, completion);
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<Store<S, A>> {
        &self.store
    }
}

impl<S, A> ReducerHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    pub(crate) fn new(store: Arc<Store<S, A>>) -> Self {
        Self { store }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn get_state(&self) -> S {
        self.store.get_state()
    }

    /// Subscribe to every update of the store
    ///
    /// Returns `None` if the callback is already subscribed.
    pub fn subscribe(&self, callback: Subscriber<S, A>) -> Option<Subscription> {
        self.store.subscribe(callback)
    }

    /// Feed `action` through the reducer and notify listeners
    pub fn dispatch(&self, action: A) {
        self.store.set_state(action);
    }

    /// Dispatch, then call `completion` with the new state
    pub fn dispatch_then<F: FnOnce(&S)>(&self, action: A, completion: F) {
        self.store.set_state_then(action, completion);
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<Store<S, A>> {
        &self.store
    }
}

/// Public handle of a store of either mode
pub enum StoreHandle<S, A = S> {
    Direct(DirectHandle<S, A>),
    Reducer(ReducerHandle<S, A>),
}

impl<S, A> StoreHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Wrap a store in the handle variant matching its mode
    pub fn from_store(store: Arc<Store<S, A>>) -> Self {
        match store.mode() {
            StoreMode::Direct => StoreHandle::Direct(DirectHandle::new(store)),
            StoreMode::Reducer => StoreHandle::Reducer(ReducerHandle::new(store)),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<Store<S, A>> {
        match self {
            StoreHandle::Direct(handle) => handle.store(),
            StoreHandle::Reducer(handle) => handle.store(),
        }
    }

    pub fn name(&self) -> &str {
        self.store().name()
    }

    pub fn mode(&self) -> StoreMode {
        self.store().mode()
    }

    pub fn get_state(&self) -> S {
        self.store().get_state()
    }

    /// Subscribe to every update of the store
    ///
    /// Returns `None` if the callback is already subscribed.
    pub fn subscribe(&self, callback: Subscriber<S, A>) -> Option<Subscription> {
        self.store().subscribe(callback)
    }

    /// Replace the state on a direct-update store
    ///
    /// On a reducer store this only logs a warning and leaves the state as is.
    pub fn set_state(&self, value: A) {
        self.set_state_then(value, |_: &S| {});
    }

    /// Replace the state on a direct-update store, then call `completion`
    ///
    /// On a reducer store this only logs a warning; `completion` is not called.
    pub fn set_state_then<F: FnOnce(&S)>(&self, value: A, completion: F) {
        match self {
            StoreHandle::Direct(handle) => handle.set_state_then(value, completion),
            StoreHandle::Reducer(handle) => tracing::warn!(
                store = %handle.name(),
                "Store uses a reducer to handle its state updates, use dispatch instead of set_state"
            ),
        }
    }

    /// Dispatch through the reducer of a reducer store
    ///
    /// On a direct-update store this only logs a warning and leaves the state as is.
    pub fn dispatch(&self, action: A) {
        self.dispatch_then(action, |_: &S| {});
    }

    /// Dispatch through the reducer, then call `completion` with the new state
    ///
    /// On a direct-update store this only logs a warning; `completion` is not
    /// called.
    pub fn dispatch_then<F: FnOnce(&S)>(&self, action: A, completion: F) {
        match self {
            StoreHandle::Reducer(handle) => handle.dispatch_then(action, completion),
            StoreHandle::Direct(handle) => tracing::warn!(
                store = %handle.name(),
                "Store does not use a reducer to handle state updates, use set_state instead of dispatch"
            ),
        }
    }

    pub fn as_direct(&self) -> Option<&DirectHandle<S, A>> {
        match self {
            StoreHandle::Direct(handle) => Some(handle),
            StoreHandle::Reducer(_) => None,
        }
    }

    pub fn as_reducer(&self) -> Option<&ReducerHandle<S, A>> {
        match self {
            StoreHandle::Reducer(handle) => Some(handle),
            StoreHandle::Direct(_) => None,
        }
    }
}

impl<S, A> From<DirectHandle<S, A>> for StoreHandle<S, A> {
    fn from(handle: DirectHandle<S, A>) -> Self {
        StoreHandle::Direct(handle)
    }
}

impl<S, A> From<ReducerHandle<S, A>> for StoreHandle<S, A> {
    fn from(handle: ReducerHandle<S, A>) -> Self {
        StoreHandle::Reducer(handle)
    }
}

impl<S, A> NamedStore for DirectHandle<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn store_name(&self) -> &str {
        self.store.name()
    }
}

impl<S, A> NamedStore for ReducerHandle<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn store_name(&self) -> &str {
        self.store.name()
    }
}

impl<S, A> NamedStore for StoreHandle<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    fn store_name(&self) -> &str {
        match self {
            StoreHandle::Direct(handle) => handle.store_name(),
            StoreHandle::Reducer(handle) => handle.store_name(),
        }
    }
}

impl<S, A> Clone for DirectHandle<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S, A> Clone for ReducerHandle<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S, A> Clone for StoreHandle<S, A> {
    fn clone(&self) -> Self {
        match self {
            StoreHandle::Direct(handle) => StoreHandle::Direct(handle.clone()),
            StoreHandle::Reducer(handle) => StoreHandle::Reducer(handle.clone()),
        }
    }
}

impl<S, A> fmt::Debug for DirectHandle<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DirectHandle").field(&self.store).finish()
    }
}

impl<S, A> fmt::Debug for ReducerHandle<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReducerHandle").field(&self.store).finish()
    }
}

impl<S, A> fmt::Debug for StoreHandle<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreHandle::Direct(handle) => fmt::Debug::fmt(handle, f),
            StoreHandle::Reducer(handle) => fmt::Debug::fmt(handle, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> StoreHandle<i32> {
        StoreHandle::from_store(Arc::new(Store::with_reducer(
            "counter",
            0,
            |s: &i32, a: &i32| s + a,
        )))
    }

    fn title() -> StoreHandle<String> {
        StoreHandle::from_store(Arc::new(Store::direct("title", "a".to_string())))
    }

    #[test]
    fn test_variant_follows_mode() {
        assert!(counter().as_reducer().is_some());
        assert!(counter().as_direct().is_none());
        assert!(title().as_direct().is_some());
        assert_eq!(title().mode(), StoreMode::Direct);
    }

    #[test]
    fn test_set_state_on_reducer_store_is_noop() {
        let handle = counter();
        handle.dispatch(4);
        handle.set_state(100);
        assert_eq!(handle.get_state(), 4);
    }

    #[test]
    fn test_dispatch_on_direct_store_is_noop() {
        let handle = title();
        handle.set_state("b".into());
        handle.dispatch("c".into());
        assert_eq!(handle.get_state(), "b");
    }

    #[test]
    fn test_mode_mismatch_notifies_nobody() {
        let handle = counter();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        handle.subscribe(Arc::new(move |_: &i32, _: &i32| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        handle.set_state(1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_completion_runs_for_matching_mode() {
        let counter = counter();
        let title = title();
        let completed = Arc::new(AtomicUsize::new(0));

        let c = completed.clone();
        counter.dispatch_then(3, move |state| {
            assert_eq!(*state, 3);
            c.fetch_add(1, Ordering::SeqCst);
        });
        let c = completed.clone();
        title.set_state_then("b".into(), move |state| {
            assert_eq!(state, "b");
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_completion_skipped_on_mode_mismatch() {
        let counter = counter();
        let title = title();
        let completed = Arc::new(AtomicUsize::new(0));

        let c = completed.clone();
        counter.set_state_then(10, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let c = completed.clone();
        title.dispatch_then("c".into(), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(counter.get_state(), 0);
        assert_eq!(title.get_state(), "a");
    }

    #[test]
    fn test_typed_handles_share_the_store() {
        let handle = counter();
        let reducer = handle.as_reducer().unwrap().clone();
        reducer.dispatch_then(2, |state| assert_eq!(*state, 2));
        assert_eq!(handle.get_state(), 2);
        assert!(Arc::ptr_eq(handle.store(), reducer.store()));
    }

    #[test]
    fn test_store_id_from_handle_uses_name() {
        let handle = title();
        let id = StoreId::from(&handle);
        assert_eq!(id.name(), "title");
        assert_eq!(StoreId::from("other").name(), "other");
        assert_eq!(format!("{:?}", id), "ByHandle(\"title\")");
    }
}
