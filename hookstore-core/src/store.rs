//! Named state store with reducer and listener fan-out

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use parking_lot::ReentrantMutex;

use crate::callbacks::{CallbackRegistry, Slot, SlotFn, Subscriber, SubscriberFn};
use crate::config::RegistryConfig;

/// A reducer computing the next state from the previous state and an action
///
/// The reducer may read its own store (it sees the state it is reducing) but
/// must not update it.
pub type ReducerFn<S, A> = dyn Fn(&S, &A) -> S + Send + Sync;

/// How a store's state is updated, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreMode {
    /// The action replaces the state verbatim
    Direct,
    /// The action is fed through a reducer
    Reducer,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Direct => f.write_str("direct"),
            StoreMode::Reducer => f.write_str("reducer"),
        }
    }
}

/// What happened during one `set_state` pass, reported to middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Component slots notified
    pub component_slots: usize,
    /// Subscribers notified
    pub subscribers: usize,
}

/// A named state container
///
/// Owns the current state, the reducer, and two callback registries: the
/// component-bound slots of mounted bindings and the independent subscribers.
///
/// # Type Parameters
/// * `S` - The state type
/// * `A` - The action type (the state type itself for direct-update stores)
///
/// # Example
/// ```
/// use hookstore_core::Store;
///
/// let store = Store::with_reducer("counter", 0, |state: &i32, action: &i32| state + action);
/// store.set_state(5);
/// store.set_state(3);
/// assert_eq!(store.get_state(), 8);
/// ```
pub struct Store<S, A = S> {
    name: String,
    mode: StoreMode,
    state: RwLock<Arc<S>>,
    /// Held for a whole update pass; re-entrant so listeners can update the
    /// same store from the notifying thread
    update_lock: ReentrantMutex<()>,
    reducer: Box<ReducerFn<S, A>>,
    component_slots: CallbackRegistry<SlotFn<S>>,
    subscribers: CallbackRegistry<SubscriberFn<S, A>>,
    middleware: Arc<dyn Middleware>,
}

impl<S, A> Store<S, A> {
    /// The store's unique name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The update mode chosen at creation
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Register a component-bound update slot
    ///
    /// Returns `false` if the slot was already registered.
    pub fn add_component_slot(&self, slot: Slot<S>) -> bool {
        self.component_slots.add(slot)
    }

    /// Deregister a component-bound update slot
    pub fn remove_component_slot(&self, slot: &Slot<S>) -> bool {
        self.component_slots.remove(slot)
    }

    /// Whether the slot is currently registered
    pub fn has_component_slot(&self, slot: &Slot<S>) -> bool {
        self.component_slots.contains(slot)
    }

    /// Number of mounted component slots
    pub fn component_slot_count(&self) -> usize {
        self.component_slots.len()
    }

    /// Number of independent subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<S> Store<S, S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create a direct-update store: every action becomes the new state
    pub fn direct(name: impl Into<String>, initial: S) -> Self {
        Self::build(
            name.into(),
            StoreMode::Direct,
            initial,
            Box::new(|_: &S, action: &S| action.clone()),
        )
    }
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    /// Create a reducer store
    pub fn with_reducer<R>(name: impl Into<String>, initial: S, reducer: R) -> Self
    where
        R: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        Self::build(name.into(), StoreMode::Reducer, initial, Box::new(reducer))
    }

    fn build(name: String, mode: StoreMode, initial: S, reducer: Box<ReducerFn<S, A>>) -> Self {
        Self {
            name,
            mode,
            state: RwLock::new(Arc::new(initial)),
            update_lock: ReentrantMutex::new(()),
            reducer,
            component_slots: CallbackRegistry::new(),
            subscribers: CallbackRegistry::new(),
            middleware: Arc::new(NoopMiddleware),
        }
    }

    /// Replace the middleware observing this store's updates
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware = middleware;
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Arc<S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Arc<S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared pointer to the current state, without cloning it
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&*self.read_state())
    }

    /// Read the current state through a closure
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.snapshot();
        f(state.as_ref())
    }

    /// Compute the next state and notify every listener
    ///
    /// Component slots run first with the new state, then subscribers with
    /// the new state and the action. Listeners run synchronously in
    /// registration order; a panicking listener aborts the rest of the pass.
    ///
    /// Updates of one store are serialized: a `set_state` from another thread
    /// waits until the running pass has notified everyone. A listener calling
    /// `set_state` on the same store from the notifying thread runs its update
    /// to completion immediately, nested inside the current pass.
    pub fn set_state(&self, action: A) {
        self.update(action, None::<fn(&S)>);
    }

    /// Like [`set_state`](Self::set_state), then call `completion` with the new state
    pub fn set_state_then<F>(&self, action: A, completion: F)
    where
        F: FnOnce(&S),
    {
        self.update(action, Some(completion));
    }

    fn update<F>(&self, action: A, completion: Option<F>)
    where
        F: FnOnce(&S),
    {
        let _pass = self.update_lock.lock();
        self.middleware.before(&self.name, self.mode);

        let current = self.snapshot();
        let new_state = Arc::new((self.reducer)(current.as_ref(), &action));
        drop(current);
        *self.write_state() = Arc::clone(&new_state);

        let state: &S = &new_state;

        let slots = self.component_slots.snapshot();
        for slot in &slots {
            slot(state);
        }

        // Snapshot after the slots ran so subscribers added by a slot see this update
        let subscribers = self.subscribers.snapshot();
        for subscriber in &subscribers {
            subscriber(state, &action);
        }

        if let Some(completion) = completion {
            completion(state);
        }

        self.middleware.after(
            &self.name,
            UpdateSummary {
                component_slots: slots.len(),
                subscribers: subscribers.len(),
            },
        );
    }

    /// Register an independent subscriber
    ///
    /// Returns `None` and logs a warning if this exact callback is already
    /// subscribed; no second registration takes place.
    pub fn subscribe(self: &Arc<Self>, callback: Subscriber<S, A>) -> Option<Subscription> {
        if !self.subscribers.add(Arc::clone(&callback)) {
            tracing::warn!(
                store = %self.name,
                "This callback is already subscribed to this store, skipping subscription"
            );
            return None;
        }

        let store: Weak<Self> = Arc::downgrade(self);
        let active = {
            let store = store.clone();
            let callback = Arc::clone(&callback);
            move || {
                store
                    .upgrade()
                    .is_some_and(|store| store.subscribers.contains(&callback))
            }
        };
        let cancel = move || {
            store
                .upgrade()
                .is_some_and(|store| store.subscribers.remove(&callback))
        };
        Some(Subscription::new(self.name.clone(), cancel, active))
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Clone of the current state, without subscribing to anything
    pub fn get_state(&self) -> S {
        (*self.snapshot()).clone()
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("component_slots", &self.component_slots)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

type SubscriptionFn = dyn Fn() -> bool + Send + Sync;

/// Cancellation handle returned by `subscribe`
///
/// Dropping it does not unsubscribe; call [`cancel`](Self::cancel).
#[derive(Clone)]
pub struct Subscription {
    store: String,
    cancel: Arc<SubscriptionFn>,
    active: Arc<SubscriptionFn>,
}

impl Subscription {
    fn new<C, P>(store: String, cancel: C, active: P) -> Self
    where
        C: Fn() -> bool + Send + Sync + 'static,
        P: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            store,
            cancel: Arc::new(cancel),
            active: Arc::new(active),
        }
    }

    /// Name of the store this subscription belongs to
    pub fn store_name(&self) -> &str {
        &self.store
    }

    /// Remove the subscribed callback
    ///
    /// Returns `true` if this call removed it. Calling again is a no-op.
    pub fn cancel(&self) -> bool {
        (self.cancel)()
    }

    /// Whether the callback is still subscribed
    ///
    /// `false` once cancelled or once the store is gone.
    pub fn is_active(&self) -> bool {
        (self.active)()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Middleware trait for observing store updates
///
/// Implement this trait to add logging, metrics, or other cross-cutting
/// concerns to every store of a registry.
pub trait Middleware: Send + Sync {
    /// Called before the reducer runs
    fn before(&self, store: &str, mode: StoreMode);

    /// Called after every listener was notified
    fn after(&self, store: &str, summary: UpdateSummary);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl Middleware for NoopMiddleware {
    fn before(&self, _store: &str, _mode: StoreMode) {}
    fn after(&self, _store: &str, _summary: UpdateSummary) {}
}

/// Middleware that traces store updates, filtered by [`RegistryConfig`]
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    config: RegistryConfig,
    /// Whether to log before the reducer runs
    pub log_before: bool,
}

impl LoggingMiddleware {
    /// Log completed updates of the stores the config selects
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            log_before: false,
        }
    }

    /// Log both before and after each update
    pub fn verbose(config: RegistryConfig) -> Self {
        Self {
            config,
            log_before: true,
        }
    }

    /// The filter config
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Middleware for LoggingMiddleware {
    fn before(&self, store: &str, mode: StoreMode) {
        if self.log_before && self.config.should_trace(store) {
            tracing::debug!(store = %store, mode = %mode, "Updating store");
        }
    }

    fn after(&self, store: &str, summary: UpdateSummary) {
        if self.config.should_trace(store) {
            tracing::debug!(
                store = %store,
                component_slots = summary.component_slots,
                subscribers = summary.subscribers,
                "Store updated"
            );
        }
    }
}

/// Compose multiple middleware into a single middleware
#[derive(Default)]
pub struct ComposedMiddleware {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl fmt::Debug for ComposedMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl ComposedMiddleware {
    /// Create a new composed middleware
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }
}

impl Middleware for ComposedMiddleware {
    fn before(&self, store: &str, mode: StoreMode) {
        for middleware in &self.middlewares {
            middleware.before(store, mode);
        }
    }

    fn after(&self, store: &str, summary: UpdateSummary) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter().rev() {
            middleware.after(store, summary);
        }
    }
}
