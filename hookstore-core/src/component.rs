//! Binding between a store and a UI component's update slot
//!
//! The UI framework owns rendering; hookstore only needs a way to tell a
//! mounted component that the state changed. A [`ComponentBinding`] keeps a
//! component-local copy of the state, registers its slot with the store on
//! mount and removes it on unmount (or drop).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hookstore_core::{ComponentBinding, Store};
//!
//! let store = Arc::new(Store::direct("theme", "light".to_string()));
//! let binding = ComponentBinding::new(store.clone(), |theme: &String| {
//!     println!("re-render with {theme}");
//! });
//! binding.mount();
//!
//! let (theme, updater) = binding.pair();
//! assert_eq!(theme, "light");
//! updater.set_state("dark".to_string());
//! assert_eq!(binding.state(), "dark");
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::callbacks::Slot;
use crate::store::Store;

/// A mounted UI element that re-renders when its store changes
///
/// Implemented for every `Fn(&S)` closure; UI framework adapters implement it
/// on whatever schedules their re-render.
pub trait Component<S>: Send + Sync + 'static {
    /// Called with the latest state after every store update
    fn on_state(&self, state: &S);
}

impl<S, F> Component<S> for F
where
    F: Fn(&S) + Send + Sync + 'static,
{
    fn on_state(&self, state: &S) {
        self(state)
    }
}

/// The raw state mutator handed to components
///
/// Calls the store's `set_state` directly, so it works on direct-update and
/// reducer stores alike.
pub struct Updater<S, A = S> {
    store: Arc<Store<S, A>>,
}

impl<S, A> Updater<S, A>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    /// Run an update with `action`
    pub fn set_state(&self, action: A) {
        self.store.set_state(action);
    }

    /// Run an update, then call `completion` with the new state
    pub fn set_state_then<F: FnOnce(&S)>(&self, action: A, completion: F) {
        self.store.set_state_then(action, completion);
    }
}

impl<S, A> Clone for Updater<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S, A> fmt::Debug for Updater<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Updater").field(&self.store).finish()
    }
}

/// A component's subscription to one store
pub struct ComponentBinding<S, A = S> {
    store: Arc<Store<S, A>>,
    local: Arc<RwLock<S>>,
    slot: Slot<S>,
}

impl<S, A> ComponentBinding<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Bind a component to a store without registering it yet
    ///
    /// The component-local state starts out as the store's current state.
    pub fn new<C: Component<S>>(store: Arc<Store<S, A>>, component: C) -> Self {
        let local = Arc::new(RwLock::new(store.get_state()));
        let slot_local = Arc::clone(&local);
        let slot: Slot<S> = Arc::new(move |state: &S| {
            *slot_local.write().unwrap_or_else(PoisonError::into_inner) = state.clone();
            component.on_state(state);
        });

        Self { store, local, slot }
    }

    /// Register the component's slot with the store
    ///
    /// Returns `false` if it was already registered.
    pub fn mount(&self) -> bool {
        let added = self.store.add_component_slot(Arc::clone(&self.slot));
        if added {
            tracing::trace!(store = %self.store.name(), "Component mounted");
        }
        added
    }

    /// Remove the component's slot from the store
    ///
    /// Returns `false` if it was not registered.
    pub fn unmount(&self) -> bool {
        let removed = self.store.remove_component_slot(&self.slot);
        if removed {
            tracing::trace!(store = %self.store.name(), "Component unmounted");
        }
        removed
    }

    pub fn is_mounted(&self) -> bool {
        self.store.has_component_slot(&self.slot)
    }

    /// The component-local copy of the state
    pub fn state(&self) -> S {
        self.local
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn updater(&self) -> Updater<S, A> {
        Updater {
            store: Arc::clone(&self.store),
        }
    }

    /// `(state, updater)`, what a component consumes on each render
    pub fn pair(&self) -> (S, Updater<S, A>) {
        (self.state(), self.updater())
    }

    pub fn store(&self) -> &Arc<Store<S, A>> {
        &self.store
    }
}

impl<S, A> Drop for ComponentBinding<S, A> {
    fn drop(&mut self) {
        self.store.remove_component_slot(&self.slot);
    }
}

impl<S, A> fmt::Debug for ComponentBinding<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBinding")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
