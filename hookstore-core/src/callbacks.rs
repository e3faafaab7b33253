//! Ordered, identity-deduplicated callback collections
//!
//! Each store owns two of these: one for component-bound update slots and one
//! for independent subscribers. Callbacks are compared by `Arc` identity, so
//! registering the same `Arc` twice is a no-op while two separately allocated
//! closures with identical code are distinct entries.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked with the latest state (component-bound slots)
pub type SlotFn<S> = dyn Fn(&S) + Send + Sync;

/// Callback invoked with the latest state and the action that produced it
pub type SubscriberFn<S, A> = dyn Fn(&S, &A) + Send + Sync;

/// Shared handle to a component-bound slot
pub type Slot<S> = Arc<SlotFn<S>>;

/// Shared handle to a subscriber callback
pub type Subscriber<S, A> = Arc<SubscriberFn<S, A>>;

/// Compare two callbacks by the address of their allocation, ignoring vtables
pub(crate) fn same_callback<F: ?Sized>(a: &Arc<F>, b: &Arc<F>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// A registration-ordered set of callbacks
pub struct CallbackRegistry<F: ?Sized> {
    entries: Mutex<Vec<Arc<F>>>,
}

impl<F: ?Sized> CallbackRegistry<F> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Arc<F>>> {
        // A panicking callback never runs under this lock, the Vec stays consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a callback unless it is already registered
    ///
    /// Returns `true` if the callback was added.
    pub fn add(&self, callback: Arc<F>) -> bool {
        let mut entries = self.entries();
        if entries.iter().any(|c| same_callback(c, &callback)) {
            return false;
        }
        entries.push(callback);
        true
    }

    /// Remove a callback by identity
    ///
    /// Returns `true` if it was present. Removing twice is harmless.
    pub fn remove(&self, callback: &Arc<F>) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|c| !same_callback(c, callback));
        entries.len() != before
    }

    /// Whether the callback is currently registered
    pub fn contains(&self, callback: &Arc<F>) -> bool {
        self.entries().iter().any(|c| same_callback(c, callback))
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Copy of the callbacks in registration order
    ///
    /// Notification iterates over a snapshot so callbacks can register or
    /// remove entries while being invoked.
    pub fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries().clone()
    }
}

impl<F: ?Sized> Default for CallbackRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for CallbackRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_add_is_idempotent() {
        let registry: CallbackRegistry<SlotFn<i32>> = CallbackRegistry::new();
        let slot: Slot<i32> = Arc::new(|_| {});

        assert!(registry.add(slot.clone()));
        assert!(!registry.add(slot.clone()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identical_closures_are_distinct() {
        let registry: CallbackRegistry<SlotFn<i32>> = CallbackRegistry::new();
        let a: Slot<i32> = Arc::new(|_| {});
        let b: Slot<i32> = Arc::new(|_| {});

        assert!(registry.add(a));
        assert!(registry.add(b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_by_identity() {
        let registry: CallbackRegistry<SlotFn<i32>> = CallbackRegistry::new();
        let a: Slot<i32> = Arc::new(|_| {});
        let b: Slot<i32> = Arc::new(|_| {});
        registry.add(a.clone());
        registry.add(b.clone());

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert!(!registry.contains(&a));
        assert!(registry.contains(&b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let registry: CallbackRegistry<SlotFn<i32>> = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let order = order.clone();
            registry.add(Arc::new(move |_: &i32| order.lock().unwrap().push(id)));
        }

        for callback in registry.snapshot() {
            callback(&0);
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_snapshot_allows_removal_during_iteration() {
        let registry: Arc<CallbackRegistry<SlotFn<i32>>> = Arc::new(CallbackRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let reg = registry.clone();
        let counter = calls.clone();
        let slot: Slot<i32> = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let to_remove = slot.clone();
        registry.add(Arc::new(move |_: &i32| {
            reg.remove(&to_remove);
        }));
        registry.add(slot);

        for callback in registry.snapshot() {
            callback(&1);
        }
        // The removed slot was part of the snapshot and still ran once
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }
}
