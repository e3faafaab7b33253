//! Test utilities for code built on hookstore
//!
//! - [`Recorder`]: captures notifications from subscribers, component slots
//!   or completion callbacks so tests can assert on them afterwards
//! - [`assert_recorded!`](crate::assert_recorded) /
//!   [`assert_not_recorded!`](crate::assert_not_recorded): pattern assertions
//!   over drained notifications
//!
//! # Example
//!
//! ```
//! use hookstore_core::testing::Recorder;
//! use hookstore_core::StoreRegistry;
//!
//! let registry = StoreRegistry::new();
//! let counter = registry
//!     .create_with_reducer("counter", 0, |s: &i32, a: &i32| s + a)
//!     .unwrap();
//!
//! let mut recorder = Recorder::<(i32, i32)>::new();
//! counter.subscribe(recorder.subscriber());
//! counter.dispatch(5);
//! counter.dispatch(3);
//!
//! assert_eq!(recorder.drain(), vec![(5, 5), (8, 3)]);
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::callbacks::{Slot, Subscriber};

/// Captures values pushed from store callbacks
///
/// Backed by an unbounded channel, so the callbacks it hands out are
/// `Send + Sync` and never block.
pub struct Recorder<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T: Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a clone of the sender for custom callbacks
    pub fn sender(&self) -> mpsc::UnboundedSender<T> {
        self.tx.clone()
    }

    /// Record a value by hand
    pub fn record(&self, item: T) {
        let _ = self.tx.send(item);
    }

    /// Drain everything recorded so far, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            items.push(item);
        }
        items
    }

    /// Check if anything was recorded (drains)
    pub fn has_recorded(&mut self) -> bool {
        !self.drain().is_empty()
    }
}

impl<T: Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + 'static> Recorder<S> {
    /// A component slot that records every state it is called with
    pub fn slot(&self) -> Slot<S> {
        let tx = self.tx.clone();
        Arc::new(move |state: &S| {
            let _ = tx.send(state.clone());
        })
    }

    /// A component that records every state it re-renders with
    pub fn component(&self) -> impl Fn(&S) + Send + Sync + 'static {
        let tx = self.tx.clone();
        move |state: &S| {
            let _ = tx.send(state.clone());
        }
    }
}

impl<S, A> Recorder<(S, A)>
where
    S: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    /// A subscriber that records every `(state, action)` pair
    pub fn subscriber(&self) -> Subscriber<S, A> {
        let tx = self.tx.clone();
        Arc::new(move |state: &S, action: &A| {
            let _ = tx.send((state.clone(), action.clone()));
        })
    }
}

/// Assert that a recorded notification matches a pattern.
///
/// # Example
///
/// ```ignore
/// let updates = recorder.drain();
/// assert_recorded!(updates, (8, 3));
/// assert_recorded!(updates, (s, _) if s > 5);
/// ```
#[macro_export]
macro_rules! assert_recorded {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $items.iter().any(|i| matches!(i, $pattern $(if $guard)?)),
            "Expected a notification matching `{}`, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

/// Assert that no recorded notification matches a pattern.
#[macro_export]
macro_rules! assert_not_recorded {
    ($items:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$items.iter().any(|i| matches!(i, $pattern $(if $guard)?)),
            "Expected no notification matching `{}`, but got: {:?}",
            stringify!($pattern),
            $items
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_record_and_drain() {
        let mut recorder = Recorder::new();
        recorder.record(1);
        recorder.record(2);

        assert_eq!(recorder.drain(), vec![1, 2]);
        assert!(recorder.drain().is_empty());
        assert!(!recorder.has_recorded());
    }

    #[test]
    fn test_slot_and_component_record_states() {
        let store = Arc::new(Store::direct("n", 0));
        let mut recorder = Recorder::<i32>::new();
        store.add_component_slot(recorder.slot());
        let component = recorder.component();

        store.set_state(4);
        component(&9);

        assert_eq!(recorder.drain(), vec![4, 9]);
    }

    #[test]
    fn test_assertion_macros() {
        let store = Arc::new(Store::with_reducer("sum", 0, |s: &i32, a: &i32| s + a));
        let mut recorder = Recorder::<(i32, i32)>::new();
        store.subscribe(recorder.subscriber());

        store.set_state(2);
        store.set_state(5);

        let updates = recorder.drain();
        crate::assert_recorded!(updates, (7, 5));
        crate::assert_recorded!(updates, (s, _) if *s == 2);
        crate::assert_not_recorded!(updates, (0, _));
    }
}
