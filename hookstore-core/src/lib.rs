//! Core types for hookstore
//!
//! This crate provides a process-wide registry of named stores with
//! publish/subscribe notification, letting independent UI components share
//! mutable state without passing it down a component tree.
//!
//! # Core Concepts
//!
//! - **Store**: owns one named state value, a reducer, and two callback registries
//! - **StoreRegistry**: maps names to stores and enforces name uniqueness
//! - **Handles**: capability-restricted facades, one mutator per store mode
//! - **ComponentBinding**: registers a component's update slot on mount and
//!   removes it on unmount
//!
//! # Basic Example
//!
//! ```
//! use std::sync::Arc;
//! use hookstore_core::StoreRegistry;
//!
//! let registry = StoreRegistry::new();
//! let counter = registry
//!     .create_with_reducer("counter", 0, |state: &i32, action: &i32| state + action)
//!     .expect("name is free");
//!
//! let cancel = counter
//!     .subscribe(Arc::new(|state: &i32, action: &i32| {
//!         println!("counter is {state} after +{action}");
//!     }))
//!     .expect("first subscription");
//!
//! counter.dispatch(5);
//! counter.dispatch(3);
//! assert_eq!(registry.read_only_store::<i32, i32>("counter").unwrap(), 8);
//!
//! cancel.cancel();
//! ```
//!
//! # Update Order
//!
//! Every `set_state` computes the new state, stores it, then notifies
//! component slots (with the state), then subscribers (with the state and
//! the action), then the optional completion callback. All of it happens
//! synchronously on the caller's thread.
//!
//! Updates of one store never overlap: a `set_state` from another thread
//! waits for the running pass to finish.

pub mod callbacks;
pub mod component;
pub mod config;
pub mod error;
pub mod global;
pub mod handle;
pub mod registry;
pub mod store;
#[cfg(feature = "subscriptions")]
pub mod stream;
pub mod testing;

// Callback exports
pub use callbacks::{CallbackRegistry, Slot, SlotFn, Subscriber, SubscriberFn};

// Store exports
pub use store::{
    ComposedMiddleware, LoggingMiddleware, Middleware, NoopMiddleware, ReducerFn, Store,
    StoreMode, Subscription, UpdateSummary,
};

// Handle exports
pub use handle::{DirectHandle, NamedStore, ReducerHandle, StoreHandle, StoreId};

// Registry exports
pub use config::RegistryConfig;
pub use error::{Result, StoreError};
pub use registry::StoreRegistry;

// Component exports
pub use component::{Component, ComponentBinding, Updater};

// Stream exports (requires "subscriptions" feature)
#[cfg(feature = "subscriptions")]
pub use stream::Watch;

// Testing exports
pub use testing::Recorder;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::component::{Component, ComponentBinding, Updater};
    pub use crate::config::RegistryConfig;
    pub use crate::error::{Result, StoreError};
    pub use crate::handle::{DirectHandle, NamedStore, ReducerHandle, StoreHandle, StoreId};
    pub use crate::registry::StoreRegistry;
    pub use crate::store::{Middleware, Store, StoreMode, Subscription};
    #[cfg(feature = "subscriptions")]
    pub use crate::stream::Watch;
}
