//! hookstore: shared state for UI components without prop drilling
//!
//! Stores are registered by name in a [`StoreRegistry`]. Components bind to a
//! store and re-render on every update; plain functions can read, subscribe
//! and update the same store without a component in sight.
//!
//! # Example
//! ```
//! use hookstore::prelude::*;
//!
//! let registry = StoreRegistry::new();
//! registry.create("user", String::from("a")).unwrap();
//!
//! let binding = registry
//!     .use_store::<String, String, _>("user", |name: &String| println!("render {name}"))
//!     .unwrap();
//! let (name, set_name) = binding.pair();
//! assert_eq!(name, "a");
//!
//! set_name.set_state("b".into());
//! assert_eq!(registry.read_only_store::<String, String>("user").unwrap(), "b");
//! ```

// Re-export everything from core
pub use hookstore_core::*;

/// Prelude for convenient imports
pub mod prelude {
    // Registry and stores
    pub use hookstore_core::{RegistryConfig, Store, StoreError, StoreMode, StoreRegistry};

    // Handles
    pub use hookstore_core::{
        DirectHandle, NamedStore, ReducerHandle, StoreHandle, StoreId, Subscription,
    };

    // Components
    pub use hookstore_core::{Component, ComponentBinding, Updater};

    // Middleware
    pub use hookstore_core::{ComposedMiddleware, LoggingMiddleware, Middleware};

    // Global registry functions
    pub use hookstore_core::global::{
        create_store, create_store_with_reducer, dispatch_directly, get_store_by_name,
        read_only_store, use_store,
    };

    #[cfg(feature = "subscriptions")]
    pub use hookstore_core::Watch;
}
