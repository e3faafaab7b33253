//! Name-keyed registry of stores
//!
//! The registry is the only way stores get names: it enforces uniqueness at
//! creation and resolves identifiers back to typed stores. Tests construct
//! their own [`StoreRegistry`]; applications that want ambient access use
//! [`StoreRegistry::global`].

use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::component::{Component, ComponentBinding};
use crate::config::RegistryConfig;
use crate::error::{Result, StoreError};
use crate::handle::{DirectHandle, ReducerHandle, StoreHandle, StoreId};
use crate::store::{LoggingMiddleware, Middleware, Store};

type AnyStore = Arc<dyn Any + Send + Sync>;

static GLOBAL: OnceLock<StoreRegistry> = OnceLock::new();

/// Process-wide mapping from store name to store
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, AnyStore>>,
    config: RegistryConfig,
    middleware: Arc<dyn Middleware>,
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreRegistry {
    /// Create an empty registry with the default config
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry whose stores are traced according to `config`
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            middleware: Arc::new(LoggingMiddleware::new(config.clone())),
            config,
        }
    }

    /// Replace the middleware installed on stores created from now on
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = Arc::new(middleware);
        self
    }

    /// The process-wide registry, created with the default config on first use
    pub fn global() -> &'static StoreRegistry {
        GLOBAL.get_or_init(StoreRegistry::new)
    }

    /// Initialize the process-wide registry with `config`
    ///
    /// Returns `false` if the global registry already exists; it is left as is.
    pub fn init_global(config: RegistryConfig) -> bool {
        GLOBAL.set(StoreRegistry::with_config(config)).is_ok()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, AnyStore>> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, AnyStore>> {
        self.stores.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a direct-update store
    ///
    /// Any string is a valid name, the empty string included. Returns `None`
    /// if a store with this name already exists; the existing store is not
    /// touched.
    pub fn create<S>(&self, name: impl Into<String>, initial: S) -> Option<DirectHandle<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.insert(name.into(), |name| Store::direct(name, initial))
            .map(DirectHandle::new)
    }

    /// Create a store whose updates run through `reducer`
    ///
    /// Returns `None` if a store with this name already exists; the existing
    /// store is not touched.
    pub fn create_with_reducer<S, A, R>(
        &self,
        name: impl Into<String>,
        initial: S,
        reducer: R,
    ) -> Option<ReducerHandle<S, A>>
    where
        S: Clone + Send + Sync + 'static,
        A: 'static,
        R: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        self.insert(name.into(), |name| {
            Store::with_reducer(name, initial, reducer)
        })
        .map(ReducerHandle::new)
    }

    fn insert<S, A, F>(&self, name: String, build: F) -> Option<Arc<Store<S, A>>>
    where
        S: Send + Sync + 'static,
        A: 'static,
        F: FnOnce(String) -> Store<S, A>,
    {
        let mut stores = self.write();
        match stores.entry(name) {
            Entry::Occupied(entry) => {
                tracing::debug!(store = %entry.key(), "Store already exists, skipping creation");
                None
            }
            Entry::Vacant(entry) => {
                let store = Arc::new(
                    build(entry.key().clone()).with_middleware(Arc::clone(&self.middleware)),
                );
                tracing::debug!(store = %store.name(), mode = %store.mode(), "Store created");
                entry.insert(Arc::clone(&store) as AnyStore);
                Some(store)
            }
        }
    }

    /// Resolve a store by name or handle
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if no store has that name
    /// - [`StoreError::TypeMismatch`] if the store holds other state/action types
    pub fn resolve<'a, S, A>(&self, id: impl Into<StoreId<'a>>) -> Result<Arc<Store<S, A>>>
    where
        S: Send + Sync + 'static,
        A: 'static,
    {
        let name = id.into().name();
        let store = self
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))?;

        store
            .downcast::<Store<S, A>>()
            .map_err(|_| StoreError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<Store<S, A>>(),
            })
    }

    /// Public handle of the named store
    pub fn get_public_handle<S, A>(&self, name: &str) -> Result<StoreHandle<S, A>>
    where
        S: Clone + Send + Sync + 'static,
        A: 'static,
    {
        self.resolve(name).map(StoreHandle::from_store)
    }

    /// Same as [`get_public_handle`](Self::get_public_handle)
    pub fn get_store_by_name<S, A>(&self, name: &str) -> Result<StoreHandle<S, A>>
    where
        S: Clone + Send + Sync + 'static,
        A: 'static,
    {
        self.get_public_handle(name)
    }

    /// Bind a component to a store and mount it
    ///
    /// The binding unmounts when dropped.
    pub fn use_store<'a, S, A, C>(
        &self,
        id: impl Into<StoreId<'a>>,
        component: C,
    ) -> Result<ComponentBinding<S, A>>
    where
        S: Clone + Send + Sync + 'static,
        A: 'static,
        C: Component<S>,
    {
        let binding = ComponentBinding::new(self.resolve(id)?, component);
        binding.mount();
        Ok(binding)
    }

    /// Current state of a store, without subscribing to it
    pub fn read_only_store<'a, S, A>(&self, id: impl Into<StoreId<'a>>) -> Result<S>
    where
        S: Clone + Send + Sync + 'static,
        A: 'static,
    {
        Ok(self.resolve::<S, A>(id)?.get_state())
    }

    /// Run an update outside of any component
    ///
    /// Uses the store's raw `set_state`, whatever its mode.
    pub fn dispatch_directly<'a, S, A>(&self, id: impl Into<StoreId<'a>>, action: A) -> Result<()>
    where
        S: Send + Sync + 'static,
        A: 'static,
    {
        self.resolve::<S, A>(id)?.set_state(action);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Names of all registered stores, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("stores", &self.names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
