//! Free functions over the process-wide registry
//!
//! Each function forwards to [`StoreRegistry::global`]. Libraries and tests
//! should prefer an explicit [`StoreRegistry`]; these exist for application
//! code that shares stores across otherwise unrelated components.
//!
//! ```
//! use hookstore_core::global;
//!
//! global::create_store_with_reducer("doc_visits", 0, |s: &u32, a: &u32| s + a);
//! global::dispatch_directly::<u32, u32>("doc_visits", 2).unwrap();
//! assert_eq!(global::read_only_store::<u32, u32>("doc_visits").unwrap(), 2);
//! ```

use crate::component::{Component, ComponentBinding};
use crate::error::Result;
use crate::handle::{DirectHandle, ReducerHandle, StoreHandle, StoreId};
use crate::registry::StoreRegistry;

/// Create a direct-update store in the global registry
pub fn create_store<S>(name: impl Into<String>, initial: S) -> Option<DirectHandle<S>>
where
    S: Clone + Send + Sync + 'static,
{
    StoreRegistry::global().create(name, initial)
}

/// Create a reducer store in the global registry
pub fn create_store_with_reducer<S, A, R>(
    name: impl Into<String>,
    initial: S,
    reducer: R,
) -> Option<ReducerHandle<S, A>>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
    R: Fn(&S, &A) -> S + Send + Sync + 'static,
{
    StoreRegistry::global().create_with_reducer(name, initial, reducer)
}

pub fn get_store_by_name<S, A>(name: &str) -> Result<StoreHandle<S, A>>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    StoreRegistry::global().get_store_by_name(name)
}

pub fn use_store<'a, S, A, C>(
    id: impl Into<StoreId<'a>>,
    component: C,
) -> Result<ComponentBinding<S, A>>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
    C: Component<S>,
{
    StoreRegistry::global().use_store(id, component)
}

pub fn read_only_store<'a, S, A>(id: impl Into<StoreId<'a>>) -> Result<S>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    StoreRegistry::global().read_only_store::<S, A>(id)
}

pub fn dispatch_directly<'a, S, A>(id: impl Into<StoreId<'a>>, action: A) -> Result<()>
where
    S: Send + Sync + 'static,
    A: 'static,
{
    StoreRegistry::global().dispatch_directly::<S, A>(id, action)
}
