//! Async update streams fed by store subscribers
//!
//! A [`Watch`] is a subscriber that forwards every `(state, action)` pair into
//! a tokio channel and exposes the receiving end as a `Stream`. Dropping the
//! watch cancels the subscription.
//!
//! # Example
//!
//! ```ignore
//! use tokio_stream::StreamExt;
//!
//! let mut updates = handle.watch();
//! while let Some((state, action)) = updates.next().await {
//!     tracing::info!(?state, ?action, "counter changed");
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use crate::handle::{DirectHandle, ReducerHandle, StoreHandle};
use crate::store::{Store, Subscription};

/// Stream of `(state, action)` pairs for every update of one store
pub struct Watch<S, A> {
    store: String,
    inner: UnboundedReceiverStream<(S, A)>,
    subscription: Option<Subscription>,
}

impl<S, A> Watch<S, A> {
    /// Name of the watched store
    pub fn store_name(&self) -> &str {
        &self.store
    }
}

impl<S, A> Stream for Watch<S, A> {
    type Item = (S, A);

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<S, A> Drop for Watch<S, A> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
{
    /// Stream every subsequent update of this store
    pub fn watch(self: &Arc<Self>) -> Watch<S, A> {
        let (tx, rx) = mpsc::unbounded_channel();
        // A freshly allocated callback is never a duplicate, so this is always Some
        let subscription = self.subscribe(Arc::new(move |state: &S, action: &A| {
            // The receiver only goes away together with the subscription
            let _ = tx.send((state.clone(), action.clone()));
        }));

        Watch {
            store: self.name().to_string(),
            inner: UnboundedReceiverStream::new(rx),
            subscription,
        }
    }
}

impl<S, A> DirectHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
{
    pub fn watch(&self) -> Watch<S, A> {
        self.store().watch()
    }
}

impl<S, A> ReducerHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
{
    pub fn watch(&self) -> Watch<S, A> {
        self.store().watch()
    }
}

impl<S, A> StoreHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
{
    pub fn watch(&self) -> Watch<S, A> {
        self.store().watch()
    }
}
