//! Per-customer cart query state and batch deletion.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cart_manager_core::{Cart, CartId, CartRef, CustomerId};
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{BatchDeleteError, CartBackend, CartQuery};
use crate::commercetools::CommercetoolsError;

/// Point-in-time view of the gateway's query state.
#[derive(Debug, Clone, Default)]
pub struct CartsSnapshot {
    /// Fetched carts; `None` while loading or when the customer has no carts.
    pub carts: Option<Vec<Cart>>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Error of the most recent fetch, if it failed.
    pub error: Option<Arc<CommercetoolsError>>,
}

#[derive(Debug, Default)]
struct QueryState {
    carts: Vec<Cart>,
    error: Option<Arc<CommercetoolsError>>,
}

impl QueryState {
    fn snapshot(&self, loading: bool) -> CartsSnapshot {
        let carts = (!loading && !self.carts.is_empty()).then(|| self.carts.clone());
        CartsSnapshot {
            carts,
            loading,
            error: self.error.clone(),
        }
    }
}

/// Marks fetch `sequence` finished when dropped, including when the fetch
/// future itself is dropped before completing.
struct InFlight<'a> {
    finished: &'a AtomicU64,
    sequence: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.finished.fetch_max(self.sequence, Ordering::SeqCst);
    }
}

/// Cart listing and deletion for a single customer.
///
/// Every fetch takes a sequence number; a response is applied only if no
/// newer fetch was issued in the meantime, so a slow response cannot
/// overwrite a fresher one.
pub struct CartGateway<B> {
    backend: Arc<B>,
    customer_id: CustomerId,
    query: CartQuery,
    state: RwLock<QueryState>,
    issued: AtomicU64,
    finished: AtomicU64,
}

impl<B: CartBackend> CartGateway<B> {
    /// Create a gateway for `customer_id`. Nothing is fetched until
    /// [`refetch`](Self::refetch) is called.
    #[must_use]
    pub fn new(backend: Arc<B>, customer_id: CustomerId, page_size: u32, locale: &str) -> Self {
        let query = CartQuery::for_customer(&customer_id, page_size, locale);
        Self {
            backend,
            customer_id,
            query,
            state: RwLock::new(QueryState::default()),
            issued: AtomicU64::new(0),
            finished: AtomicU64::new(0),
        }
    }

    /// The customer whose carts this gateway lists.
    #[must_use]
    pub const fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// The listing request sent on every fetch.
    #[must_use]
    pub const fn query(&self) -> &CartQuery {
        &self.query
    }

    /// Fetched carts, or `None` while loading or when there are none.
    pub async fn carts(&self) -> Option<Vec<Cart>> {
        self.snapshot().await.carts
    }

    /// Whether the most recently issued fetch is still in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.finished.load(Ordering::SeqCst) < self.issued.load(Ordering::SeqCst)
    }

    /// Error of the most recent applied fetch.
    pub async fn error(&self) -> Option<Arc<CommercetoolsError>> {
        self.state.read().await.error.clone()
    }

    /// Current query state.
    pub async fn snapshot(&self) -> CartsSnapshot {
        self.state.read().await.snapshot(self.loading())
    }

    /// Fetch the customer's carts and return the resulting state.
    ///
    /// A failed fetch records the error and keeps the previously fetched carts.
    #[instrument(skip(self), fields(customer_id = %self.customer_id))]
    pub async fn refetch(&self) -> CartsSnapshot {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let in_flight = InFlight {
            finished: &self.finished,
            sequence,
        };

        let result = self.backend.fetch_carts(&self.query).await;

        let mut state = self.state.write().await;
        drop(in_flight);
        if sequence < self.issued.load(Ordering::SeqCst) {
            debug!(sequence, "Discarding superseded cart response");
            return state.snapshot(self.loading());
        }

        match result {
            Ok(carts) => {
                debug!(count = carts.len(), "Carts fetched");
                state.carts = carts;
                state.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch carts");
                state.error = Some(Arc::new(e));
            }
        }
        state.snapshot(self.loading())
    }

    /// Delete `carts` concurrently, each keyed on its `(id, version)`.
    ///
    /// All deletes are awaited and the list is refetched before the outcome is
    /// returned, whether or not any delete failed. Deleted carts are dropped
    /// from the list first, so they stay gone if the refetch fails; the
    /// refetch error is then available from [`error`](Self::error).
    ///
    /// # Errors
    ///
    /// Returns [`BatchDeleteError`] if any delete was rejected.
    #[instrument(skip(self, carts), fields(customer_id = %self.customer_id, count = carts.len()))]
    pub async fn remove_carts(&self, carts: &[Cart]) -> Result<Vec<CartRef>, BatchDeleteError> {
        let outcomes = join_all(
            carts
                .iter()
                .map(|cart| self.backend.delete_cart(&cart.id, cart.version)),
        )
        .await;

        {
            let removed: HashSet<&CartId> = outcomes
                .iter()
                .filter_map(|outcome| outcome.as_ref().ok().map(|cart| &cart.id))
                .collect();
            if !removed.is_empty() {
                self.state
                    .write()
                    .await
                    .carts
                    .retain(|cart| !removed.contains(&cart.id));
            }
        }

        self.refetch().await;

        let attempted = outcomes.len();
        let mut deleted = Vec::with_capacity(attempted);
        let mut failed = 0;
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(cart) => deleted.push(cart),
                Err(e) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            None => {
                info!(deleted = deleted.len(), "Carts deleted");
                Ok(deleted)
            }
            Some(source) => {
                warn!(failed, attempted, error = %source, "Batch cart delete failed");
                Err(BatchDeleteError {
                    failed,
                    attempted,
                    source,
                })
            }
        }
    }
}
