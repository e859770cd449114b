//! Application state shared across handlers.
//!
//! Table settings are process wide. Each customer gets a [`CartSession`]
//! (gateway plus table selection) on first access; a session sits behind
//! its own mutex so requests for one customer are applied in order.

use std::collections::HashMap;
use std::sync::Arc;

use cart_manager_core::{CartRef, CustomerId};
use tokio::sync::{Mutex, RwLock};

use crate::carts::{CartBackend, CartGateway};
use crate::components::{CartsTable, DataTableConfig, TableSettings, TableView, carts_table_config};
use crate::error::AppError;
use crate::messages::Messages;

/// Carts and selection state for one customer.
pub struct CartSession<B> {
    gateway: CartGateway<B>,
    table: CartsTable,
}

impl<B: CartBackend> CartSession<B> {
    fn new(gateway: CartGateway<B>) -> Self {
        let customer_id = gateway.customer_id().clone();
        let mut table = CartsTable::default();

        let selection_customer = customer_id.clone();
        table
            .selection_mut()
            .on_selection_change(move |selected| {
                tracing::debug!(
                    customer_id = %selection_customer,
                    selected = selected.len(),
                    "Cart selection changed"
                );
            });
        table.on_open_cart(move |cart| {
            tracing::info!(customer_id = %customer_id, cart_id = %cart.id, "Cart opened");
        });

        Self { gateway, table }
    }

    #[must_use]
    pub const fn gateway(&self) -> &CartGateway<B> {
        &self.gateway
    }

    #[must_use]
    pub const fn table(&self) -> &CartsTable {
        &self.table
    }

    pub const fn table_mut(&mut self) -> &mut CartsTable {
        &mut self.table
    }

    /// Refetch the customer's carts into the table.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Fetch`] if the fetch failed; the table keeps the
    /// previously fetched carts.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let snapshot = self.gateway.refetch().await;
        self.table.set_carts(snapshot.carts.unwrap_or_default());
        match snapshot.error {
            Some(error) => Err(AppError::Fetch(error)),
            None => Ok(()),
        }
    }

    /// Delete every selected cart, then reload the table.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if nothing is selected,
    /// [`AppError::BatchDelete`] if any delete was rejected and
    /// [`AppError::Fetch`] if every delete succeeded but the reload failed.
    /// Deleted carts leave the table in all of these cases.
    pub async fn delete_selected(&mut self) -> Result<Vec<CartRef>, AppError> {
        let selected: Vec<_> = self
            .table
            .selection()
            .selected_rows()
            .into_iter()
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(AppError::BadRequest("No carts selected".to_string()));
        }

        let outcome = self.gateway.remove_carts(&selected).await;
        let snapshot = self.gateway.snapshot().await;
        self.table.set_carts(snapshot.carts.unwrap_or_default());

        let deleted = outcome?;
        match snapshot.error {
            Some(error) => Err(AppError::Fetch(error)),
            None => Ok(deleted),
        }
    }
}

/// Application state shared across all handlers.
pub struct AppState<B> {
    inner: Arc<AppStateInner<B>>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<B> {
    backend: Arc<B>,
    locale: String,
    page_size: u32,
    messages: Arc<dyn Messages>,
    table_config: DataTableConfig,
    settings: RwLock<TableSettings>,
    sessions: RwLock<HashMap<CustomerId, Arc<Mutex<CartSession<B>>>>>,
}

impl<B: CartBackend> AppState<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, messages: Arc<dyn Messages>, locale: &str, page_size: u32) -> Self {
        let table_config = carts_table_config(messages.as_ref());
        let settings = TableSettings::new(&table_config);
        Self {
            inner: Arc::new(AppStateInner {
                backend,
                locale: locale.to_string(),
                page_size,
                messages,
                table_config,
                settings: RwLock::new(settings),
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.inner.locale
    }

    #[must_use]
    pub fn messages(&self) -> &dyn Messages {
        self.inner.messages.as_ref()
    }

    #[must_use]
    pub fn table_config(&self) -> &DataTableConfig {
        &self.inner.table_config
    }

    #[must_use]
    pub fn settings(&self) -> &RwLock<TableSettings> {
        &self.inner.settings
    }

    /// The session for `customer_id`, created empty on first use.
    pub async fn session(&self, customer_id: &CustomerId) -> Arc<Mutex<CartSession<B>>> {
        if let Some(session) = self.inner.sessions.read().await.get(customer_id) {
            return Arc::clone(session);
        }

        let mut sessions = self.inner.sessions.write().await;
        let session = sessions.entry(customer_id.clone()).or_insert_with(|| {
            let gateway = CartGateway::new(
                Arc::clone(&self.inner.backend),
                customer_id.clone(),
                self.inner.page_size,
                &self.inner.locale,
            );
            Arc::new(Mutex::new(CartSession::new(gateway)))
        });
        Arc::clone(session)
    }

    /// Render `session`'s table with the current settings.
    pub async fn table_view(&self, session: &CartSession<B>) -> TableView {
        let settings = self.inner.settings.read().await;
        session
            .table()
            .view(&settings, &self.inner.table_config, &self.inner.locale)
    }
}
