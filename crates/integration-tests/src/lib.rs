//! Integration test support for the cart manager.
//!
//! Tests drive the real admin router in process with [`TestApp`], backed by
//! [`MemoryBackend`] instead of the commercetools platform.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-manager-integration-tests
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use cart_manager_admin::carts::{CartBackend, CartQuery, customer_predicate};
use cart_manager_admin::commercetools::CommercetoolsError;
use cart_manager_admin::messages::{DefaultMessages, Messages};
use cart_manager_admin::state::AppState;
use cart_manager_core::{Address, Cart, CartId, CartRef, CustomerId, LineItem, LineItemId, Money};
use serde_json::Value;
use tower::ServiceExt;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// In-memory cart store standing in for the platform.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    carts: Mutex<Vec<Cart>>,
    stale: Mutex<HashSet<String>>,
    fail_fetch: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryBackend {
    #[must_use]
    pub fn with_carts(carts: Vec<Cart>) -> Self {
        Self {
            carts: Mutex::new(carts),
            ..Self::default()
        }
    }

    /// Make deletes of `id` fail with a version conflict.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn mark_stale(&self, id: &str) {
        self.stale.lock().expect("lock").insert(id.to_string());
    }

    /// Make every subsequent fetch fail.
    pub fn fail_fetches(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Ids of the stored carts.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn cart_ids(&self) -> Vec<String> {
        self.carts
            .lock()
            .expect("lock")
            .iter()
            .map(|cart| cart.id.to_string())
            .collect()
    }
}

impl CartBackend for MemoryBackend {
    async fn fetch_carts(&self, query: &CartQuery) -> Result<Vec<Cart>, CommercetoolsError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(CommercetoolsError::Unauthorized("invalid_token".to_string()));
        }
        let carts = self.carts.lock().expect("lock");
        Ok(carts
            .iter()
            .filter(|cart| {
                cart.customer_id
                    .as_ref()
                    .is_some_and(|id| customer_predicate(id) == query.filter)
            })
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn delete_cart(&self, id: &CartId, version: i64) -> Result<CartRef, CommercetoolsError> {
        if self.stale.lock().expect("lock").contains(id.as_str()) {
            return Err(CommercetoolsError::ConcurrentModification(format!(
                "Object {id} has a different version than expected. Expected: {version}"
            )));
        }
        let mut carts = self.carts.lock().expect("lock");
        let before = carts.len();
        carts.retain(|cart| cart.id != *id || cart.version != version);
        if carts.len() == before {
            return Err(CommercetoolsError::NotFound(id.to_string()));
        }
        Ok(CartRef {
            id: id.clone(),
            version,
        })
    }
}

/// A cart for `customer` with the given quantities and total.
#[must_use]
pub fn cart(id: &str, customer: &str, quantities: &[u64], cent_amount: i64) -> Cart {
    Cart {
        id: CartId::new(id),
        version: 3,
        customer_id: Some(CustomerId::new(customer)),
        line_items: quantities
            .iter()
            .enumerate()
            .map(|(i, &quantity)| LineItem {
                id: LineItemId::new(format!("{id}-li-{i}")),
                product_id: None,
                name: Some(format!("Item {i}")),
                quantity,
            })
            .collect(),
        total_price: Money::new(cent_amount, "EUR", 2),
        shipping_address: None,
        billing_address: Some(Address {
            city: Some("Berlin".to_string()),
            ..Address::default()
        }),
    }
}

/// The admin router over a [`MemoryBackend`].
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    router: Router,
}

impl TestApp {
    #[must_use]
    pub fn new(carts: Vec<Cart>) -> Self {
        Self::with_messages(carts, Arc::new(DefaultMessages))
    }

    #[must_use]
    pub fn with_messages(carts: Vec<Cart>, messages: Arc<dyn Messages>) -> Self {
        let backend = Arc::new(MemoryBackend::with_carts(carts));
        let state = AppState::new(Arc::clone(&backend), messages, "en", 20);
        Self {
            backend,
            router: cart_manager_admin::app(state),
        }
    }

    /// Send a request and return the status with the body parsed as JSON,
    /// or as a JSON string when it is not JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    /// # Panics
    ///
    /// See [`TestApp::request`].
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    /// # Panics
    ///
    /// See [`TestApp::request`].
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}
