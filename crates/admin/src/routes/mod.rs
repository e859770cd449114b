//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                         - Health check
//!
//! # Carts
//! GET  /customers/{customer_id}/carts                  - Refetch and render the carts table
//! POST /customers/{customer_id}/carts/selection        - Change row selection
//! POST /customers/{customer_id}/carts/delete           - Delete the selected carts
//! GET  /customers/{customer_id}/carts/by-id/{cart_id}  - Open one cart
//!
//! # API
//! GET  /api/preferences/table/{table_id}               - Current table settings
//! POST /api/preferences/table/{table_id}               - Apply a settings update
//! ```

pub mod api;
pub mod carts;

use axum::{Router, routing::get};

use crate::carts::CartBackend;
use crate::state::AppState;

/// Build the complete router.
pub fn routes<B: CartBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/health", get(health))
        .merge(carts::router::<B>())
        .merge(api::router::<B>())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the platform.
pub async fn health() -> &'static str {
    "ok"
}
