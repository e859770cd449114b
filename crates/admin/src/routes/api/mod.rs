//! API route handlers for admin.
//!
//! JSON API endpoints for table preferences.

pub mod preferences;

use axum::Router;

use crate::carts::CartBackend;
use crate::state::AppState;

/// Build the complete API router.
pub fn router<B: CartBackend>() -> Router<AppState<B>> {
    Router::new().merge(preferences::router::<B>())
}
