//! Customer cart route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use cart_manager_core::{CartId, CartRef, CustomerId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    carts::CartBackend,
    components::{CartDetailView, SortDirection, TableView},
    error::AppError,
    state::AppState,
};

/// Build the carts router.
pub fn router<B: CartBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/customers/{customer_id}/carts", get(list_carts::<B>))
        .route(
            "/customers/{customer_id}/carts/selection",
            post(update_selection::<B>),
        )
        .route(
            "/customers/{customer_id}/carts/delete",
            post(delete_selected::<B>),
        )
        .route(
            "/customers/{customer_id}/carts/by-id/{cart_id}",
            get(open_cart::<B>),
        )
}

/// Query parameters for the cart listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Column the header marks as sorted.
    pub sorted_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

/// Selection change requested by the table.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SelectionInput {
    /// Row checkbox click.
    ToggleRow { id: String },
    SelectAll,
    DeselectAll,
    /// Header checkbox click.
    ToggleHeader,
}

/// Result of a successful batch delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: Vec<CartRef>,
    pub table: TableView,
}

/// Refetch a customer's carts and render the table.
///
/// # Errors
///
/// Returns `Fetch` if the platform query failed.
#[instrument(skip(state, params))]
pub async fn list_carts<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path(customer_id): Path<CustomerId>,
    Query(params): Query<ListParams>,
) -> Result<Json<TableView>, AppError> {
    if let Some(sorted_by) = params.sorted_by {
        state
            .settings()
            .write()
            .await
            .on_sort_change(&sorted_by, params.sort_direction.unwrap_or_default());
    }

    let session = state.session(&customer_id).await;
    let mut session = session.lock().await;
    session.refresh().await?;
    Ok(Json(state.table_view(&session).await))
}

/// Apply a checkbox interaction and render the table.
///
/// Toggling an id that is not in the table changes nothing.
#[instrument(skip(state))]
pub async fn update_selection<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path(customer_id): Path<CustomerId>,
    Json(input): Json<SelectionInput>,
) -> Json<TableView> {
    let session = state.session(&customer_id).await;
    let mut session = session.lock().await;

    let selection = session.table_mut().selection_mut();
    match input {
        SelectionInput::ToggleRow { id } => {
            if !selection.toggle_row(&id) {
                tracing::debug!(cart_id = %id, "Ignoring toggle of unknown cart");
            }
        }
        SelectionInput::SelectAll => selection.select_all_rows(),
        SelectionInput::DeselectAll => selection.deselect_all_rows(),
        SelectionInput::ToggleHeader => selection.toggle_header(),
    }

    Json(state.table_view(&session).await)
}

/// Delete the selected carts.
///
/// The table is refetched whether or not every delete succeeded.
///
/// # Errors
///
/// Returns `BadRequest` when nothing is selected and `BatchDelete` when any
/// delete was rejected.
#[instrument(skip(state))]
pub async fn delete_selected<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<DeleteResponse>, AppError> {
    let session = state.session(&customer_id).await;
    let mut session = session.lock().await;

    let deleted = session.delete_selected().await?;
    let table = state.table_view(&session).await;
    Ok(Json(DeleteResponse { deleted, table }))
}

/// Open one cart from the table.
///
/// If the cart is not in the table yet (e.g. a direct link), the customer's
/// carts are fetched first.
///
/// # Errors
///
/// Returns `NotFound` if the customer has no such cart, or `Fetch` if the
/// platform query failed.
#[instrument(skip(state))]
pub async fn open_cart<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path((customer_id, cart_id)): Path<(CustomerId, CartId)>,
) -> Result<Json<CartDetailView>, AppError> {
    let session = state.session(&customer_id).await;
    let mut session = session.lock().await;

    if session.table().selection().row(cart_id.as_str()).is_none() {
        session.refresh().await?;
    }

    let cart = session
        .table()
        .open_row(cart_id.as_str())
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("cart {cart_id}")))?;

    Ok(Json(CartDetailView::new(
        cart,
        state.messages(),
        state.locale(),
    )))
}
