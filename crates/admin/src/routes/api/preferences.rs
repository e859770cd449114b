//! Table preferences API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    carts::CartBackend,
    components::{ColumnManager, DisplaySettings, SettingsUpdate, SortState, TableSettings},
    error::AppError,
    state::AppState,
};

/// Build the preferences router.
pub fn router<B: CartBackend>() -> Router<AppState<B>> {
    Router::new().route(
        "/api/preferences/table/{table_id}",
        get(get_table_prefs::<B>).post(save_table_prefs::<B>),
    )
}

/// Response for table preferences.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePrefsResponse {
    /// Whether the submitted update changed anything; absent on reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
    pub display_settings: DisplaySettings,
    pub column_manager: ColumnManager,
    pub sorting: SortState,
}

impl TablePrefsResponse {
    fn new(settings: &TableSettings, applied: Option<bool>) -> Self {
        Self {
            applied,
            display_settings: settings.display_settings(),
            column_manager: settings.column_manager(),
            sorting: settings.sorting().clone(),
        }
    }
}

fn check_table<B: CartBackend>(state: &AppState<B>, table_id: &str) -> Result<(), AppError> {
    if table_id == state.table_config().table_id {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("table {table_id}")))
    }
}

/// Current settings of a table.
///
/// # Errors
///
/// Returns `NotFound` for an unknown table id.
#[instrument(skip(state))]
pub async fn get_table_prefs<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path(table_id): Path<String>,
) -> Result<Json<TablePrefsResponse>, AppError> {
    check_table(&state, &table_id)?;
    let settings = state.settings().read().await;
    Ok(Json(TablePrefsResponse::new(&settings, None)))
}

/// Apply one settings update to a table.
///
/// Updates that do not apply (unknown action, wrong payload shape) leave the
/// settings unchanged and report `applied: false`.
///
/// # Errors
///
/// Returns `NotFound` for an unknown table id.
#[instrument(skip(state, update), fields(action = ?update.action))]
pub async fn save_table_prefs<B: CartBackend>(
    State(state): State<AppState<B>>,
    Path(table_id): Path<String>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<TablePrefsResponse>, AppError> {
    check_table(&state, &table_id)?;
    let mut settings = state.settings().write().await;
    let applied = settings.apply(update.action, &update.next_value);
    if applied {
        tracing::debug!("Table settings updated");
    }
    Ok(Json(TablePrefsResponse::new(&settings, Some(applied))))
}
