//! Column visibility and display settings for a data table.
//!
//! The host UI reports every settings change as a single `(action, nextValue)`
//! event. [`TableSettings::apply`] maps that event onto exactly one state
//! transition; anything it does not recognize is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_table::{DataTableConfig, TableColumn};

/// The settings events a data table manager emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateAction {
    /// `nextValue` is the new ordered list of visible column keys.
    ColumnsUpdate,
    /// `nextValue` is the new condensed flag.
    IsTableCondensedUpdate,
    /// `nextValue` is the new text wrapping flag.
    IsTableWrappingTextUpdate,
    /// Any action name this table does not handle.
    #[serde(other)]
    Unrecognized,
}

/// A settings change event as sent by the host UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub action: UpdateAction,
    #[serde(default)]
    pub next_value: Value,
}

/// Sort direction indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Which column the table header marks as sorted.
///
/// This is presentation state only; rows are rendered in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub sorted_by: String,
    pub sort_direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            sorted_by: "key".to_string(),
            sort_direction: SortDirection::Asc,
        }
    }
}

/// Display toggles reported back to the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub disable_display_settings: bool,
    pub is_condensed: bool,
    pub is_wrapping_text: bool,
}

/// Column picker state reported back to the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnManager {
    pub are_hidden_columns_searchable: bool,
    pub disable_column_manager: bool,
    pub visible_column_keys: Vec<String>,
    pub hideable_columns: Vec<TableColumn>,
}

/// Mutable column and display state of one data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSettings {
    columns: Vec<TableColumn>,
    visible_column_keys: Vec<String>,
    is_condensed: bool,
    is_wrapping_text: bool,
    sorting: SortState,
}

impl TableSettings {
    /// Initial settings: every configured column is known, the default
    /// visible ones are shown, rows are condensed and text does not wrap.
    #[must_use]
    pub fn new(config: &DataTableConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            visible_column_keys: config.default_columns(),
            is_condensed: true,
            is_wrapping_text: false,
            sorting: SortState::default(),
        }
    }

    /// Apply one settings event. Returns whether the event was applied.
    ///
    /// Payloads of the wrong shape are ignored, as are unrecognized actions.
    pub fn apply(&mut self, action: UpdateAction, next_value: &Value) -> bool {
        match action {
            UpdateAction::IsTableCondensedUpdate => {
                let Some(condensed) = next_value.as_bool() else {
                    return false;
                };
                self.set_condensed(condensed);
                true
            }
            UpdateAction::IsTableWrappingTextUpdate => {
                let Some(wrapping) = next_value.as_bool() else {
                    return false;
                };
                self.set_wrapping_text(wrapping);
                true
            }
            UpdateAction::ColumnsUpdate => match column_keys(next_value) {
                Some(keys) => {
                    self.update_columns(keys);
                    true
                }
                None => {
                    tracing::debug!(?next_value, "Ignoring malformed columns update");
                    false
                }
            },
            UpdateAction::Unrecognized => false,
        }
    }

    pub const fn set_condensed(&mut self, condensed: bool) {
        self.is_condensed = condensed;
    }

    pub const fn set_wrapping_text(&mut self, wrapping: bool) {
        self.is_wrapping_text = wrapping;
    }

    /// Make `keys` the visible columns, in that order.
    ///
    /// Known columns whose key is not in `keys` are dropped from the table
    /// for good: a later update that lists them again makes the key visible
    /// but there is no column left to render for it.
    pub fn update_columns(&mut self, keys: Vec<String>) {
        self.columns.retain(|column| keys.contains(&column.key));
        self.visible_column_keys = keys;
    }

    /// Record a header sort click.
    pub fn on_sort_change(&mut self, sorted_by: &str, direction: SortDirection) {
        self.sorting = SortState {
            sorted_by: sorted_by.to_string(),
            sort_direction: direction,
        };
    }

    /// All columns the table still knows about.
    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    #[must_use]
    pub fn visible_column_keys(&self) -> &[String] {
        &self.visible_column_keys
    }

    /// Visible columns in display order; keys with no known column are skipped.
    #[must_use]
    pub fn visible_columns(&self) -> Vec<&TableColumn> {
        self.visible_column_keys
            .iter()
            .filter_map(|key| self.columns.iter().find(|column| &column.key == key))
            .collect()
    }

    #[must_use]
    pub const fn is_condensed(&self) -> bool {
        self.is_condensed
    }

    #[must_use]
    pub const fn is_wrapping_text(&self) -> bool {
        self.is_wrapping_text
    }

    #[must_use]
    pub const fn sorting(&self) -> &SortState {
        &self.sorting
    }

    #[must_use]
    pub const fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            disable_display_settings: false,
            is_condensed: self.is_condensed,
            is_wrapping_text: self.is_wrapping_text,
        }
    }

    #[must_use]
    pub fn column_manager(&self) -> ColumnManager {
        ColumnManager {
            are_hidden_columns_searchable: true,
            disable_column_manager: false,
            visible_column_keys: self.visible_column_keys.clone(),
            hideable_columns: self.columns.clone(),
        }
    }
}

/// A JSON array of strings, or `None` for any other shape.
fn column_keys(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|key| key.as_str().map(ToString::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn settings() -> TableSettings {
        let config = DataTableConfig::new("carts")
            .column(TableColumn::new("id", "ID"))
            .column(TableColumn::new("count", "LineItem count"))
            .column(TableColumn::new("totalPrice", "Total price"))
            .column(TableColumn::new("billingAddress", "Billing address"))
            .column(TableColumn::new("shippingAddress", "Shipping address").visible(false));
        TableSettings::new(&config)
    }

    fn keys(settings: &TableSettings) -> Vec<&str> {
        settings.columns().iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_initial_state() {
        let settings = settings();
        assert_eq!(
            settings.visible_column_keys(),
            ["id", "count", "totalPrice", "billingAddress"]
        );
        assert_eq!(settings.columns().len(), 5);
        assert!(settings.is_condensed());
        assert!(!settings.is_wrapping_text());
    }

    #[test]
    fn test_condensed_and_wrapping_updates() {
        let mut settings = settings();
        assert!(settings.apply(UpdateAction::IsTableCondensedUpdate, &json!(false)));
        assert!(settings.apply(UpdateAction::IsTableWrappingTextUpdate, &json!(true)));
        assert!(!settings.is_condensed());
        assert!(settings.is_wrapping_text());
    }

    #[test]
    fn test_non_boolean_flag_is_ignored() {
        let mut settings = settings();
        assert!(!settings.apply(UpdateAction::IsTableCondensedUpdate, &json!("no")));
        assert!(settings.is_condensed());
    }

    #[test]
    fn test_columns_update_sets_order_and_narrows_known_columns() {
        let mut settings = settings();
        assert!(settings.apply(UpdateAction::ColumnsUpdate, &json!(["totalPrice", "id"])));

        assert_eq!(settings.visible_column_keys(), ["totalPrice", "id"]);
        assert_eq!(keys(&settings), ["id", "totalPrice"]);
        let visible: Vec<&str> = settings
            .visible_columns()
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(visible, ["totalPrice", "id"]);
    }

    /// Columns left out of a columns update cannot be brought back. This pins
    /// the current behavior; it is not a guarantee callers should rely on.
    #[test]
    fn test_dropped_columns_are_not_resurrected() {
        let mut settings = settings();
        settings.apply(UpdateAction::ColumnsUpdate, &json!(["id", "totalPrice"]));
        settings.apply(
            UpdateAction::ColumnsUpdate,
            &json!(["id", "totalPrice", "shippingAddress", "billingAddress", "count"]),
        );

        assert_eq!(
            settings.visible_column_keys(),
            ["id", "totalPrice", "shippingAddress", "billingAddress", "count"]
        );
        assert_eq!(keys(&settings), ["id", "totalPrice"]);
        assert_eq!(settings.visible_columns().len(), 2);
        assert_eq!(settings.column_manager().hideable_columns.len(), 2);
    }

    #[test]
    fn test_columns_update_with_scalar_is_ignored() {
        let mut settings = settings();
        let before = settings.clone();
        assert!(!settings.apply(UpdateAction::ColumnsUpdate, &json!("id")));
        assert!(!settings.apply(UpdateAction::ColumnsUpdate, &json!(["id", 3])));
        assert_eq!(settings, before);
    }

    #[test]
    fn test_unrecognized_action_is_noop() {
        let mut settings = settings();
        let before = settings.clone();

        let update: SettingsUpdate =
            serde_json::from_value(json!({"action": "isTableFooterUpdate", "nextValue": true}))
                .expect("valid update");
        assert_eq!(update.action, UpdateAction::Unrecognized);
        assert!(!settings.apply(update.action, &update.next_value));
        assert_eq!(settings, before);
    }

    #[test]
    fn test_settings_update_deserializes_action_names() {
        let update: SettingsUpdate =
            serde_json::from_value(json!({"action": "columnsUpdate", "nextValue": ["id"]}))
                .expect("valid update");
        assert_eq!(update.action, UpdateAction::ColumnsUpdate);
        assert_eq!(update.next_value, json!(["id"]));
    }

    #[test]
    fn test_sort_change() {
        let mut settings = settings();
        assert_eq!(settings.sorting().sorted_by, "key");
        settings.on_sort_change("totalPrice", SortDirection::Desc);
        assert_eq!(settings.sorting().sorted_by, "totalPrice");
        assert_eq!(settings.sorting().sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_views() {
        let settings = settings();
        let display = serde_json::to_value(settings.display_settings()).expect("serializable");
        assert_eq!(
            display,
            json!({"disableDisplaySettings": false, "isCondensed": true, "isWrappingText": false})
        );
        let manager = settings.column_manager();
        assert!(manager.are_hidden_columns_searchable);
        assert_eq!(manager.hideable_columns.len(), 5);
    }
}
