//! Data table component types.
//!
//! These types define the static configuration of a data table: its known
//! columns, which of them start visible, and the bulk actions it offers.
//! Mutable per-table state lives in [`TableSettings`](super::TableSettings).

use serde::Serialize;

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new column, visible by default.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Bulk action definition for data tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAction {
    /// Action key (passed to event handler).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Whether this is a destructive action.
    pub destructive: bool,
}

impl BulkAction {
    /// Create a new bulk action.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            destructive: false,
        }
    }

    /// Mark this action as destructive.
    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Table heading.
    pub title: String,
    /// Column definitions, visible ones first.
    pub columns: Vec<TableColumn>,
    /// Bulk action definitions.
    pub bulk_actions: Vec<BulkAction>,
    /// Heading for the bulk action menu.
    pub actions_label: String,
    /// Message shown when there are no rows.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            title: String::new(),
            columns: vec![],
            bulk_actions: vec![],
            actions_label: "Actions".to_string(),
            empty_title: "No items found".to_string(),
        }
    }

    /// Set the table heading.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a bulk action.
    #[must_use]
    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    /// Set the bulk action menu heading.
    #[must_use]
    pub fn actions_label(mut self, label: &str) -> Self {
        self.actions_label = label.to_string();
        self
    }

    /// Set empty state message.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Get default visible columns.
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Get columns that start hidden.
    #[must_use]
    pub fn hidden_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }
}
