//! The customer carts table.
//!
//! Binds carts to the generic table pieces: column definitions, cell
//! rendering, row selection and the serializable view the host UI draws.

use std::fmt;

use cart_manager_core::{Cart, format_address};
use serde::Serialize;

use super::data_table::{BulkAction, DataTableConfig, TableColumn};
use super::row_selection::{HeaderCheckbox, RowSelection, TableRow};
use super::table_settings::{ColumnManager, DisplaySettings, SortState, TableSettings};
use crate::messages::{MessageKey, Messages};

/// Table id used for settings persistence.
pub const CARTS_TABLE_ID: &str = "carts";

/// Bulk action key for deleting the selected carts.
pub const DELETE_ACTION: &str = "delete";

impl TableRow for Cart {
    fn row_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Columns the carts table knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartColumn {
    Id,
    Count,
    TotalPrice,
    BillingAddress,
    ShippingAddress,
}

impl CartColumn {
    /// All columns, in their initial order.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::Count,
        Self::TotalPrice,
        Self::BillingAddress,
        Self::ShippingAddress,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Count => "count",
            Self::TotalPrice => "totalPrice",
            Self::BillingAddress => "billingAddress",
            Self::ShippingAddress => "shippingAddress",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.key() == key)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Count => "LineItem count",
            Self::TotalPrice => "Total price",
            Self::BillingAddress => "Billing address",
            Self::ShippingAddress => "Shipping address",
        }
    }

    /// Whether the column is shown before the user edits the column set.
    #[must_use]
    pub const fn initially_visible(self) -> bool {
        !matches!(self, Self::ShippingAddress)
    }

    /// Render this column's cell for `cart`.
    #[must_use]
    pub fn render(self, cart: &Cart, locale: &str) -> String {
        match self {
            Self::Id => cart.id.to_string(),
            Self::Count => cart.line_item_count().to_string(),
            Self::TotalPrice => cart.total_price.format(locale),
            Self::BillingAddress => format_address(cart.billing_address.as_ref()),
            Self::ShippingAddress => format_address(cart.shipping_address.as_ref()),
        }
    }
}

/// Static configuration of the carts table.
#[must_use]
pub fn carts_table_config(messages: &dyn Messages) -> DataTableConfig {
    let config = CartColumn::ALL
        .into_iter()
        .fold(DataTableConfig::new(CARTS_TABLE_ID), |config, column| {
            config.column(
                TableColumn::new(column.key(), column.label()).visible(column.initially_visible()),
            )
        });

    config
        .title(&messages.get(MessageKey::CartListTitle))
        .actions_label(&messages.get(MessageKey::Actions))
        .empty_state(&messages.get(MessageKey::NoResults))
        .bulk_action(BulkAction::new(DELETE_ACTION, "Delete").destructive())
}

/// Cell text for `cart` in the column with `key`; `None` for unknown keys.
#[must_use]
pub fn render_cell(cart: &Cart, key: &str, locale: &str) -> Option<String> {
    CartColumn::from_key(key).map(|column| column.render(cart, locale))
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub column: String,
    pub value: String,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: String,
    pub version: i64,
    pub is_selected: bool,
    pub cells: Vec<CellView>,
}

/// Everything the host UI needs to draw the table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub table_id: String,
    pub title: String,
    pub actions_label: String,
    pub bulk_actions: Vec<BulkAction>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<RowView>,
    pub header_checkbox: HeaderCheckbox,
    pub selected_count: usize,
    pub display_settings: DisplaySettings,
    pub column_manager: ColumnManager,
    pub sorting: SortState,
    /// Set only when there are no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

type OpenCartListener = Box<dyn Fn(&Cart) + Send + Sync>;

/// Carts with checkbox selection and a row-click callback.
#[derive(Default)]
pub struct CartsTable {
    selection: RowSelection<Cart>,
    on_open_cart: Option<OpenCartListener>,
}

impl CartsTable {
    #[must_use]
    pub fn new(carts: Vec<Cart>) -> Self {
        Self {
            selection: RowSelection::new(carts),
            on_open_cart: None,
        }
    }

    /// Register the row-click callback.
    pub fn on_open_cart(&mut self, listener: impl Fn(&Cart) + Send + Sync + 'static) {
        self.on_open_cart = Some(Box::new(listener));
    }

    /// Replace the rows with a fresh fetch result, keeping the selection of
    /// carts that are still present.
    pub fn set_carts(&mut self, carts: Vec<Cart>) {
        self.selection.set_rows(carts);
    }

    #[must_use]
    pub const fn selection(&self) -> &RowSelection<Cart> {
        &self.selection
    }

    pub const fn selection_mut(&mut self) -> &mut RowSelection<Cart> {
        &mut self.selection
    }

    /// Row click: notify the open-cart listener and return the cart.
    pub fn open_row(&self, id: &str) -> Option<&Cart> {
        let cart = self.selection.row(id)?;
        if let Some(listener) = &self.on_open_cart {
            listener(cart);
        }
        Some(cart)
    }

    /// Render the current rows with `settings` applied.
    #[must_use]
    pub fn view(&self, settings: &TableSettings, config: &DataTableConfig, locale: &str) -> TableView {
        let columns: Vec<TableColumn> = settings.visible_columns().into_iter().cloned().collect();
        let rows: Vec<RowView> = self
            .selection
            .rows()
            .iter()
            .map(|cart| RowView {
                id: cart.id.to_string(),
                version: cart.version,
                is_selected: self.selection.is_row_selected(cart.row_id()),
                cells: columns
                    .iter()
                    .filter_map(|column| {
                        render_cell(cart, &column.key, locale).map(|value| CellView {
                            column: column.key.clone(),
                            value,
                        })
                    })
                    .collect(),
            })
            .collect();
        let empty_message = rows.is_empty().then(|| config.empty_title.clone());

        TableView {
            table_id: config.table_id.clone(),
            title: config.title.clone(),
            actions_label: config.actions_label.clone(),
            bulk_actions: config.bulk_actions.clone(),
            columns,
            rows,
            header_checkbox: self.selection.header_state(),
            selected_count: self.selection.number_of_selected_rows(),
            display_settings: settings.display_settings(),
            column_manager: settings.column_manager(),
            sorting: settings.sorting().clone(),
            empty_message,
        }
    }
}

impl fmt::Debug for CartsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartsTable")
            .field("selection", &self.selection)
            .field("has_open_listener", &self.on_open_cart.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use cart_manager_core::{Address, CartId, LineItem, LineItemId, Money};
    use serde_json::json;

    use super::*;
    use crate::components::table_settings::UpdateAction;
    use crate::messages::DefaultMessages;

    fn line_item(quantity: u64) -> LineItem {
        LineItem {
            id: LineItemId::new(format!("li-{quantity}")),
            product_id: None,
            name: None,
            quantity,
        }
    }

    fn cart(id: &str) -> Cart {
        Cart {
            id: CartId::new(id),
            version: 4,
            customer_id: None,
            line_items: vec![line_item(2), line_item(3), line_item(0)],
            total_price: Money::new(123_456, "EUR", 2),
            shipping_address: None,
            billing_address: Some(Address {
                city: Some("Berlin".to_string()),
                ..Address::default()
            }),
        }
    }

    fn table(ids: &[&str]) -> (CartsTable, TableSettings, DataTableConfig) {
        let config = carts_table_config(&DefaultMessages);
        let settings = TableSettings::new(&config);
        (
            CartsTable::new(ids.iter().map(|id| cart(id)).collect()),
            settings,
            config,
        )
    }

    #[test]
    fn test_config_columns() {
        let config = carts_table_config(&DefaultMessages);
        assert_eq!(config.title, "Cart list");
        assert_eq!(
            config.default_columns(),
            ["id", "count", "totalPrice", "billingAddress"]
        );
        assert_eq!(config.hidden_columns(), ["shippingAddress"]);
        assert_eq!(config.bulk_actions[0].key, DELETE_ACTION);
    }

    #[test]
    fn test_render_cells() {
        let cart = cart("c-1");
        assert_eq!(render_cell(&cart, "id", "en").unwrap(), "c-1");
        assert_eq!(render_cell(&cart, "count", "en").unwrap(), "5");
        assert_eq!(render_cell(&cart, "totalPrice", "en").unwrap(), "€1,234.56");
        assert_eq!(
            render_cell(&cart, "billingAddress", "en").unwrap(),
            ",  , Berlin, "
        );
        assert_eq!(render_cell(&cart, "shippingAddress", "en").unwrap(), "");
        assert_eq!(render_cell(&cart, "createdAt", "en"), None);
    }

    #[test]
    fn test_view_renders_visible_columns_in_order() {
        let (table, mut settings, config) = table(&["a", "b"]);
        settings.apply(UpdateAction::ColumnsUpdate, &json!(["totalPrice", "id", "unknown"]));

        let view = table.view(&settings, &config, "de");
        let keys: Vec<&str> = view.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["totalPrice", "id"]);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].cells[0].value, "1.234,56\u{a0}€");
        assert_eq!(view.rows[0].cells[1].value, "a");
        assert!(view.empty_message.is_none());
    }

    #[test]
    fn test_view_tracks_selection() {
        let (mut table, settings, config) = table(&["a", "b", "c"]);
        table.selection_mut().toggle_row("b");

        let view = table.view(&settings, &config, "en");
        assert_eq!(view.header_checkbox, HeaderCheckbox::Indeterminate);
        assert_eq!(view.selected_count, 1);
        assert!(!view.rows[0].is_selected);
        assert!(view.rows[1].is_selected);
    }

    #[test]
    fn test_empty_view_has_message() {
        let (table, settings, config) = table(&[]);
        let view = table.view(&settings, &config, "en");
        assert_eq!(
            view.empty_message.as_deref(),
            Some("There are no Carts available for this user")
        );
        assert_eq!(view.header_checkbox, HeaderCheckbox::Unchecked);
    }

    #[test]
    fn test_open_row_notifies_listener() {
        let (mut table, _, _) = table(&["a", "b"]);
        let opened = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&opened);
        table.on_open_cart(move |cart| sink.lock().unwrap().push(cart.id.to_string()));

        assert_eq!(table.open_row("b").unwrap().id.as_str(), "b");
        assert!(table.open_row("missing").is_none());
        assert_eq!(*opened.lock().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_set_carts_keeps_surviving_selection() {
        let (mut table, _, _) = table(&["a", "b"]);
        table.selection_mut().select_all_rows();
        table.set_carts(vec![cart("b"), cart("c")]);

        assert_eq!(table.selection().number_of_selected_rows(), 1);
        assert!(table.selection().is_row_selected("b"));
    }
}
