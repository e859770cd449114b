//! Table components for the cart screens.
//!
//! [`data_table`] holds static table configuration, [`table_settings`] the
//! user-editable column and display state, and [`row_selection`] checkbox
//! state. [`carts_table`] binds all three to carts.

pub mod cart_detail;
pub mod carts_table;
pub mod data_table;
pub mod row_selection;
pub mod table_settings;

pub use cart_detail::CartDetailView;
pub use carts_table::{
    CARTS_TABLE_ID, CartColumn, CartsTable, DELETE_ACTION, TableView, carts_table_config,
    render_cell,
};
pub use data_table::{BulkAction, DataTableConfig, TableColumn};
pub use row_selection::{HeaderCheckbox, RowSelection, TableRow};
pub use table_settings::{
    ColumnManager, DisplaySettings, SettingsUpdate, SortDirection, SortState, TableSettings,
    UpdateAction,
};
