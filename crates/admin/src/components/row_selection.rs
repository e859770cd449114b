//! Checkbox row selection for data tables.
//!
//! Selection is tracked by row id against the current row list. Every
//! operation that changes how many rows are selected ends by calling the
//! selection listener with the selected rows, in row order.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// A row that can be selected by id.
pub trait TableRow {
    /// Stable identifier of the row.
    fn row_id(&self) -> &str;
}

/// Tri-state of the select-all checkbox in the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderCheckbox {
    Unchecked,
    Indeterminate,
    Checked,
}

type SelectionListener<R> = Box<dyn Fn(&[&R]) + Send + Sync>;

/// Per-row checked state over an ordered row list.
pub struct RowSelection<R> {
    rows: Vec<R>,
    selected: HashSet<String>,
    listener: Option<SelectionListener<R>>,
}

impl<R: TableRow> RowSelection<R> {
    /// Start with `rows` and nothing selected.
    #[must_use]
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            selected: HashSet::new(),
            listener: None,
        }
    }

    /// Register the callback that receives the selected rows after every
    /// change. Replaces any previous listener.
    pub fn on_selection_change(&mut self, listener: impl Fn(&[&R]) + Send + Sync + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Current rows, in display order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Find a row by id.
    #[must_use]
    pub fn row(&self, id: &str) -> Option<&R> {
        self.rows.iter().find(|row| row.row_id() == id)
    }

    /// Replace the row list. Selections for ids that are no longer present
    /// are dropped.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        let before = self.selected.len();
        self.rows = rows;
        let present: HashSet<&str> = self.rows.iter().map(TableRow::row_id).collect();
        self.selected.retain(|id| present.contains(id.as_str()));
        self.notify_if_changed(before);
    }

    /// Flip one row. Unknown ids are ignored; returns whether a row was toggled.
    pub fn toggle_row(&mut self, id: &str) -> bool {
        if self.row(id).is_none() {
            return false;
        }
        let before = self.selected.len();
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        self.notify_if_changed(before);
        true
    }

    pub fn select_all_rows(&mut self) {
        let before = self.selected.len();
        self.selected = self.rows.iter().map(|row| row.row_id().to_string()).collect();
        self.notify_if_changed(before);
    }

    pub fn deselect_all_rows(&mut self) {
        let before = self.selected.len();
        self.selected.clear();
        self.notify_if_changed(before);
    }

    /// Header checkbox click: selects everything when nothing is selected,
    /// otherwise clears the selection.
    pub fn toggle_header(&mut self) {
        if self.number_of_selected_rows() == 0 {
            self.select_all_rows();
        } else {
            self.deselect_all_rows();
        }
    }

    #[must_use]
    pub fn is_row_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn number_of_selected_rows(&self) -> usize {
        self.selected.len()
    }

    /// Selected rows, in row order.
    #[must_use]
    pub fn selected_rows(&self) -> Vec<&R> {
        self.rows
            .iter()
            .filter(|row| self.selected.contains(row.row_id()))
            .collect()
    }

    #[must_use]
    pub fn header_state(&self) -> HeaderCheckbox {
        let selected = self.number_of_selected_rows();
        let total = self.rows.len();
        if selected == 0 {
            HeaderCheckbox::Unchecked
        } else if selected < total {
            HeaderCheckbox::Indeterminate
        } else {
            HeaderCheckbox::Checked
        }
    }

    fn notify_if_changed(&self, before: usize) {
        if self.selected.len() == before {
            return;
        }
        if let Some(listener) = &self.listener {
            listener(&self.selected_rows());
        }
    }
}

impl<R: TableRow> Default for RowSelection<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R> fmt::Debug for RowSelection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowSelection")
            .field("rows", &self.rows.len())
            .field("selected", &self.selected)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
