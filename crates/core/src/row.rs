//! Output cells and rows.

use crate::field::{header_key, Field, FieldCatalog};
use serde::Serialize;

/// One converted value at one output position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Output column (the field's export position); values below 1 are never written.
    pub column_number: i32,
    pub value: String,
    pub column_width: f64,
    pub export_name: String,
}

impl Cell {
    /// Create a cell for `field` holding `value`.
    #[must_use]
    pub fn for_field(field: &Field, value: String) -> Self {
        Cell {
            column_number: field.export_position,
            value,
            column_width: field.column_width,
            export_name: field.export_name.clone(),
        }
    }

    /// Whether the renderer should write this cell.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.column_number >= 1
    }
}

/// One logical output line: a data row or the synthesized divider.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Row {
    cells: Vec<Cell>,
    is_divider: bool,
    added_to_report: bool,
    index: usize,
}

impl Row {
    /// Create a data row from cells in field iteration order.
    #[must_use]
    pub fn data(cells: Vec<Cell>) -> Self {
        Row {
            cells,
            ..Row::default()
        }
    }

    /// Create a divider row with one empty cell per catalog field, to be spliced in at `index`.
    #[must_use]
    pub fn divider(catalog: &FieldCatalog, index: usize) -> Self {
        Row {
            cells: catalog
                .iter()
                .map(|field| Cell::for_field(field, String::new()))
                .collect(),
            is_divider: true,
            added_to_report: false,
            index,
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells the renderer writes, in field iteration order.
    pub fn exported_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_exported())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn is_divider(&self) -> bool {
        self.is_divider
    }

    /// Whether the row has been committed to a report sequence.
    #[must_use]
    pub fn added_to_report(&self) -> bool {
        self.added_to_report
    }

    /// Splice position of a divider row within the data rows.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell at a catalog position.
    #[must_use]
    pub fn cell(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Value of the first cell whose export name matches, case-insensitively.
    #[must_use]
    pub fn value_of(&self, export_name: &str) -> Option<&str> {
        let key = header_key(export_name);
        self.cells
            .iter()
            .find(|c| header_key(&c.export_name) == key)
            .map(|c| c.value.as_str())
    }

    /// Commit the row. Returns false if it was already committed.
    pub(crate) fn mark_added(&mut self) -> bool {
        !std::mem::replace(&mut self.added_to_report, true)
    }
}
