//! Sheet type - a named sparse grid of cells

use crate::value::CellValue;
use std::collections::BTreeMap;

/// A single cell: its value plus read-only display metadata
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// The cell's value (raw in a formula view, computed in a value view)
    pub value: CellValue,
    /// Whether the cell's number format is currency-styled in the file
    ///
    /// Populated by the codec on load and consulted at the read boundary;
    /// writes never change it.
    pub currency: bool,
}

/// A sheet: a named 1-based grid, stored sparsely
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u32), Cell>,
}

impl Sheet {
    /// Create a new empty sheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Get a cell, if populated
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get a cell's value, cloning; absent cells read as [`CellValue::Empty`]
    pub fn value(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Set a cell's value verbatim; writing `Empty` clears the cell
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        if matches!(value, CellValue::Empty) {
            self.cells.remove(&(row, col));
        } else {
            self.cells.entry((row, col)).or_default().value = value;
        }
    }

    /// Tag a populated cell as currency-formatted; no-op on absent cells
    pub fn set_currency(&mut self, row: u32, col: u32, currency: bool) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.currency = currency;
        }
    }

    /// Clear a cell
    pub fn clear(&mut self, row: u32, col: u32) {
        self.cells.remove(&(row, col));
    }

    /// Maximum populated row (0 when the sheet is empty)
    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|&(r, _)| r).max().unwrap_or(0)
    }

    /// Maximum populated column (0 when the sheet is empty)
    pub fn max_col(&self) -> u32 {
        self.cells.keys().map(|&(_, c)| c).max().unwrap_or(0)
    }

    /// Check if the sheet has no populated cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate populated cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        self.cells.iter().map(|(&(r, c), cell)| (r, c, cell))
    }
}
