//! # gridbook
//!
//! A spreadsheet access layer built around one idea: keep two synchronized
//! views of a workbook, one preserving formulas for writes and one holding
//! calculated values for reads, and put every operation behind a single
//! [`WorkbookManager`].
//!
//! On top of the manager sit smart cell locators (pass `"B2"`, `"Data!B2"`,
//! or `(2, 2)` interchangeably) and grid traversal heuristics for the shapes
//! real spreadsheets take: totals under columns, titled tables, item lists.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gridbook::{CellValue, WorkbookManager};
//! use std::path::Path;
//!
//! # fn main() -> gridbook::Result<()> {
//! let mut manager = WorkbookManager::with_path(Path::new("books.xlsx"))?;
//! manager.write_cell("Sheet1", "A1", "Revenue")?;
//! manager.write_cell("Sheet1", "A2", 1250.50)?;
//! manager.save()?;
//!
//! let total = manager.read_total("Sheet1", "A2")?;
//! assert_eq!(total, Some(CellValue::Number(1250.5)));
//! # Ok(())
//! # }
//! ```

mod access;
mod manager;
mod scan;

pub use manager::WorkbookManager;
pub use scan::ColumnsMode;

// Core types callers need at the API surface
pub use gridbook_core::{
    column_letters, letters_to_column, CellLoc, CellRef, CellValue, Error, RangeLoc, RangeRef,
    Result, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

/// Commonly used imports, for glob convenience
pub mod prelude {
    pub use crate::{CellRef, CellValue, ColumnsMode, RangeRef, WorkbookManager};
}
