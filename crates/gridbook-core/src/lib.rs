//! # gridbook-core
//!
//! Core data structures for the gridbook spreadsheet access layer.
//!
//! This crate provides the fundamental types used throughout gridbook:
//! - [`CellValue`] - Represents cell values (numbers, text, booleans, formulas)
//! - [`CellRef`] and [`RangeRef`] - Human-style reference parsing ("A1",
//!   "Sheet2!B3", "A1:C5")
//! - [`CellLoc`] and [`RangeLoc`] - Locators accepting either a reference
//!   string or explicit (row, column) integers
//! - [`Workbook`], [`Sheet`] - An in-memory view of a spreadsheet document
//!
//! All coordinates in the public API are 1-based.
//!
//! ## Example
//!
//! ```rust
//! use gridbook_core::{CellRef, CellValue, Workbook};
//!
//! let r = CellRef::parse("Data!AB3").unwrap();
//! assert_eq!((r.row, r.col), (3, 28));
//!
//! let mut wb = Workbook::new();
//! let sheet = wb.sheet_mut("Sheet1").unwrap();
//! sheet.set_value(1, 1, CellValue::from("Hello"));
//! sheet.set_value(1, 2, CellValue::from(42));
//! ```

pub mod address;
pub mod error;
pub mod sheet;
pub mod value;
pub mod workbook;

// Re-exports for convenience
pub use address::{check_coords, column_letters, letters_to_column, CellLoc, CellRef, RangeLoc, RangeRef};
pub use error::{Error, Result};
pub use sheet::{Cell, Sheet};
pub use value::CellValue;
pub use workbook::{validate_sheet_name, Workbook};

/// Maximum number of rows in a sheet (Excel limit, 1-based)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit, 1-based)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
