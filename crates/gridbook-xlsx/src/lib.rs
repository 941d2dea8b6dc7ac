//! # gridbook-xlsx
//!
//! File-format codec adapter for gridbook. The container format itself stays
//! opaque: reading is delegated to `calamine` and writing to
//! `rust_xlsxwriter`; this crate only maps between their models and the
//! gridbook dual-view [`Workbook`](gridbook_core::Workbook) pair, plus a
//! small raw-XML scan to recover currency number-format tags.

pub mod error;
pub mod reader;
pub mod writer;

mod currency;

pub use error::{CodecError, CodecResult};
pub use reader::read_views;
pub use writer::write_views;
