//! Grid traversal heuristics
//!
//! Convenience scans for the shapes human-authored spreadsheets actually
//! take: a column of figures ending in a total, a titled column with its
//! total one row below the data, an item list with trailing summary rows to
//! skip, and a set of titled columns to assemble into a table.
//!
//! All scans run over the calculated-value view and return read-formatted
//! values. "Non-empty" means a populated cell whose value is neither
//! [`CellValue::Empty`] nor empty text.

use crate::access::format_read;
use crate::manager::WorkbookManager;
use gridbook_core::{CellLoc, CellValue, Result, Sheet};
use tracing::debug;

/// How [`WorkbookManager::read_columns`] locates each requested column
#[derive(Debug, Clone)]
pub enum ColumnsMode {
    /// Each entry is an A1-style reference to a column's header cell
    Refs,
    /// Each entry is a title to find in `header_row`; data starts one row below
    Titles { header_row: u32 },
}

impl WorkbookManager {
    /// Read the last value of a contiguous vertical run starting at `loc`
    ///
    /// Leading empty cells are skipped; once data begins, the scan stops at
    /// the first empty cell and returns the value just above the gap. A
    /// column with no data at all yields `None`.
    pub fn read_total<'a>(&self, sheet: &str, loc: impl Into<CellLoc<'a>>) -> Result<Option<CellValue>> {
        let (sheet_name, start_row, col) = loc.into().resolve(sheet)?;
        let cell_sheet = self.views()?.values.sheet(&sheet_name)?;

        let mut last = None;
        for row in start_row..=cell_sheet.max_row().max(start_row) {
            if is_blank(cell_sheet, row, col) {
                if last.is_some() {
                    break;
                }
            } else {
                last = Some(row);
            }
        }

        debug!(sheet = sheet_name.as_str(), col, total_row = ?last, "scanned for total");
        Ok(last.map(|row| format_read(cell_sheet.cell(row, col))))
    }

    /// Find `title` in the row of `loc` and read the total beneath its column
    ///
    /// Scans rightward from `loc` for an exact, case-sensitive match on the
    /// title text, then runs [`read_total`](Self::read_total) starting one
    /// row below the matched header. `None` if the title is not found or its
    /// column holds no data.
    pub fn read_title_total<'a>(
        &self,
        sheet: &str,
        loc: impl Into<CellLoc<'a>>,
        title: &str,
    ) -> Result<Option<CellValue>> {
        let (sheet_name, row, start_col) = loc.into().resolve(sheet)?;
        let cell_sheet = self.views()?.values.sheet(&sheet_name)?;

        for col in start_col..=cell_sheet.max_col().max(start_col) {
            if cell_sheet.value(row, col).to_string() == title {
                debug!(sheet = sheet_name.as_str(), title, col, "matched title");
                return self.read_total(&sheet_name, (row + 1, col));
            }
        }

        debug!(sheet = sheet_name.as_str(), title, "title not found");
        Ok(None)
    }

    /// Read a contiguous vertical run of items, dropping the trailing `offset`
    ///
    /// The run starts at `loc` and ends at the first empty cell. `offset`
    /// trims summary rows (totals, footers) off the end; an offset at least
    /// as long as the run yields an empty list.
    pub fn read_items<'a>(
        &self,
        sheet: &str,
        loc: impl Into<CellLoc<'a>>,
        offset: usize,
    ) -> Result<Vec<CellValue>> {
        let (sheet_name, start_row, col) = loc.into().resolve(sheet)?;
        let cell_sheet = self.views()?.values.sheet(&sheet_name)?;

        let mut items = collect_column(cell_sheet, start_row, col);
        items.truncate(items.len().saturating_sub(offset));
        debug!(sheet = sheet_name.as_str(), col, count = items.len(), "read items");
        Ok(items)
    }

    /// Assemble a table from a set of columns, padded to equal length
    ///
    /// In [`ColumnsMode::Refs`] each entry in `columns` is an A1-style
    /// reference to a column's header cell; the header's text labels the
    /// column and its data starts one row below. In [`ColumnsMode::Titles`]
    /// each entry is a header text to locate in `header_row` (a missing
    /// title contributes no column). The result is row-major: one header row
    /// holding the resolved labels, then data rows padded with empty text
    /// where columns run short.
    pub fn read_columns(
        &self,
        sheet: &str,
        columns: &[&str],
        mode: ColumnsMode,
    ) -> Result<Vec<Vec<CellValue>>> {
        let views = self.views()?;

        let mut labels = Vec::new();
        let mut data: Vec<Vec<CellValue>> = Vec::new();

        for entry in columns {
            match &mode {
                ColumnsMode::Refs => {
                    let (sheet_name, row, col) = CellLoc::Ref(entry).resolve(sheet)?;
                    let cell_sheet = views.values.sheet(&sheet_name)?;
                    labels.push(format_read(cell_sheet.cell(row, col)));
                    data.push(collect_column(cell_sheet, row + 1, col));
                }
                ColumnsMode::Titles { header_row } => {
                    let cell_sheet = views.values.sheet(sheet)?;
                    let Some(col) = find_title(cell_sheet, *header_row, entry) else {
                        debug!(title = *entry, "title not found, skipping column");
                        continue;
                    };
                    labels.push(CellValue::Text((*entry).to_string()));
                    data.push(collect_column(cell_sheet, header_row + 1, col));
                }
            }
        }

        let depth = data.iter().map(Vec::len).max().unwrap_or(0);
        let mut table = Vec::with_capacity(depth + 1);
        table.push(labels);
        for i in 0..depth {
            table.push(
                data.iter()
                    .map(|column| {
                        column
                            .get(i)
                            .cloned()
                            .unwrap_or_else(|| CellValue::Text(String::new()))
                    })
                    .collect(),
            );
        }
        Ok(table)
    }
}

fn is_blank(sheet: &Sheet, row: u32, col: u32) -> bool {
    sheet.value(row, col).is_empty()
}

/// Collect the contiguous non-empty run downward from (start_row, col)
fn collect_column(sheet: &Sheet, start_row: u32, col: u32) -> Vec<CellValue> {
    let mut items = Vec::new();
    let mut row = start_row;
    while !is_blank(sheet, row, col) {
        items.push(format_read(sheet.cell(row, col)));
        row += 1;
    }
    items
}

/// Scan a header row left to right for an exact title match
fn find_title(sheet: &Sheet, header_row: u32, title: &str) -> Option<u32> {
    (1..=sheet.max_col()).find(|&col| sheet.value(header_row, col).to_string() == title)
}
