//! Cell and range access
//!
//! Reads go through the calculated-value view and pass the read boundary
//! formatter: absent cells become empty text, numbers are rounded to two
//! decimal places, and currency-tagged numbers render as `$`-prefixed text.
//! Writes land verbatim in both views, so a literal written through the
//! manager reads back immediately, while a written formula stays raw text
//! until a save-and-reload gives the file a chance to compute it.

use crate::manager::WorkbookManager;
use gridbook_core::{check_coords, Cell, CellLoc, CellRef, CellValue, RangeLoc, Result};
use tracing::{debug, info};

/// Apply read-boundary formatting to a raw cell
pub(crate) fn format_read(cell: Option<&Cell>) -> CellValue {
    let Some(cell) = cell else {
        return CellValue::Text(String::new());
    };
    match &cell.value {
        CellValue::Empty => CellValue::Text(String::new()),
        CellValue::Number(n) => {
            let rounded = (n * 100.0).round() / 100.0;
            if cell.currency {
                CellValue::Text(format!("${rounded}"))
            } else {
                CellValue::Number(rounded)
            }
        }
        other => other.clone(),
    }
}

impl WorkbookManager {
    /// Read a single cell through the calculated-value view
    ///
    /// `loc` is either an A1-style reference (a `Sheet!` qualifier overrides
    /// the `sheet` argument) or an explicit 1-based `(row, col)` pair.
    pub fn read_cell<'a>(&self, sheet: &str, loc: impl Into<CellLoc<'a>>) -> Result<CellValue> {
        let (sheet_name, row, col) = loc.into().resolve(sheet)?;
        let cell_sheet = self.views()?.values.sheet(&sheet_name)?;
        let value = format_read(cell_sheet.cell(row, col));
        debug!(sheet = sheet_name.as_str(), row, col, %value, "read cell");
        Ok(value)
    }

    /// Read a cell, following a direct cell-reference formula one hop
    ///
    /// When the cell's raw content is a formula like `=B2` or `=Data!C3`,
    /// the referenced cell is read instead (without further hops). Formulas
    /// that are anything more than a bare reference are returned as their
    /// raw text; non-formula cells read exactly like [`read_cell`](Self::read_cell).
    pub fn read_cell_hopped<'a>(
        &self,
        sheet: &str,
        loc: impl Into<CellLoc<'a>>,
    ) -> Result<CellValue> {
        let (sheet_name, row, col) = loc.into().resolve(sheet)?;
        let raw = self.views()?.formulas.sheet(&sheet_name)?.value(row, col);

        if let CellValue::Formula(text) = &raw {
            match CellRef::parse(text.trim_start_matches('=')) {
                Ok(target) => {
                    let target_sheet = target.sheet_or(&sheet_name).to_string();
                    debug!(
                        from = format!("{sheet_name}!({row},{col})"),
                        to = format!("{target_sheet}!({},{})", target.row, target.col),
                        "following cell reference"
                    );
                    return self.read_cell(&target_sheet, (target.row, target.col));
                }
                Err(_) => {
                    debug!(formula = text.as_str(), "not a direct reference, returning raw text");
                    return Ok(raw);
                }
            }
        }

        self.read_cell(&sheet_name, (row, col))
    }

    /// Write a single cell into both views
    pub fn write_cell<'a>(
        &mut self,
        sheet: &str,
        loc: impl Into<CellLoc<'a>>,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        let (sheet_name, row, col) = loc.into().resolve(sheet)?;
        let value = value.into();
        let views = self.views_mut()?;

        // Validate the sheet before touching either view
        views.formulas.sheet(&sheet_name)?;

        views
            .formulas
            .sheet_mut(&sheet_name)?
            .set_value(row, col, value.clone());
        views
            .values
            .sheet_mut(&sheet_name)?
            .set_value(row, col, value.clone());
        info!(sheet = sheet_name.as_str(), row, col, %value, "wrote cell");
        Ok(())
    }

    /// Read a rectangular range, row-major, with read-boundary formatting
    pub fn read_range<'a>(
        &self,
        sheet: &str,
        loc: impl Into<RangeLoc<'a>>,
    ) -> Result<Vec<Vec<CellValue>>> {
        let (sheet_name, range) = loc.into().resolve(sheet)?;
        let cell_sheet = self.views()?.values.sheet(&sheet_name)?;

        let mut rows = Vec::with_capacity(range.row_count() as usize);
        for row in range.start_row..=range.end_row {
            let mut cells = Vec::with_capacity(range.col_count() as usize);
            for col in range.start_col..=range.end_col {
                cells.push(format_read(cell_sheet.cell(row, col)));
            }
            rows.push(cells);
        }
        debug!(
            sheet = sheet_name.as_str(),
            range = %range,
            "read range"
        );
        Ok(rows)
    }

    /// Write a block of values row-major, anchored at `loc`'s top-left cell
    ///
    /// Rows may be ragged; every target coordinate is bounds-checked before
    /// any cell is written.
    pub fn write_range<'a>(
        &mut self,
        sheet: &str,
        loc: impl Into<CellLoc<'a>>,
        rows: &[Vec<CellValue>],
    ) -> Result<()> {
        let (sheet_name, start_row, start_col) = loc.into().resolve(sheet)?;

        for (i, row) in rows.iter().enumerate() {
            for (j, _) in row.iter().enumerate() {
                check_coords(start_row + i as u32, start_col + j as u32)?;
            }
        }

        let views = self.views_mut()?;
        views.formulas.sheet(&sheet_name)?;

        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let (r, c) = (start_row + i as u32, start_col + j as u32);
                views.formulas.sheet_mut(&sheet_name)?.set_value(r, c, value.clone());
                views.values.sheet_mut(&sheet_name)?.set_value(r, c, value.clone());
            }
        }
        info!(
            sheet = sheet_name.as_str(),
            rows = rows.len(),
            row = start_row,
            col = start_col,
            "wrote range"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbook_core::Error;
    use pretty_assertions::assert_eq;

    fn manager() -> WorkbookManager {
        let mut m = WorkbookManager::new();
        m.create(None).unwrap();
        m
    }

    #[test]
    fn test_format_read_absent_is_empty_text() {
        assert_eq!(format_read(None), CellValue::Text("".into()));
    }

    #[test]
    fn test_format_read_rounds_numbers() {
        let cell = Cell {
            value: CellValue::Number(3.14159),
            currency: false,
        };
        assert_eq!(format_read(Some(&cell)), CellValue::Number(3.14));
    }

    #[test]
    fn test_format_read_currency() {
        let cell = Cell {
            value: CellValue::Number(1234.5),
            currency: true,
        };
        assert_eq!(format_read(Some(&cell)), CellValue::Text("$1234.5".into()));
    }

    #[test]
    fn test_write_then_read_by_reference() {
        let mut m = manager();
        m.write_cell("Sheet1", "B2", 42).unwrap();

        assert_eq!(m.read_cell("Sheet1", "B2").unwrap(), CellValue::Number(42.0));
        assert_eq!(m.read_cell("Sheet1", (2, 2)).unwrap(), CellValue::Number(42.0));
    }

    #[test]
    fn test_sheet_qualifier_overrides_argument() {
        let mut m = manager();
        m.create_sheet("Data").unwrap();
        m.write_cell("Sheet1", "Data!A1", "hello").unwrap();

        assert_eq!(
            m.read_cell("Sheet1", "Data!A1").unwrap(),
            CellValue::Text("hello".into())
        );
        assert_eq!(
            m.read_cell("Data", "A1").unwrap(),
            CellValue::Text("hello".into())
        );
    }

    #[test]
    fn test_formula_write_reads_back_raw_before_save() {
        let mut m = manager();
        m.write_cell("Sheet1", "A1", "=SUM(B1:B3)").unwrap();

        assert_eq!(
            m.read_cell("Sheet1", "A1").unwrap(),
            CellValue::Formula("=SUM(B1:B3)".into())
        );
    }

    #[test]
    fn test_read_unknown_sheet() {
        let m = manager();
        assert!(matches!(
            m.read_cell("Missing", "A1"),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_read_invalid_reference() {
        let m = manager();
        assert!(matches!(
            m.read_cell("Sheet1", "A0"),
            Err(Error::InvalidReference(_))
        ));
        assert!(matches!(
            m.read_cell("Sheet1", (0, 1)),
            Err(Error::InvalidReference(_))
        ));
    }

    #[test]
    fn test_hop_follows_direct_reference() {
        let mut m = manager();
        m.write_cell("Sheet1", "B2", 42).unwrap();
        m.write_cell("Sheet1", "A1", "=B2").unwrap();

        assert_eq!(
            m.read_cell_hopped("Sheet1", "A1").unwrap(),
            CellValue::Number(42.0)
        );
    }

    #[test]
    fn test_hop_follows_cross_sheet_reference() {
        let mut m = manager();
        m.create_sheet("Data").unwrap();
        m.write_cell("Data", "C3", "payload").unwrap();
        m.write_cell("Sheet1", "A1", "=Data!C3").unwrap();

        assert_eq!(
            m.read_cell_hopped("Sheet1", "A1").unwrap(),
            CellValue::Text("payload".into())
        );
    }

    #[test]
    fn test_hop_is_single_level() {
        let mut m = manager();
        m.write_cell("Sheet1", "C3", 7).unwrap();
        m.write_cell("Sheet1", "B2", "=C3").unwrap();
        m.write_cell("Sheet1", "A1", "=B2").unwrap();

        // One hop lands on B2, which is read plainly: its raw formula text
        assert_eq!(
            m.read_cell_hopped("Sheet1", "A1").unwrap(),
            CellValue::Formula("=C3".into())
        );
    }

    #[test]
    fn test_hop_leaves_computed_formulas_alone() {
        let mut m = manager();
        m.write_cell("Sheet1", "A1", "=SUM(B1:B3)").unwrap();

        assert_eq!(
            m.read_cell_hopped("Sheet1", "A1").unwrap(),
            CellValue::Formula("=SUM(B1:B3)".into())
        );
    }

    #[test]
    fn test_hop_on_plain_cell() {
        let mut m = manager();
        m.write_cell("Sheet1", "A1", "plain").unwrap();

        assert_eq!(
            m.read_cell_hopped("Sheet1", "A1").unwrap(),
            CellValue::Text("plain".into())
        );
    }

    #[test]
    fn test_range_roundtrip() {
        let mut m = manager();
        let block = vec![
            vec![CellValue::from("a"), CellValue::from(1)],
            vec![CellValue::from("b"), CellValue::from(2)],
        ];
        m.write_range("Sheet1", "B2", &block).unwrap();

        assert_eq!(m.read_range("Sheet1", "B2:C3").unwrap(), block);
        assert_eq!(m.read_range("Sheet1", (2, 2, 3, 3)).unwrap(), block);
    }

    #[test]
    fn test_range_read_pads_absent_cells() {
        let mut m = manager();
        m.write_cell("Sheet1", "A1", "x").unwrap();

        assert_eq!(
            m.read_range("Sheet1", "A1:B1").unwrap(),
            vec![vec![CellValue::Text("x".into()), CellValue::Text("".into())]]
        );
    }

    #[test]
    fn test_single_cell_range() {
        let mut m = manager();
        m.write_cell("Sheet1", "A1", 5).unwrap();

        assert_eq!(
            m.read_range("Sheet1", "A1").unwrap(),
            vec![vec![CellValue::Number(5.0)]]
        );
    }

    #[test]
    fn test_write_range_bounds_checked_before_mutation() {
        let mut m = manager();
        let block = vec![vec![CellValue::from(1); 3]];

        // Anchored past the last column, the third cell would overflow
        assert!(m
            .write_range("Sheet1", (1, gridbook_core::MAX_COLS - 1), &block)
            .is_err());
        assert_eq!(
            m.read_cell("Sheet1", (1, gridbook_core::MAX_COLS - 1)).unwrap(),
            CellValue::Text("".into())
        );
    }
}
