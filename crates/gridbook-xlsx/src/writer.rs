//! Workbook saving: persists the formula view (the structurally authoritative
//! copy) through the write codec

use crate::error::CodecResult;
use gridbook_core::{CellValue, Workbook};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::Path;

/// Number format applied to currency-tagged cells so the tag survives a
/// save/reload round trip
const CURRENCY_FORMAT: &str = "$#,##0.00";

/// Write the formula view to disk
///
/// Formula cells are written as formulas with no cached result; the write
/// codec does not evaluate them, so until some external tool recalculates the
/// file, reads of those cells surface the raw formula text.
pub fn write_views(formulas: &Workbook, path: &Path) -> CodecResult<()> {
    let mut output = XlsxWorkbook::new();
    let currency_format = Format::new().set_num_format(CURRENCY_FORMAT);

    for sheet in formulas.sheets() {
        let worksheet = output.add_worksheet().set_name(sheet.name())?;

        for (row, col, cell) in sheet.cells() {
            // The write codec is 0-based
            let r = row - 1;
            let c = (col - 1) as u16;

            match &cell.value {
                CellValue::Empty => {}
                CellValue::Number(n) if cell.currency => {
                    worksheet.write_number_with_format(r, c, *n, &currency_format)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                CellValue::Boolean(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                CellValue::Formula(text) if cell.currency => {
                    worksheet.write_formula_with_format(r, c, text.as_str(), &currency_format)?;
                    worksheet.set_formula_result(r, c, "");
                }
                CellValue::Formula(text) => {
                    worksheet.write_formula(r, c, text.as_str())?;
                    // The codec's default cached result is 0; clear it so a
                    // reload surfaces the raw formula text, not a fabricated
                    // value
                    worksheet.set_formula_result(r, c, "");
                }
            }
        }
    }

    output.save(path)?;
    tracing::debug!(path = %path.display(), "wrote workbook");
    Ok(())
}
