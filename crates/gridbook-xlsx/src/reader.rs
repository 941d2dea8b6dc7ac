//! Workbook loading: one pass over the container produces both in-memory views

use crate::currency;
use crate::error::{CodecError, CodecResult};
use calamine::{open_workbook_auto, Data, Reader};
use gridbook_core::{CellValue, Sheet, Workbook};
use std::path::Path;

/// Load a workbook file into its two views: (formula view, value view)
///
/// The value view holds each formula cell's last cached result exactly as the
/// authoring tool stored it; nothing is evaluated here. A formula cell the
/// authoring tool never recalculated has no cached result, in which case the
/// value view falls back to the raw formula text.
pub fn read_views(path: &Path) -> CodecResult<(Workbook, Workbook)> {
    let mut source = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = source.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(CodecError::InvalidFormat(format!(
            "{} contains no sheets",
            path.display()
        )));
    }

    // Per-cell currency tags are not exposed by the read codec; recover them
    // from the container's style records. Lenient: non-OOXML inputs yield none.
    let currency_tags = currency::currency_cells(path);

    let mut formulas = Workbook::empty();
    let mut values = Workbook::empty();

    for name in &sheet_names {
        let mut formula_sheet = Sheet::new(name.clone());
        let mut value_sheet = Sheet::new(name.clone());

        let range = source.worksheet_range(name)?;
        let (base_row, base_col) = range.start().unwrap_or((0, 0));

        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, data) in row.iter().enumerate() {
                let value = data_to_value(data);
                if value.is_empty() {
                    continue;
                }
                let r = base_row + row_idx as u32 + 1;
                let c = base_col + col_idx as u32 + 1;
                formula_sheet.set_value(r, c, value.clone());
                value_sheet.set_value(r, c, value);
            }
        }

        // Overlay formula text onto the formula view. The value view keeps
        // whatever cached result the range carried for those cells.
        if let Ok(formula_range) = source.worksheet_formula(name) {
            let (base_row, base_col) = formula_range.start().unwrap_or((0, 0));

            for (row_idx, row) in formula_range.rows().enumerate() {
                for (col_idx, text) in row.iter().enumerate() {
                    if text.is_empty() {
                        continue;
                    }
                    let r = base_row + row_idx as u32 + 1;
                    let c = base_col + col_idx as u32 + 1;
                    let formula = CellValue::formula(text.as_str());
                    if matches!(value_sheet.value(r, c), CellValue::Empty) {
                        value_sheet.set_value(r, c, formula.clone());
                    }
                    formula_sheet.set_value(r, c, formula);
                }
            }
        }

        if let Some(tagged) = currency_tags.get(name) {
            for &(r, c) in tagged {
                formula_sheet.set_currency(r, c, true);
                value_sheet.set_currency(r, c, true);
            }
        }

        tracing::debug!(
            sheet = name.as_str(),
            cells = value_sheet.cell_count(),
            "loaded sheet"
        );

        formulas.push_sheet(formula_sheet)?;
        values.push_sheet(value_sheet)?;
    }

    Ok((formulas, values))
}

fn data_to_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Text(e.to_string()),
        // Dates stay as serial numbers; display formatting is out of scope
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
