//! End-to-end codec tests (write -> read -> verify both views)

use gridbook_core::{CellValue, Workbook};
use gridbook_xlsx::{read_views, write_views};
use pretty_assertions::assert_eq;

#[test]
fn test_literal_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("literals.xlsx");

    let mut wb = Workbook::new();
    let sheet = wb.sheet_mut("Sheet1").unwrap();
    sheet.set_value(1, 1, CellValue::from("Hello"));
    sheet.set_value(1, 2, CellValue::from(42.5));
    sheet.set_value(2, 1, CellValue::from(true));

    write_views(&wb, &path).unwrap();
    let (formulas, values) = read_views(&path).unwrap();

    for view in [&formulas, &values] {
        let sheet = view.sheet("Sheet1").unwrap();
        assert_eq!(sheet.value(1, 1), CellValue::Text("Hello".into()));
        assert_eq!(sheet.value(1, 2), CellValue::Number(42.5));
        assert_eq!(sheet.value(2, 1), CellValue::Boolean(true));
    }
}

#[test]
fn test_formula_lands_in_both_views() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formulas.xlsx");

    let mut wb = Workbook::new();
    let sheet = wb.sheet_mut("Sheet1").unwrap();
    sheet.set_value(1, 1, CellValue::from(10));
    sheet.set_value(1, 2, CellValue::from("=A1*2"));

    write_views(&wb, &path).unwrap();
    let (formulas, values) = read_views(&path).unwrap();

    // Formula view preserves the text verbatim
    assert_eq!(
        formulas.sheet("Sheet1").unwrap().value(1, 2),
        CellValue::Formula("=A1*2".into())
    );

    // The write codec computes nothing, so the value view has no cached
    // result and falls back to the raw formula text
    assert_eq!(
        values.sheet("Sheet1").unwrap().value(1, 2),
        CellValue::Formula("=A1*2".into())
    );
}

#[test]
fn test_cached_formula_result_splits_the_views() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cached.xlsx");

    // Author a file whose formula cell carries a computed result, the way a
    // spreadsheet application leaves it after recalculation
    let mut output = rust_xlsxwriter::Workbook::new();
    let worksheet = output.add_worksheet();
    worksheet.write_number(0, 0, 2.0).unwrap();
    worksheet.write_formula(0, 1, "=A1*3").unwrap();
    worksheet.set_formula_result(0, 1, "6");
    output.save(&path).unwrap();

    let (formulas, values) = read_views(&path).unwrap();

    // Formula view carries the text, value view the cached number
    assert_eq!(
        formulas.sheet("Sheet1").unwrap().value(1, 2),
        CellValue::Formula("=A1*3".into())
    );
    assert_eq!(
        values.sheet("Sheet1").unwrap().value(1, 2),
        CellValue::Number(6.0)
    );
}

#[test]
fn test_multiple_sheets_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheets.xlsx");

    let mut wb = Workbook::new();
    wb.add_sheet("Data").unwrap();
    wb.add_sheet("Summary").unwrap();
    wb.sheet_mut("Summary")
        .unwrap()
        .set_value(3, 3, CellValue::from("total"));

    write_views(&wb, &path).unwrap();
    let (formulas, values) = read_views(&path).unwrap();

    assert_eq!(formulas.sheet_names(), vec!["Sheet1", "Data", "Summary"]);
    assert_eq!(values.sheet_names(), vec!["Sheet1", "Data", "Summary"]);
    assert_eq!(
        values.sheet("Summary").unwrap().value(3, 3),
        CellValue::Text("total".into())
    );
}

#[test]
fn test_currency_tag_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("currency.xlsx");

    // Write a currency-formatted cell directly through the write codec, the
    // way any external authoring tool would produce one
    let mut output = rust_xlsxwriter::Workbook::new();
    let format = rust_xlsxwriter::Format::new().set_num_format("$#,##0.00");
    let worksheet = output.add_worksheet().set_name("Money").unwrap();
    worksheet.write_number_with_format(0, 0, 1234.5, &format).unwrap();
    worksheet.write_number(0, 1, 1234.5).unwrap();
    output.save(&path).unwrap();

    let (_, values) = read_views(&path).unwrap();
    let sheet = values.sheet("Money").unwrap();

    assert!(sheet.cell(1, 1).unwrap().currency);
    assert!(!sheet.cell(1, 2).unwrap().currency);
    assert_eq!(sheet.value(1, 1), CellValue::Number(1234.5));
}

#[test]
fn test_missing_file() {
    assert!(read_views(std::path::Path::new("/nonexistent/missing.xlsx")).is_err());
}
