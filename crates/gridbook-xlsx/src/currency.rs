//! Currency tag recovery from raw OOXML style records
//!
//! The read codec surfaces values but not number formats, so the currency
//! display tag is recovered with a direct scan of the container: styles.xml
//! tells us which style indices carry a currency number format, and each
//! sheet's XML tells us which cells use those indices.
//!
//! The scan is best-effort: anything unreadable (a legacy binary workbook, a
//! malformed part) simply yields no tags.

use gridbook_core::letters_to_column;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Map of sheet name to the (row, col) coordinates of currency-formatted cells
pub(crate) fn currency_cells(path: &Path) -> HashMap<String, HashSet<(u32, u32)>> {
    let mut tags: HashMap<String, HashSet<(u32, u32)>> = HashMap::new();

    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return tags,
    };
    let mut archive = match ZipArchive::new(file) {
        Ok(a) => a,
        Err(_) => return tags, // not a zip container (e.g. legacy xls)
    };

    let styles_xml = match read_entry(&mut archive, "xl/styles.xml") {
        Some(s) => s,
        None => return tags,
    };
    let currency_xfs = parse_currency_xfs(&styles_xml);
    if currency_xfs.is_empty() {
        return tags;
    }

    let workbook_xml = match read_entry(&mut archive, "xl/workbook.xml") {
        Some(s) => s,
        None => return tags,
    };
    let rels_xml = match read_entry(&mut archive, "xl/_rels/workbook.xml.rels") {
        Some(s) => s,
        None => return tags,
    };

    for (sheet_name, part) in sheet_parts(&workbook_xml, &rels_xml) {
        let sheet_xml = match read_entry(&mut archive, &part) {
            Some(s) => s,
            None => continue,
        };
        let cells = scan_sheet_cells(&sheet_xml, &currency_xfs);
        if !cells.is_empty() {
            tracing::debug!(sheet = sheet_name.as_str(), count = cells.len(), "currency cells");
            tags.insert(sheet_name, cells);
        }
    }

    tags
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Option<String> {
    let mut entry = archive.by_name(name).ok()?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml).ok()?;
    Some(xml)
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.into_owned()).ok())
}

/// Builtin number format ids reserved for currency/accounting styles
fn builtin_is_currency(id: u32) -> bool {
    matches!(id, 5..=8 | 42 | 44)
}

/// Scan styles.xml for the set of cellXfs indices carrying a currency format
fn parse_currency_xfs(xml: &str) -> HashSet<usize> {
    let mut custom_formats: HashMap<u32, String> = HashMap::new();
    let mut currency_xfs = HashSet::new();

    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut in_cell_xfs = false;
    let mut xf_index = 0usize;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(ev) => ev,
            Err(_) => break,
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.name().as_ref() {
                b"numFmt" => {
                    if let (Some(id), Some(code)) =
                        (attr(e, b"numFmtId"), attr(e, b"formatCode"))
                    {
                        if let Ok(id) = id.parse() {
                            custom_formats.insert(id, code);
                        }
                    }
                }
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => {
                    let fmt_id: Option<u32> =
                        attr(e, b"numFmtId").and_then(|v| v.parse().ok());
                    if let Some(id) = fmt_id {
                        let is_currency = builtin_is_currency(id)
                            || custom_formats
                                .get(&id)
                                .is_some_and(|code| code.contains('$'));
                        if is_currency {
                            currency_xfs.insert(xf_index);
                        }
                    }
                    xf_index += 1;
                }
                _ => {}
            },
            Event::End(ref e) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    currency_xfs
}

/// Resolve (sheet name, zip entry path) pairs from workbook.xml and its rels
fn sheet_parts(workbook_xml: &str, rels_xml: &str) -> Vec<(String, String)> {
    let mut targets: HashMap<String, String> = HashMap::new();

    let mut reader = XmlReader::from_str(rels_xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    let path = if let Some(absolute) = target.strip_prefix('/') {
                        absolute.to_string()
                    } else {
                        format!("xl/{target}")
                    };
                    targets.insert(id, path);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let mut parts = Vec::new();
    let mut reader = XmlReader::from_str(workbook_xml);
    buf.clear();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"sheet" =>
            {
                if let (Some(name), Some(rid)) = (attr(e, b"name"), attr(e, b"r:id")) {
                    if let Some(target) = targets.get(&rid) {
                        parts.push((name, target.clone()));
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    parts
}

/// Collect 1-based coordinates of cells whose style index is a currency xf
fn scan_sheet_cells(xml: &str, currency_xfs: &HashSet<usize>) -> HashSet<(u32, u32)> {
    let mut cells = HashSet::new();
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"c" => {
                let style: Option<usize> = attr(e, b"s").and_then(|v| v.parse().ok());
                if style.is_some_and(|s| currency_xfs.contains(&s)) {
                    if let Some(coords) = attr(e, b"r").as_deref().and_then(parse_a1) {
                        cells.insert(coords);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    cells
}

/// Split an A1-style cell address into (row, col), both 1-based
fn parse_a1(r: &str) -> Option<(u32, u32)> {
    let digits_at = r.find(|c: char| c.is_ascii_digit())?;
    let col = letters_to_column(&r[..digits_at]).ok()?;
    let row: u32 = r[digits_at..].parse().ok()?;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1() {
        assert_eq!(parse_a1("A1"), Some((1, 1)));
        assert_eq!(parse_a1("AB12"), Some((12, 28)));
        assert_eq!(parse_a1("12"), None);
        assert_eq!(parse_a1("AB"), None);
    }

    #[test]
    fn test_parse_currency_xfs() {
        let xml = r#"<styleSheet>
            <numFmts count="1">
                <numFmt numFmtId="164" formatCode="&quot;$&quot;#,##0.00"/>
            </numFmts>
            <cellXfs count="3">
                <xf numFmtId="0"/>
                <xf numFmtId="164" applyNumberFormat="1"/>
                <xf numFmtId="44" applyNumberFormat="1"/>
            </cellXfs>
        </styleSheet>"#;

        let xfs = parse_currency_xfs(xml);
        assert!(!xfs.contains(&0));
        assert!(xfs.contains(&1)); // custom code contains '$'
        assert!(xfs.contains(&2)); // builtin accounting format
    }

    #[test]
    fn test_scan_sheet_cells() {
        let xml = r#"<worksheet><sheetData>
            <row r="1">
                <c r="A1" s="1" t="n"><v>9.5</v></c>
                <c r="B1" t="n"><v>3</v></c>
            </row>
        </sheetData></worksheet>"#;

        let xfs: HashSet<usize> = [1].into_iter().collect();
        let cells = scan_sheet_cells(xml, &xfs);
        assert!(cells.contains(&(1, 1)));
        assert!(!cells.contains(&(1, 2)));
    }
}
