//! Workbook type - an ordered collection of uniquely named sheets

use crate::error::{Error, Result};
use crate::sheet::Sheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook: one in-memory view of a spreadsheet document
///
/// The dual-view store owns two of these per open document (a formula view
/// and a value view) and keeps their sheet sets name-synchronized.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a new workbook with one default sheet
    pub fn new() -> Self {
        Self {
            sheets: vec![Sheet::new("Sheet1")],
        }
    }

    /// Create a workbook with no sheets (codec use only; a workbook handed
    /// to callers always has at least one sheet)
    pub fn empty() -> Self {
        Self { sheets: Vec::new() }
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get the sheet names in order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name().to_string()).collect()
    }

    /// Check whether a sheet with this name exists
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name() == name)
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Get a mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Iterate over all sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Add a sheet with the given name
    ///
    /// Creating a sheet that already exists is a no-op returning the
    /// existing sheet, not an error.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        validate_sheet_name(name)?;

        if let Some(pos) = self.sheets.iter().position(|s| s.name() == name) {
            return Ok(&mut self.sheets[pos]);
        }

        self.sheets.push(Sheet::new(name));
        Ok(self.sheets.last_mut().expect("just pushed"))
    }

    /// Append an already-built sheet (codec use; name must be unused)
    pub fn push_sheet(&mut self, sheet: Sheet) -> Result<()> {
        validate_sheet_name(sheet.name())?;
        if self.has_sheet(sheet.name()) {
            return Err(Error::InvalidSheetName(format!(
                "duplicate sheet name: {}",
                sheet.name()
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    /// Remove a sheet by name
    ///
    /// Refuses to remove the workbook's only remaining sheet.
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet> {
        let pos = self
            .sheets
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;

        if self.sheets.len() == 1 {
            return Err(Error::LastSheet(name.to_string()));
        }

        Ok(self.sheets.remove(pos))
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a sheet name against the container format's rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("sheet name cannot be empty".into()));
    }
    if name.len() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "sheet name too long (max {MAX_SHEET_NAME_LEN} characters)"
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    for c in INVALID_CHARS {
        if name.contains(*c) {
            return Err(Error::InvalidSheetName(format!(
                "sheet name cannot contain '{c}'"
            )));
        }
    }

    Ok(())
}
