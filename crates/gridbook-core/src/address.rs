//! Cell reference and range parsing
//!
//! References use A1 notation with an optional `Sheet!` qualifier. Rows and
//! columns are 1-based throughout the public API, matching how spreadsheet
//! users count them.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A parsed cell reference (e.g., "A1", "Sheet2!B3", "'My Sheet'!$C$4")
///
/// The `$` absolute markers are accepted and discarded; gridbook never copies
/// formulas, so relative/absolute makes no difference here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Sheet name from a `Sheet!` qualifier, if present (quotes stripped)
    pub sheet: Option<String>,
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u32,
}

impl CellRef {
    /// Create an unqualified reference from 1-based coordinates
    pub fn new(row: u32, col: u32) -> Result<Self> {
        check_coords(row, col)?;
        Ok(Self {
            sheet: None,
            row,
            col,
        })
    }

    /// Parse a reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use gridbook_core::CellRef;
    ///
    /// let r = CellRef::parse("A1").unwrap();
    /// assert_eq!((r.row, r.col), (1, 1));
    ///
    /// let r = CellRef::parse("Data!AB3").unwrap();
    /// assert_eq!(r.sheet.as_deref(), Some("Data"));
    /// assert_eq!((r.row, r.col), (3, 28));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidReference("empty reference".into()));
        }

        let (sheet, cell) = match s.rfind('!') {
            Some(pos) => (Some(strip_quotes(&s[..pos]).to_string()), &s[pos + 1..]),
            None => (None, s),
        };

        if let Some(name) = &sheet {
            if name.is_empty() {
                return Err(Error::InvalidReference(format!("empty sheet name in '{s}'")));
            }
        }

        let (row, col) = parse_coords(cell)
            .ok_or_else(|| Error::InvalidReference(format!("not a cell reference: '{s}'")))?;
        check_coords(row, col)?;

        Ok(Self { sheet, row, col })
    }

    /// Parse a reference, filling in `default_sheet` when unqualified
    pub fn parse_with_default(s: &str, default_sheet: &str) -> Result<Self> {
        let mut r = Self::parse(s)?;
        if r.sheet.is_none() {
            r.sheet = Some(default_sheet.to_string());
        }
        Ok(r)
    }

    /// The sheet this reference resolves to, falling back to `default`
    pub fn sheet_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.sheet.as_deref().unwrap_or(default)
    }

    /// Format as an A1-style string (without sheet qualifier)
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) => write!(f, "{}!{}", sheet, self.to_a1()),
            None => write!(f, "{}", self.to_a1()),
        }
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A parsed rectangular range (e.g., "A1:C5", "Data!B2:D10")
///
/// Both ends are parsed independently and normalized so `start_*` is the
/// top-left corner. A sheet qualifier on either half applies to the whole
/// range; a single cell parses as a degenerate one-cell range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeRef {
    /// Sheet name from a qualifier, if present
    pub sheet: Option<String>,
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeRef {
    /// Build a range from 1-based corner coordinates, normalizing corners
    pub fn from_corners(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Result<Self> {
        check_coords(start_row, start_col)?;
        check_coords(end_row, end_col)?;
        Ok(Self {
            sheet: None,
            start_row: start_row.min(end_row),
            start_col: start_col.min(end_col),
            end_row: start_row.max(end_row),
            end_col: start_col.max(end_col),
        })
    }

    /// Parse a range from `A1:C5` notation (single cells also accepted)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let (start, end) = match s.find(':') {
            Some(pos) => {
                let start = CellRef::parse(&s[..pos])?;
                let end = CellRef::parse(&s[pos + 1..])?;
                (start, end)
            }
            None => {
                let cell = CellRef::parse(s)?;
                (cell.clone(), cell)
            }
        };

        let mut range = Self::from_corners(start.row, start.col, end.row, end.col)?;
        range.sheet = start.sheet.or(end.sheet);
        Ok(range)
    }

    /// Parse a range, filling in `default_sheet` when unqualified
    pub fn parse_with_default(s: &str, default_sheet: &str) -> Result<Self> {
        let mut r = Self::parse(s)?;
        if r.sheet.is_none() {
            r.sheet = Some(default_sheet.to_string());
        }
        Ok(r)
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// Number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = format!(
            "{}{}:{}{}",
            column_letters(self.start_col),
            self.start_row,
            column_letters(self.end_col),
            self.end_row
        );
        match &self.sheet {
            Some(sheet) => write!(f, "{sheet}!{cells}"),
            None => write!(f, "{cells}"),
        }
    }
}

impl FromStr for RangeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A cell locator: either a reference string or explicit 1-based coordinates
///
/// Every accessor operation takes `impl Into<CellLoc>`, so both calling
/// conventions are first-class:
///
/// ```
/// use gridbook_core::CellLoc;
///
/// let by_ref: CellLoc = "B3".into();
/// let by_pos: CellLoc = (3, 2).into();
/// ```
#[derive(Debug, Clone)]
pub enum CellLoc<'a> {
    /// A1-style reference, optionally sheet-qualified
    Ref(&'a str),
    /// Explicit (row, column), 1-based
    At(u32, u32),
}

impl<'a> CellLoc<'a> {
    /// Resolve to (sheet, row, col), with the reference's own qualifier
    /// taking precedence over `default_sheet`
    pub fn resolve(&self, default_sheet: &str) -> Result<(String, u32, u32)> {
        match self {
            CellLoc::Ref(s) => {
                let r = CellRef::parse(s)?;
                Ok((r.sheet_or(default_sheet).to_string(), r.row, r.col))
            }
            CellLoc::At(row, col) => {
                check_coords(*row, *col)?;
                Ok((default_sheet.to_string(), *row, *col))
            }
        }
    }
}

impl<'a> From<&'a str> for CellLoc<'a> {
    fn from(s: &'a str) -> Self {
        CellLoc::Ref(s)
    }
}

impl From<(u32, u32)> for CellLoc<'_> {
    fn from((row, col): (u32, u32)) -> Self {
        CellLoc::At(row, col)
    }
}

/// A range locator: a reference string or explicit 1-based corners
#[derive(Debug, Clone)]
pub enum RangeLoc<'a> {
    /// A1-style range (or single-cell) reference
    Ref(&'a str),
    /// Explicit (start_row, start_col, end_row, end_col), 1-based
    Corners(u32, u32, u32, u32),
}

impl<'a> RangeLoc<'a> {
    /// Resolve to a sheet name plus normalized corner coordinates
    pub fn resolve(&self, default_sheet: &str) -> Result<(String, RangeRef)> {
        match self {
            RangeLoc::Ref(s) => {
                let r = RangeRef::parse(s)?;
                let sheet = r.sheet.clone().unwrap_or_else(|| default_sheet.to_string());
                Ok((sheet, r))
            }
            RangeLoc::Corners(sr, sc, er, ec) => {
                Ok((default_sheet.to_string(), RangeRef::from_corners(*sr, *sc, *er, *ec)?))
            }
        }
    }
}

impl<'a> From<&'a str> for RangeLoc<'a> {
    fn from(s: &'a str) -> Self {
        RangeLoc::Ref(s)
    }
}

impl From<(u32, u32, u32, u32)> for RangeLoc<'_> {
    fn from((sr, sc, er, ec): (u32, u32, u32, u32)) -> Self {
        RangeLoc::Corners(sr, sc, er, ec)
    }
}

/// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, ...)
pub fn column_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 1-based number (A = 1, Z = 26, AA = 27, ...)
///
/// Letters are case-insensitive. This inverts [`column_letters`] exactly.
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidReference("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidReference(format!(
                "invalid column letter '{c}'"
            )));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS {
            return Err(Error::InvalidReference(format!(
                "column '{letters}' out of bounds"
            )));
        }
    }

    Ok(col)
}

/// Validate 1-based coordinates against the sheet limits
pub fn check_coords(row: u32, col: u32) -> Result<()> {
    if row == 0 || col == 0 {
        return Err(Error::InvalidReference(format!(
            "row and column are 1-based, got ({row}, {col})"
        )));
    }
    if row > MAX_ROWS {
        return Err(Error::InvalidReference(format!("row {row} out of bounds")));
    }
    if col > MAX_COLS {
        return Err(Error::InvalidReference(format!("column {col} out of bounds")));
    }
    Ok(())
}

/// Split a bare cell token ("B12", "$AB$3") into (row, col); None if malformed
fn parse_coords(cell: &str) -> Option<(u32, u32)> {
    let bytes = cell.as_bytes();
    let mut pos = 0;

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    let col_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    if pos == col_start {
        return None;
    }
    let col = letters_to_column(&cell[col_start..pos]).ok()?;

    if bytes.get(pos) == Some(&b'$') {
        pos += 1;
    }

    let row_str = &cell[pos..];
    if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: u32 = row_str.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((row, col))
}

/// Strip a matched pair of surrounding single quotes from a sheet name
fn strip_quotes(name: &str) -> &str {
    let name = name.trim();
    if name.len() >= 2 && name.starts_with('\'') && name.ends_with('\'') {
        &name[1..name.len() - 1]
    } else {
        name
    }
}
