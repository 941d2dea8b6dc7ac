//! Cell value types

use std::fmt;

/// Represents the value stored in a cell
///
/// A coordinate carries two of these at once: the raw value in the formula
/// view and the last-computed result in the value view. gridbook never
/// evaluates formulas; a `Formula` in the value view means the authoring tool
/// had not cached a result when the file was saved.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (no value)
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// Text value
    Text(String),

    /// Formula text, always beginning with '='
    Formula(String),
}

impl CellValue {
    /// Create a formula value, prepending '=' if absent
    pub fn formula<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        if text.starts_with('=') {
            CellValue::Formula(text)
        } else {
            CellValue::Formula(format!("={text}"))
        }
    }

    /// Check if the cell is empty
    ///
    /// An empty string counts as empty: reads normalize absent cells to
    /// `Text("")`, and the traversal heuristics must treat both the same way.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula(text) => Some(text),
            _ => None,
        }
    }

    /// Get the type name for log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Formula(_) => "formula",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Formula(text) => write!(f, "{text}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

// A leading '=' marks formula text. The write path stores the string verbatim
// either way; the distinction only controls how the codec persists the cell.
impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.starts_with('=') {
            CellValue::Formula(s.to_string())
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.starts_with('=') {
            CellValue::Formula(s)
        } else {
            CellValue::Text(s)
        }
    }
}
