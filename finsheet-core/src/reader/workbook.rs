//! Workbook data structures

use std::path::PathBuf;

/// Represents a loaded workbook. Every sheet is one company.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Source path, `None` when loaded from in-memory bytes
    pub path: Option<PathBuf>,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Company names, in workbook order
    pub fn companies(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet: a header row and the data rows below it.
///
/// Column 0 is the label column whatever its header says. Rows are padded
/// to the header width by the reader.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(
        name: impl Into<String>,
        headers: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Number of columns, label column included
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Get the cell at (row, col) of the data area
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Header text for a column; blank headers yield an empty string
    pub fn header_text(&self, col: usize) -> String {
        self.headers
            .get(col)
            .and_then(CellValue::as_text)
            .unwrap_or_default()
    }

    /// Iterate the label column top-to-bottom
    pub fn labels(&self) -> impl Iterator<Item = &CellValue> {
        self.rows
            .iter()
            .map(|row| row.first().unwrap_or(&EMPTY))
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Render the cell as text. `Empty` and `Error` cells have no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Boolean(true) => Some("TRUE".to_string()),
            CellValue::Boolean(false) => Some("FALSE".to_string()),
        }
    }

    /// Coerce to a number. Anything that does not parse is absent.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Empty | CellValue::Error(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Integral values print without a fractional part, so a year label stored
/// as `2024.0` reads back as `2024`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
