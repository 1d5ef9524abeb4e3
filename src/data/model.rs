use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the loosely-typed cells a
/// spreadsheet hands us. The typed value is kept for display; substring
/// matching always goes through [`CellValue::match_text`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date/time rendered to text at load time.
    DateTime(String),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(d) => write!(f, "{d}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// The string form used for substring matching. Empty cells produce an
    /// empty string, so they never match a non-empty query.
    pub fn match_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            other => other.to_string(),
        }
    }

    /// Case-insensitive containment test. `needle` must already be lowercase.
    pub fn contains(&self, needle: &str) -> bool {
        self.match_text().to_lowercase().contains(needle)
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded sheet
// ---------------------------------------------------------------------------

/// Name of the leading column that tags result rows with their source sheet.
pub const SHEET_TAG_COLUMN: &str = "Sheet";

/// Row/column view of one sheet: ordered column names over positionally
/// aligned rows. Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of this table with a leading [`SHEET_TAG_COLUMN`] naming the
    /// sheet every row came from.
    pub fn with_sheet_tag(&self, sheet: &str) -> Table {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(SHEET_TAG_COLUMN.to_string());
        columns.extend(self.columns.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut row = Vec::with_capacity(r.len() + 1);
                row.push(CellValue::Text(sheet.to_string()));
                row.extend(r.iter().cloned());
                row
            })
            .collect();

        Table { columns, rows }
    }

    /// Append another table's rows positionally, widening the column list
    /// with unnamed columns when `other` is wider. Used when concatenating
    /// per-sheet results; each row's tag column identifies its true source.
    pub fn extend_positional(&mut self, other: Table) {
        if other.columns.len() > self.columns.len() {
            self.columns.resize(other.columns.len(), String::new());
            let width = self.columns.len();
            for row in &mut self.rows {
                row.resize(width, CellValue::Empty);
            }
        }
        let width = self.columns.len();
        for mut row in other.rows {
            row.resize(width, CellValue::Empty);
            self.rows.push(row);
        }
    }
}
