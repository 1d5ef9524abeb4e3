use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, CellErrorType, Data, Reader};
use thiserror::Error;

use super::model::{CellValue, Table};

/// Rows skipped before the header row. The workbooks this tool was built for
/// carry a title row above the real header, so the second row is the default.
pub const DEFAULT_HEADER_OFFSET: usize = 1;

/// Extensions handled by the workbook reader (dispatch is by extension).
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to open or parse a spreadsheet file. Fatal for the current file
/// selection: surfaced to the caller, never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no sheet named '{0}' in this file")]
    UnknownSheet(String),
    #[error("sheet '{sheet}' has no header row at offset {offset}")]
    MissingHeader { sheet: String, offset: usize },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Ordered sheet names of a spreadsheet file. CSV files have no sheet
/// structure and expose a single synthetic sheet named after the file stem.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, LoadError> {
    match extension(path).as_str() {
        "csv" => Ok(vec![file_stem(path)]),
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => {
            let workbook = open_workbook_auto(path)?;
            Ok(workbook.sheet_names())
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Load one sheet of `path` into a [`Table`], skipping `header_offset` rows
/// and treating the next row as the header. Header names are trimmed; blank
/// and duplicate names are disambiguated (`Name`, `Name.1`, ...).
pub fn load_table(path: &Path, sheet: &str, header_offset: usize) -> Result<Table, LoadError> {
    let grid = match extension(path).as_str() {
        "csv" => {
            if sheet != file_stem(path) {
                return Err(LoadError::UnknownSheet(sheet.to_string()));
            }
            read_csv_grid(path)?
        }
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook_grid(path, sheet)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };
    table_from_grid(grid, sheet, header_offset)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Synthetic sheet name for files without sheet structure.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

// ---------------------------------------------------------------------------
// Workbook reader (calamine)
// ---------------------------------------------------------------------------

fn read_workbook_grid(path: &Path, sheet: &str) -> Result<Vec<Vec<CellValue>>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(LoadError::UnknownSheet(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(
            dt.as_datetime()
                .map(|d| d.to_string())
                .unwrap_or_else(|| dt.as_f64().to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateTime(s.clone()),
        Data::Error(e) => CellValue::Text(error_literal(e).to_string()),
    }
}

/// Excel's literal rendering of error cells, so they remain searchable text.
fn error_literal(err: &CellErrorType) -> &'static str {
    match err {
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::NA => "#N/A",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Null => "#NULL!",
        CellErrorType::Num => "#NUM!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::GettingData => "#DATA!",
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv_grid(path: &Path) -> Result<Vec<Vec<CellValue>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(parse_csv_cell).collect());
    }
    Ok(grid)
}

/// CSV carries no type information; infer the scalar types a spreadsheet
/// would surface so matching and display behave the same across formats.
fn parse_csv_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = field.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return CellValue::Float(f);
    }
    if field == "true" || field == "false" {
        return CellValue::Bool(field == "true");
    }
    CellValue::Text(field.to_string())
}

// ---------------------------------------------------------------------------
// Grid → Table
// ---------------------------------------------------------------------------

/// Build a [`Table`] from a raw cell grid: `grid[header_offset]` is the
/// header row and everything after it is data. Short data rows are padded
/// with empty cells to the header width, long ones truncated to it.
fn table_from_grid(
    grid: Vec<Vec<CellValue>>,
    sheet: &str,
    header_offset: usize,
) -> Result<Table, LoadError> {
    let mut iter = grid.into_iter().skip(header_offset);
    let header = iter.next().ok_or_else(|| LoadError::MissingHeader {
        sheet: sheet.to_string(),
        offset: header_offset,
    })?;

    let columns = dedupe_columns(header.iter().enumerate().map(|(i, cell)| {
        let name = cell.to_string().trim().to_string();
        if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        }
    }));
    let width = columns.len();

    let rows = iter
        .map(|mut row| {
            row.resize(width, CellValue::Empty);
            row
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Keep column names unique: a repeated name gets a `.1`, `.2`, ... suffix.
fn dedupe_columns(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !counts.contains_key(&name) {
            counts.insert(name.clone(), 0);
            out.push(name);
            continue;
        }
        let mut n = counts[&name];
        let candidate = loop {
            n += 1;
            let candidate = format!("{name}.{n}");
            if !counts.contains_key(&candidate) {
                break candidate;
            }
        };
        counts.insert(name, n);
        counts.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn grid_skips_offset_rows_and_trims_headers() {
        let grid = vec![
            vec![text("Quarterly report"), CellValue::Empty],
            vec![text("  Name "), text("City")],
            vec![text("Anna"), text("Paris")],
        ];

        let table = table_from_grid(grid, "Sheet1", 1).unwrap();
        assert_eq!(table.columns, vec!["Name", "City"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][1], text("Paris"));
    }

    #[test]
    fn grid_pads_short_rows_to_header_width() {
        let grid = vec![
            vec![text("title")],
            vec![text("A"), text("B"), text("C")],
            vec![text("1")],
        ];

        let table = table_from_grid(grid, "Sheet1", 1).unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], CellValue::Empty);
    }

    #[test]
    fn grid_without_header_row_is_an_error() {
        let err = table_from_grid(vec![vec![text("only row")]], "Sheet1", 1).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { offset: 1, .. }));
    }

    #[test]
    fn duplicate_and_blank_headers_stay_unique() {
        let names = vec![
            "Name".to_string(),
            "Name".to_string(),
            "".to_string(),
            "Name".to_string(),
        ];
        assert_eq!(
            dedupe_columns(names.into_iter()),
            vec!["Name", "Name.1", "", "Name.2"]
        );
    }

    #[test]
    fn csv_cells_infer_scalar_types() {
        assert_eq!(parse_csv_cell("42"), CellValue::Int(42));
        assert_eq!(parse_csv_cell("1.5"), CellValue::Float(1.5));
        assert_eq!(parse_csv_cell("true"), CellValue::Bool(true));
        assert_eq!(parse_csv_cell(""), CellValue::Empty);
        assert_eq!(parse_csv_cell("Paris"), text("Paris"));
    }

    #[test]
    fn workbook_error_cells_keep_their_excel_literal() {
        assert_eq!(convert_cell(&Data::Error(CellErrorType::Div0)), text("#DIV/0!"));
        assert_eq!(convert_cell(&Data::String("x".into())), text("x"));
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn csv_file_loads_as_a_single_named_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "export from hr tool\nName,City\nAnna,Paris\nBob,Berlin\n")
            .unwrap();

        assert_eq!(sheet_names(&path).unwrap(), vec!["people"]);

        let table = load_table(&path, "people", DEFAULT_HEADER_OFFSET).unwrap();
        assert_eq!(table.columns, vec!["Name", "City"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][0], text("Bob"));

        let err = load_table(&path, "other", DEFAULT_HEADER_OFFSET).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSheet(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = sheet_names(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "txt"));
    }
}
