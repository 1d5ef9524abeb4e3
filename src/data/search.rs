use std::collections::BTreeMap;
use std::rc::Rc;

use super::loader::LoadError;
use super::model::Table;

// ---------------------------------------------------------------------------
// Filter set: one optional substring per column
// ---------------------------------------------------------------------------

/// Per-column query substrings for single-sheet filtering: column name →
/// filter text. An absent or empty entry means "no constraint on this column".
pub type ColumnFilters = BTreeMap<String, String>;

/// Initialise a [`ColumnFilters`] with an empty (unconstrained) entry per
/// column of the table.
pub fn init_filters(table: &Table) -> ColumnFilters {
    table
        .columns
        .iter()
        .map(|c| (c.clone(), String::new()))
        .collect()
}

// ---------------------------------------------------------------------------
// Search result
// ---------------------------------------------------------------------------

/// Result of a search: the tagged matching rows plus the total match count.
/// Zero rows is the normal "no matches" outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub table: Table,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Single-sheet filtering
// ---------------------------------------------------------------------------

/// Rows of `table` satisfying every active per-column constraint (logical
/// AND). A constraint is active when its filter text is non-empty; matching
/// is case-insensitive substring containment, never a pattern. Filters naming
/// columns the table does not have constrain nothing.
pub fn filter_rows(table: &Table, filters: &ColumnFilters) -> Table {
    let active: Vec<(usize, String)> = filters
        .iter()
        .filter(|(_, needle)| !needle.is_empty())
        .filter_map(|(col, needle)| table.column_index(col).map(|i| (i, needle.to_lowercase())))
        .collect();

    let rows = table
        .rows
        .iter()
        .filter(|row| active.iter().all(|(i, needle)| row[*i].contains(needle)))
        .cloned()
        .collect();

    Table {
        columns: table.columns.clone(),
        rows,
    }
}

/// The single-sheet search operation: filter, then tag the result with its
/// sheet name for display. The row count doubles as the match count.
pub fn filter_single_sheet(table: &Table, sheet: &str, filters: &ColumnFilters) -> SearchReport {
    let matched = filter_rows(table, filters);
    let total = matched.len();
    SearchReport {
        table: matched.with_sheet_tag(sheet),
        total,
    }
}

// ---------------------------------------------------------------------------
// All-sheets search
// ---------------------------------------------------------------------------

/// Rows of `table` where at least one cell contains `query`
/// case-insensitively (logical OR across the row's columns).
pub fn search_rows(table: &Table, query: &str) -> Table {
    let needle = query.to_lowercase();
    let rows = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| cell.contains(&needle)))
        .cloned()
        .collect();

    Table {
        columns: table.columns.clone(),
        rows,
    }
}

/// Search every sheet of a file for one query, concatenating tagged matches
/// in sheet-enumeration order.
///
/// Returns `Ok(None)` when the query is empty: an empty query means "no
/// search requested", never "match everything". `load` produces the table
/// for a sheet name; the application routes it through the table cache.
pub fn search_all_sheets<F>(
    sheets: &[String],
    query: &str,
    mut load: F,
) -> Result<Option<SearchReport>, LoadError>
where
    F: FnMut(&str) -> Result<Rc<Table>, LoadError>,
{
    if query.is_empty() {
        return Ok(None);
    }

    let mut combined: Option<Table> = None;
    let mut total = 0;
    for sheet in sheets {
        let table = load(sheet)?;
        let matched = search_rows(&table, query);
        if matched.is_empty() {
            continue;
        }

        total += matched.len();
        let tagged = matched.with_sheet_tag(sheet);
        match &mut combined {
            None => combined = Some(tagged),
            Some(t) => t.extend_positional(tagged),
        }
    }

    Ok(Some(SearchReport {
        table: combined.unwrap_or_default(),
        total,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| CellValue::Text(v.to_string())).collect())
                .collect(),
        }
    }

    fn filters(pairs: &[(&str, &str)]) -> ColumnFilters {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_string()))
            .collect()
    }

    fn people() -> Table {
        table(
            &["Name", "City"],
            &[&["Anna", "Paris"], &["Bob", "Berlin"]],
        )
    }

    #[test]
    fn empty_filter_set_returns_the_table_unchanged() {
        let t = people();
        assert_eq!(filter_rows(&t, &init_filters(&t)), t);
        assert_eq!(filter_rows(&t, &ColumnFilters::new()), t);
    }

    #[test]
    fn city_filter_keeps_only_matching_rows() {
        let result = filter_rows(&people(), &filters(&[("City", "par")]));
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0][0], CellValue::Text("Anna".into()));
    }

    #[test]
    fn active_constraints_combine_with_logical_and() {
        let t = table(
            &["Name", "City"],
            &[&["Anna", "Paris"], &["Annette", "Berlin"]],
        );
        let result = filter_rows(&t, &filters(&[("Name", "ann"), ("City", "ber")]));
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0][0], CellValue::Text("Annette".into()));
    }

    #[test]
    fn filter_matching_is_case_insensitive() {
        let t = table(&["Code"], &[&["ABCDEF"]]);
        assert_eq!(filter_rows(&t, &filters(&[("Code", "abc")])).len(), 1);
    }

    #[test]
    fn filters_for_unknown_columns_constrain_nothing() {
        let t = people();
        assert_eq!(filter_rows(&t, &filters(&[("Country", "fr")])), t);
    }

    #[test]
    fn no_match_is_an_empty_result_not_an_error() {
        let report = filter_single_sheet(&people(), "Sheet1", &filters(&[("City", "xyz")]));
        assert_eq!(report.total, 0);
        assert!(report.table.is_empty());
        // Still a well-formed tagged table, distinguishable from a load error.
        assert_eq!(report.table.columns[0], "Sheet");
    }

    #[test]
    fn single_sheet_result_is_tagged_with_the_sheet_name() {
        let report = filter_single_sheet(&people(), "Sheet1", &filters(&[("City", "par")]));
        assert_eq!(report.total, 1);
        assert_eq!(report.table.rows[0][0], CellValue::Text("Sheet1".into()));
        assert_eq!(report.table.rows[0][2], CellValue::Text("Paris".into()));
    }

    #[test]
    fn search_rows_matches_any_column() {
        let t = people();
        assert_eq!(search_rows(&t, "anna").len(), 1);
        assert_eq!(search_rows(&t, "berlin").len(), 1);
        assert_eq!(search_rows(&t, "xyz").len(), 0);
    }

    fn two_sheet_source() -> Vec<(String, Rc<Table>)> {
        vec![
            (
                "Sheet1".to_string(),
                Rc::new(table(&["A", "B"], &[&["x", "foo"]])),
            ),
            (
                "Sheet2".to_string(),
                Rc::new(table(&["A", "B"], &[&["bar", "y"]])),
            ),
        ]
    }

    fn load_from(source: &[(String, Rc<Table>)]) -> impl FnMut(&str) -> Result<Rc<Table>, LoadError> + '_ {
        move |sheet| {
            source
                .iter()
                .find(|(name, _)| name == sheet)
                .map(|(_, t)| Rc::clone(t))
                .ok_or_else(|| LoadError::UnknownSheet(sheet.to_string()))
        }
    }

    #[test]
    fn empty_query_performs_no_search() {
        let mut loads = 0;
        let outcome = search_all_sheets(&["Sheet1".to_string()], "", |_| {
            loads += 1;
            Ok(Rc::new(Table::default()))
        })
        .unwrap();
        assert!(outcome.is_none());
        assert_eq!(loads, 0);
    }

    #[test]
    fn matches_are_tagged_with_their_source_sheet() {
        let source = two_sheet_source();
        let sheets = vec!["Sheet1".to_string(), "Sheet2".to_string()];

        let report = search_all_sheets(&sheets, "foo", load_from(&source))
            .unwrap()
            .unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.table.rows[0][0], CellValue::Text("Sheet1".into()));
    }

    #[test]
    fn combined_result_preserves_sheet_enumeration_order() {
        let source = two_sheet_source();
        let sheets = vec!["Sheet1".to_string(), "Sheet2".to_string()];

        // "a" hits "bar" in Sheet2 only; "o"/"r" tests ordering with both.
        let report = search_all_sheets(&sheets, "r", load_from(&source))
            .unwrap()
            .unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.table.rows[0][0], CellValue::Text("Sheet2".into()));

        let both = search_all_sheets(&sheets, "o", load_from(&source))
            .unwrap()
            .unwrap();
        // "foo" is in Sheet1, nothing with "o" in Sheet2.
        assert_eq!(both.table.rows[0][0], CellValue::Text("Sheet1".into()));
    }

    #[test]
    fn sheets_with_different_widths_concatenate_positionally() {
        let source = vec![
            (
                "Narrow".to_string(),
                Rc::new(table(&["A"], &[&["match-a"]])),
            ),
            (
                "Wide".to_string(),
                Rc::new(table(&["A", "B", "C"], &[&["match-b", "x", "y"]])),
            ),
        ];
        let sheets = vec!["Narrow".to_string(), "Wide".to_string()];

        let report = search_all_sheets(&sheets, "match", load_from(&source))
            .unwrap()
            .unwrap();
        assert_eq!(report.total, 2);
        // Tag column + widened to the widest sheet.
        assert_eq!(report.table.columns.len(), 4);
        assert_eq!(report.table.rows[0][3], CellValue::Empty);
        assert_eq!(report.table.rows[1][0], CellValue::Text("Wide".into()));
    }

    #[test]
    fn query_matching_nothing_reports_zero_total() {
        let source = two_sheet_source();
        let sheets = vec!["Sheet1".to_string(), "Sheet2".to_string()];

        let report = search_all_sheets(&sheets, "zzz", load_from(&source))
            .unwrap()
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.table.is_empty());
    }

    #[test]
    fn load_failures_propagate() {
        let sheets = vec!["Missing".to_string()];
        let err = search_all_sheets(&sheets, "foo", |sheet| {
            Err(LoadError::UnknownSheet(sheet.to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownSheet(_)));
    }
}
