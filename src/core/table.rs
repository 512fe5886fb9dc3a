//! Table value object backing the adaptive insight table.
//!
//! The server sends an arbitrary headers/rows grid with untyped cells. Rather
//! than re-deriving cell types on every render, each column is tagged once at
//! ingestion; everything downstream branches on the tag.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::format;

/// A single cell as received from the server: string, number, bool or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric value when the cell can participate in numeric comparison.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Plain string form, without any numeric formatting applied.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Text(s) => s.clone(),
        }
    }

    /// String rendered into the table body, honoring the column tag.
    pub fn display(&self, column_type: ColumnType) -> String {
        match self {
            CellValue::Null => format::DASH.to_string(),
            CellValue::Number(n) if column_type == ColumnType::Numeric => format::format_number(*n),
            other => other.as_text(),
        }
    }
}

/// Per-column type tag, computed once when the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// First non-null sample was a number.
    Numeric,
    /// First non-null sample was a string or bool.
    Text,
    /// Every cell in the column was null.
    Empty,
}

impl ColumnType {
    /// Numeric columns are right-aligned and number-formatted.
    pub fn is_numeric(self) -> bool {
        self == ColumnType::Numeric
    }
}

/// Headers + rows + per-column tags for one table visualization.
///
/// Rows are row-major; short rows are padded conceptually with nulls (the
/// server guarantees equal lengths, but nothing here panics if it lies).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub column_types: Vec<ColumnType>,
    pub text_summary: String,
}

impl TableData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>, text_summary: String) -> Self {
        let column_types = infer_column_types(&headers, &rows);
        Self {
            headers,
            rows,
            column_types,
            text_summary,
        }
    }

    /// True when there is nothing to lay out as a grid body.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    pub fn column_type(&self, col: usize) -> ColumnType {
        self.column_types.get(col).copied().unwrap_or(ColumnType::Empty)
    }

    /// Cell at (row, col); short rows read as null.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const NULL: &CellValue = &CellValue::Null;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(NULL)
    }
}

/// Take the first non-null cell in each column as the type sample. A column
/// with no non-null cell is tagged `Empty` and treated as text downstream.
fn infer_column_types(headers: &[String], rows: &[Vec<CellValue>]) -> Vec<ColumnType> {
    (0..headers.len())
        .map(|col| {
            let sample = rows
                .iter()
                .filter_map(|row| row.get(col))
                .find(|cell| !cell.is_null());
            match sample {
                Some(CellValue::Number(_)) => ColumnType::Numeric,
                Some(_) => ColumnType::Text,
                None => ColumnType::Empty,
            }
        })
        .collect()
}

/// Active sort key: one column at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: 0,
            ascending: true,
        }
    }
}

impl SortState {
    /// Header interaction: same column toggles direction, a different column
    /// becomes the key with ascending order.
    pub fn activate(&mut self, column: usize) {
        if self.column == column {
            self.ascending = !self.ascending;
        } else {
            *self = Self {
                column,
                ascending: true,
            };
        }
    }
}

/// Comparison rank: real values first, then non-comparable values, nulls last.
/// Reversing the whole comparator for descending order flips nulls to the
/// front, which is the required null placement for both directions.
fn sort_rank(cell: &CellValue, numeric: bool) -> u8 {
    match cell {
        CellValue::Null => 2,
        CellValue::Number(_) => 0,
        _ if numeric => 1,
        _ => 0,
    }
}

fn compare_cells(a: &CellValue, b: &CellValue, numeric: bool) -> Ordering {
    let rank = sort_rank(a, numeric).cmp(&sort_rank(b, numeric));
    if rank != Ordering::Equal {
        return rank;
    }
    if numeric {
        if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
            return x.total_cmp(&y);
        }
    }
    a.as_text().to_lowercase().cmp(&b.as_text().to_lowercase())
}

/// Stable sort of row indices by the active column. Pure: the table's row
/// order is never mutated, callers render through the returned permutation.
pub fn sorted_indices(table: &TableData, sort: &SortState) -> Vec<usize> {
    let numeric = table.column_type(sort.column).is_numeric();
    let mut indices: Vec<usize> = (0..table.rows.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = compare_cells(
            table.cell(a, sort.column),
            table.cell(b, sort.column),
            numeric,
        );
        if sort.ascending { ord } else { ord.reverse() }
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn table(headers: &[&str], rows: Vec<Vec<CellValue>>) -> TableData {
        TableData::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows,
            String::new(),
        )
    }

    #[test]
    fn test_type_inference_first_non_null_sample() {
        // [null, null, 5, "x"] -> numeric: the first non-null sample is 5
        let t = table(
            &["a"],
            vec![
                vec![CellValue::Null],
                vec![CellValue::Null],
                vec![num(5.0)],
                vec![text("x")],
            ],
        );
        assert_eq!(t.column_types, vec![ColumnType::Numeric]);
    }

    #[test]
    fn test_type_inference_all_null_column() {
        let t = table(&["a"], vec![vec![CellValue::Null], vec![CellValue::Null]]);
        assert_eq!(t.column_types, vec![ColumnType::Empty]);
        assert!(!t.column_type(0).is_numeric());
    }

    #[test]
    fn test_type_inference_per_column() {
        let t = table(
            &["name", "amount"],
            vec![
                vec![text("rent"), num(1200.0)],
                vec![text("food"), num(85.5)],
            ],
        );
        assert_eq!(t.column_types, vec![ColumnType::Text, ColumnType::Numeric]);
    }

    #[test]
    fn test_numeric_sort_ascending_nulls_last() {
        let t = table(
            &["v"],
            vec![
                vec![num(3.0)],
                vec![CellValue::Null],
                vec![num(1.0)],
                vec![num(2.0)],
            ],
        );
        let sort = SortState::default();
        let order = sorted_indices(&t, &sort);
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_numeric_sort_descending_nulls_first() {
        let t = table(
            &["v"],
            vec![
                vec![num(3.0)],
                vec![CellValue::Null],
                vec![num(1.0)],
                vec![num(2.0)],
            ],
        );
        let sort = SortState {
            column: 0,
            ascending: false,
        };
        let order = sorted_indices(&t, &sort);
        assert_eq!(order, vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_text_sort_case_insensitive() {
        let t = table(
            &["v"],
            vec![vec![text("banana")], vec![text("Apple")], vec![text("cherry")]],
        );
        let order = sorted_indices(&t, &SortState::default());
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let t = table(
            &["k", "tag"],
            vec![
                vec![num(1.0), text("first")],
                vec![num(1.0), text("second")],
                vec![num(0.0), text("zero")],
                vec![num(1.0), text("third")],
            ],
        );
        let mut sort = SortState::default();
        let asc = sorted_indices(&t, &sort);
        assert_eq!(asc, vec![2, 0, 1, 3]);

        // Toggling twice returns equal-valued rows to their original relative
        // order.
        sort.activate(0);
        sort.activate(0);
        let again = sorted_indices(&t, &sort);
        assert_eq!(again, asc);
    }

    #[test]
    fn test_sort_does_not_mutate_rows() {
        let t = table(&["v"], vec![vec![num(2.0)], vec![num(1.0)]]);
        let before = t.rows.clone();
        let _ = sorted_indices(&t, &SortState::default());
        assert_eq!(t.rows, before);
    }

    #[test]
    fn test_sort_state_activation() {
        let mut sort = SortState::default();
        assert_eq!(sort, SortState { column: 0, ascending: true });

        sort.activate(0);
        assert_eq!(sort, SortState { column: 0, ascending: false });

        sort.activate(2);
        assert_eq!(sort, SortState { column: 2, ascending: true });
    }

    #[test]
    fn test_empty_states() {
        assert!(table(&[], vec![]).is_empty());
        assert!(table(&["a"], vec![]).is_empty());
        assert!(!table(&["a"], vec![vec![num(1.0)]]).is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(num(7507.73).display(ColumnType::Numeric), "7,507.73");
        assert_eq!(num(12.0).display(ColumnType::Text), "12");
        assert_eq!(text("Other").display(ColumnType::Text), "Other");
        assert_eq!(CellValue::Null.display(ColumnType::Numeric), format::DASH);
        assert_eq!(CellValue::Bool(true).display(ColumnType::Text), "true");
    }

    #[test]
    fn test_short_rows_read_as_null() {
        let t = table(&["a", "b"], vec![vec![num(1.0)]]);
        assert!(t.cell(0, 1).is_null());
        assert!(t.cell(5, 0).is_null());
    }

    #[test]
    fn test_cell_value_json_decoding() {
        let cells: Vec<CellValue> =
            serde_json::from_str(r#"["Transfer", 7507.73, null, true]"#).unwrap();
        assert_eq!(
            cells,
            vec![text("Transfer"), num(7507.73), CellValue::Null, CellValue::Bool(true)]
        );
    }
}
