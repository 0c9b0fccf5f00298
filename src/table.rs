//! Canonical table model and normalization.
//!
//! A [`Table`] is the comparable form every source is reduced to: ordered
//! column names plus rows of strings, one value per declared column. The empty
//! string is the single missing-value sentinel; after [`normalize`] no cell
//! carries a null or a non-string type. Tables are immutable once built;
//! operations that need a different shape (mapping, diffing) produce new
//! tables instead of mutating in place.

use std::collections::HashSet;

use itertools::Itertools;

/// A cell as delivered by a source before normalization. Spreadsheet readers
/// and warehouse results produce typed cells; delimited text produces `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl RawCell {
    /// String representation used by normalization. A finite float with a
    /// zero fraction renders without it (`42.0` becomes `"42"`), matching how
    /// the spreadsheet and warehouse readers stringify numerics.
    pub fn into_string(self) -> String {
        match self {
            RawCell::Null => String::new(),
            RawCell::Text(s) => s,
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            RawCell::Bool(b) => b.to_string(),
        }
    }
}

/// A table as delivered by a source, prior to normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, enforcing the one-value-per-column invariant: short
    /// rows are padded with the empty sentinel, long rows truncated.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A copy of this table under different column names. The receiver is
    /// untouched.
    pub fn with_columns(&self, columns: Vec<String>) -> Table {
        Table::new(columns, self.rows.clone())
    }

    /// Column names present in both tables, in this table's column order.
    pub fn common_columns(&self, other: &Table) -> Vec<String> {
        let theirs: HashSet<&str> = other.columns.iter().map(String::as_str).collect();
        self.columns
            .iter()
            .filter(|c| theirs.contains(c.as_str()))
            .cloned()
            .collect()
    }

    /// Column names present only in this table, sorted.
    pub fn unique_columns(&self, other: &Table) -> Vec<String> {
        let theirs: HashSet<&str> = other.columns.iter().map(String::as_str).collect();
        self.columns
            .iter()
            .filter(|c| !theirs.contains(c.as_str()))
            .cloned()
            .sorted()
            .dedup()
            .collect()
    }

    /// Reverses normalization for re-normalization round trips.
    pub fn into_raw(self) -> RawTable {
        RawTable {
            columns: self.columns,
            rows: self
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(RawCell::Text).collect())
                .collect(),
        }
    }
}

/// Coerces a source table into canonical form: every cell a string, nulls
/// unified to `""`, column names trimmed. Cell contents are left untouched so
/// later comparison stays exact and case-sensitive. Idempotent.
pub fn normalize(raw: RawTable) -> Table {
    let columns = raw
        .columns
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();
    let rows = raw
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(RawCell::into_string).collect())
        .collect();
    Table::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<RawCell> {
        values.iter().map(|v| RawCell::Text(v.to_string())).collect()
    }

    #[test]
    fn normalize_unifies_nulls_and_types_to_strings() {
        let raw = RawTable {
            columns: vec![" id ".to_string(), "amount".to_string(), "ok".to_string()],
            rows: vec![vec![
                RawCell::Null,
                RawCell::Float(42.0),
                RawCell::Bool(true),
            ]],
        };
        let table = normalize(raw);
        assert_eq!(table.columns(), ["id", "amount", "ok"]);
        assert_eq!(table.rows()[0], vec!["", "42", "true"]);
    }

    #[test]
    fn normalize_preserves_cell_whitespace_and_case() {
        let raw = RawTable {
            columns: vec!["name".to_string()],
            rows: vec![vec![RawCell::Text("  Alice  ".to_string())]],
        };
        let table = normalize(raw);
        assert_eq!(table.rows()[0][0], "  Alice  ");
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = RawTable {
            columns: vec!["id ".to_string(), "name".to_string()],
            rows: vec![
                vec![RawCell::Int(1), RawCell::Text("Alice".to_string())],
                vec![RawCell::Null, RawCell::Float(2.5)],
            ],
        };
        let once = normalize(raw);
        let twice = normalize(once.clone().into_raw());
        assert_eq!(once, twice);
    }

    #[test]
    fn fractional_floats_keep_their_fraction() {
        assert_eq!(RawCell::Float(2.5).into_string(), "2.5");
        assert_eq!(RawCell::Float(-3.0).into_string(), "-3");
    }

    #[test]
    fn new_pads_and_truncates_rows_to_column_count() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec!["1".to_string()],
                vec!["2".to_string(), "3".to_string(), "4".to_string()],
            ],
        );
        assert_eq!(table.rows()[0], vec!["1", ""]);
        assert_eq!(table.rows()[1], vec!["2", "3"]);
    }

    #[test]
    fn common_columns_follow_left_order() {
        let raw = |cols: &[&str]| RawTable {
            columns: cols.iter().map(|c| c.to_string()).collect(),
            rows: vec![text_row(&vec![""; cols.len()])],
        };
        let a = normalize(raw(&["id", "name", "city"]));
        let b = normalize(raw(&["city", "id", "country"]));
        assert_eq!(a.common_columns(&b), ["id", "city"]);
        assert_eq!(a.unique_columns(&b), ["name"]);
        assert_eq!(b.unique_columns(&a), ["country"]);
    }
}
