//! The diffing engine.
//!
//! [`diff`] computes a full outer join of two normalized tables on a key set
//! and classifies every resulting row: rows present on one side only become
//! `OnlyInA`/`OnlyInB` records, matched rows contribute one `ValueMismatch`
//! record per differing non-key column. Comparison is exact string equality;
//! whatever normalization was wanted has already happened upstream.
//!
//! Output order is deterministic: all `OnlyInA` records in A row order, then
//! all `OnlyInB` in B row order, then `ValueMismatch` grouped by column in A
//! column order, join row order within each group.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CompareError, Result};
use crate::table::Table;

/// `column` sentinel for whole-row differences.
pub const ALL_COLUMNS: &str = "all columns";
/// Presence markers for rows that exist on one side only.
pub const PRESENT: &str = "present";
pub const ABSENT: &str = "absent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiffKind {
    OnlyInA,
    OnlyInB,
    ValueMismatch,
}

impl DiffKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiffKind::OnlyInA => "Only in A",
            DiffKind::OnlyInB => "Only in B",
            DiffKind::ValueMismatch => "Value mismatch",
        }
    }

    /// Report/grouping order for summaries.
    pub const ALL: [DiffKind; 3] = [DiffKind::OnlyInA, DiffKind::OnlyInB, DiffKind::ValueMismatch];
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported discrepancy. Produced only by [`diff`], never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferenceRecord {
    pub kind: DiffKind,
    /// Ordered key-column values identifying the row.
    pub key_values: Vec<String>,
    /// Compared column name, or [`ALL_COLUMNS`] for one-sided rows.
    pub column: String,
    pub value_a: String,
    pub value_b: String,
}

impl DifferenceRecord {
    /// Key values joined for display and export.
    pub fn key_display(&self) -> String {
        self.key_values.join(", ")
    }
}

/// Compares two normalized tables on `keys` and returns the ordered
/// difference records.
///
/// Rows match when all key-column values are equal. Duplicate key tuples on
/// either side pair every combination on the other side, standard outer-join
/// cross-product semantics. Fails with `InvalidKeySet` when `keys` is empty
/// or names a column absent from either table; never fails on data content.
pub fn diff(left: &Table, right: &Table, keys: &[String]) -> Result<Vec<DifferenceRecord>> {
    let (left_key_idx, right_key_idx) = resolve_keys(left, right, keys)?;

    // Right-side lookup: key tuple -> row indices, in row order.
    let mut right_lookup: HashMap<Vec<&str>, Vec<usize>> = HashMap::new();
    for (idx, row) in right.rows().iter().enumerate() {
        let key = key_tuple(row, &right_key_idx);
        right_lookup.entry(key).or_default().push(idx);
    }

    let mut records = Vec::new();
    let mut matched: Vec<(usize, usize)> = Vec::new();
    let mut right_matched = vec![false; right.row_count()];

    for (left_idx, row) in left.rows().iter().enumerate() {
        let key = key_tuple(row, &left_key_idx);
        match right_lookup.get(&key) {
            Some(bucket) => {
                for &right_idx in bucket {
                    matched.push((left_idx, right_idx));
                    right_matched[right_idx] = true;
                }
            }
            None => records.push(DifferenceRecord {
                kind: DiffKind::OnlyInA,
                key_values: key.iter().map(|v| v.to_string()).collect(),
                column: ALL_COLUMNS.to_string(),
                value_a: PRESENT.to_string(),
                value_b: ABSENT.to_string(),
            }),
        }
    }

    for (right_idx, row) in right.rows().iter().enumerate() {
        if right_matched[right_idx] {
            continue;
        }
        let key = key_tuple(row, &right_key_idx);
        records.push(DifferenceRecord {
            kind: DiffKind::OnlyInB,
            key_values: key.iter().map(|v| v.to_string()).collect(),
            column: ALL_COLUMNS.to_string(),
            value_a: ABSENT.to_string(),
            value_b: PRESENT.to_string(),
        });
    }

    // Shared non-key columns, in A column order. Having none is a valid
    // outcome: no mismatch records are possible then.
    let compared: Vec<(String, usize, usize)> = left
        .columns()
        .iter()
        .filter(|name| !keys.contains(*name))
        .filter_map(|name| {
            let left_idx = left.column_index(name)?;
            let right_idx = right.column_index(name)?;
            Some((name.clone(), left_idx, right_idx))
        })
        .collect();

    for (column, left_col, right_col) in compared {
        for &(left_idx, right_idx) in &matched {
            let value_a = &left.rows()[left_idx][left_col];
            let value_b = &right.rows()[right_idx][right_col];
            if value_a != value_b {
                records.push(DifferenceRecord {
                    kind: DiffKind::ValueMismatch,
                    key_values: key_tuple(&left.rows()[left_idx], &left_key_idx)
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                    column: column.clone(),
                    value_a: value_a.clone(),
                    value_b: value_b.clone(),
                });
            }
        }
    }

    Ok(records)
}

fn resolve_keys(
    left: &Table,
    right: &Table,
    keys: &[String],
) -> Result<(Vec<usize>, Vec<usize>)> {
    if keys.is_empty() {
        return Err(CompareError::invalid_key_set("no key columns selected"));
    }
    let mut left_idx = Vec::with_capacity(keys.len());
    let mut right_idx = Vec::with_capacity(keys.len());
    for key in keys {
        left_idx.push(left.column_index(key).ok_or_else(|| {
            CompareError::invalid_key_set(format!("key column '{key}' not present in table A"))
        })?);
        right_idx.push(right.column_index(key).ok_or_else(|| {
            CompareError::invalid_key_set(format!("key column '{key}' not present in table B"))
        })?);
    }
    Ok((left_idx, right_idx))
}

fn key_tuple<'a>(row: &'a [String], indices: &[usize]) -> Vec<&'a str> {
    indices.iter().map(|&idx| row[idx].as_str()).collect()
}
