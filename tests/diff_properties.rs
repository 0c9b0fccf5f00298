//! Library-level checks of the diff engine's observable properties:
//! determinism, classification symmetry, join completeness, and the CSV
//! report round trip.

use std::collections::HashSet;

use proptest::prelude::*;

use table_compare::diff::{DiffKind, diff};
use table_compare::export::export_csv;
use table_compare::parse::parse_delimited_text;
use table_compare::table::{RawCell, RawTable, Table, normalize};

fn table(columns: &[&str], rows: &[Vec<&str>]) -> Table {
    normalize(RawTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|v| RawCell::Text(v.to_string())).collect())
            .collect(),
    })
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn count(records: &[table_compare::diff::DifferenceRecord], kind: DiffKind) -> usize {
    records.iter().filter(|r| r.kind == kind).count()
}

#[test]
fn diff_is_deterministic() {
    let a = table(
        &["id", "name", "city"],
        &[
            vec!["1", "Alice", "Delft"],
            vec!["2", "Bob", "Leiden"],
            vec!["3", "Carol", "Gouda"],
        ],
    );
    let b = table(
        &["id", "name", "city"],
        &[vec!["1", "Alicia", "Delft"], vec!["4", "Dave", "Breda"]],
    );
    let key_set = keys(&["id"]);
    let first = diff(&a, &b, &key_set).unwrap();
    let second = diff(&a, &b, &key_set).unwrap();
    assert_eq!(first, second);
}

#[test]
fn self_diff_is_empty_for_unique_keys() {
    let a = table(
        &["id", "name"],
        &[vec!["1", "Alice"], vec!["2", "Bob"], vec!["3", ""]],
    );
    let records = diff(&a, &a, &keys(&["id"])).unwrap();
    assert!(records.is_empty());
}

#[test]
fn csv_report_round_trips_through_the_parser() {
    let a = table(
        &["id", "name"],
        &[vec!["1", "Alice"], vec!["3", "Carol"]],
    );
    let b = table(
        &["id", "name"],
        &[vec!["1", "Alicia"], vec!["2", "Bob"]],
    );
    let records = diff(&a, &b, &keys(&["id"])).unwrap();
    let bytes = export_csv(&records).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let reparsed = parse_delimited_text(&text, None).unwrap();
    assert!(reparsed.warnings.is_empty());
    assert_eq!(
        reparsed.table.columns(),
        ["DifferenceKind", "KeyValues", "Column", "ValueInA", "ValueInB"]
    );
    let expected: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.kind.label().to_string(),
                r.key_display(),
                r.column.clone(),
                r.value_a.clone(),
                r.value_b.clone(),
            ]
        })
        .collect();
    assert_eq!(reparsed.table.rows(), expected);
}

/// Strategy: a small table over columns (id, v) with ids and values drawn
/// from tight pools so collisions and duplicates actually happen.
fn rows_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..6, 0u8..4), 0..8)
}

fn to_table(rows: &[(u8, u8)]) -> Table {
    normalize(RawTable {
        columns: vec!["id".to_string(), "v".to_string()],
        rows: rows
            .iter()
            .map(|(id, v)| {
                vec![RawCell::Text(id.to_string()), RawCell::Text(v.to_string())]
            })
            .collect(),
    })
}

proptest! {
    #[test]
    fn only_in_counts_match_an_independent_model(
        left in rows_strategy(),
        right in rows_strategy(),
    ) {
        let a = to_table(&left);
        let b = to_table(&right);
        let records = diff(&a, &b, &keys(&["id"])).unwrap();

        let right_ids: HashSet<u8> = right.iter().map(|(id, _)| *id).collect();
        let left_ids: HashSet<u8> = left.iter().map(|(id, _)| *id).collect();
        let expected_only_a = left.iter().filter(|(id, _)| !right_ids.contains(id)).count();
        let expected_only_b = right.iter().filter(|(id, _)| !left_ids.contains(id)).count();

        prop_assert_eq!(count(&records, DiffKind::OnlyInA), expected_only_a);
        prop_assert_eq!(count(&records, DiffKind::OnlyInB), expected_only_b);

        // Join completeness: every left row either matched or was reported.
        let matched_left = left.iter().filter(|(id, _)| right_ids.contains(id)).count();
        prop_assert_eq!(matched_left + expected_only_a, left.len());
    }

    #[test]
    fn classification_is_symmetric(
        left in rows_strategy(),
        right in rows_strategy(),
    ) {
        let a = to_table(&left);
        let b = to_table(&right);
        let key_set = keys(&["id"]);
        let forward = diff(&a, &b, &key_set).unwrap();
        let backward = diff(&b, &a, &key_set).unwrap();

        prop_assert_eq!(
            count(&forward, DiffKind::OnlyInA),
            count(&backward, DiffKind::OnlyInB)
        );
        prop_assert_eq!(
            count(&forward, DiffKind::OnlyInB),
            count(&backward, DiffKind::OnlyInA)
        );
        prop_assert_eq!(
            count(&forward, DiffKind::ValueMismatch),
            count(&backward, DiffKind::ValueMismatch)
        );
    }

    #[test]
    fn self_diff_never_reports_with_deduplicated_keys(rows in rows_strategy()) {
        let mut seen = HashSet::new();
        let unique: Vec<(u8, u8)> = rows
            .into_iter()
            .filter(|(id, _)| seen.insert(*id))
            .collect();
        let a = to_table(&unique);
        let records = diff(&a, &a, &keys(&["id"])).unwrap();
        prop_assert!(records.is_empty());
    }
}
