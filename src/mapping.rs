//! Explicit column correspondence between two tables.
//!
//! When the two sides share no column names the caller supplies pairs of
//! `left_name=right_name`; applying the mapping yields a renamed view of the
//! right table so that key selection and value comparison can treat both
//! sides uniformly. Matching is exact and case-sensitive; there is no fuzzy
//! or case-insensitive fallback.

use std::collections::HashSet;

use crate::error::{CompareError, Result};
use crate::table::Table;

/// An ordered, one-to-one mapping from left-side column names to right-side
/// column names. Built by the caller before a comparison and consumed once;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pairs: Vec<(String, String)>,
}

impl ColumnMapping {
    /// Validates and stores the pairs. Rejects an empty mapping, a repeated
    /// left name, and a many-to-one mapping (two left names onto the same
    /// right name), which would make the renamed view ambiguous.
    pub fn new(pairs: Vec<(String, String)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(CompareError::mapping("mapping contains no column pairs"));
        }
        let mut left_seen = HashSet::new();
        let mut right_seen = HashSet::new();
        for (left, right) in &pairs {
            if !left_seen.insert(left.as_str()) {
                return Err(CompareError::mapping(format!(
                    "column '{left}' is mapped more than once"
                )));
            }
            if !right_seen.insert(right.as_str()) {
                return Err(CompareError::mapping(format!(
                    "multiple columns are mapped onto '{right}'"
                )));
            }
        }
        Ok(ColumnMapping { pairs })
    }

    /// Parses CLI-style `left=right` pair specifications.
    pub fn parse(specs: &[String]) -> Result<Self> {
        let mut pairs = Vec::with_capacity(specs.len());
        for spec in specs {
            let (left, right) = spec.split_once('=').ok_or_else(|| {
                CompareError::mapping(format!(
                    "expected 'left_column=right_column', got '{spec}'"
                ))
            })?;
            let (left, right) = (left.trim(), right.trim());
            if left.is_empty() || right.is_empty() {
                return Err(CompareError::mapping(format!(
                    "expected 'left_column=right_column', got '{spec}'"
                )));
            }
            pairs.push((left.to_string(), right.to_string()));
        }
        ColumnMapping::new(pairs)
    }

    /// Left-side names in mapping order. When no explicit key set is chosen,
    /// these double as the join keys.
    pub fn left_names(&self) -> Vec<String> {
        self.pairs.iter().map(|(left, _)| left.clone()).collect()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Produces a copy of `right` with every mapped column renamed to its
    /// left-side name; unmapped columns keep their original names.
    ///
    /// Fails with `UnknownColumn` when a pair references a name absent from
    /// its table, and with `Mapping` when a rename would collide with an
    /// unmapped right-side column and so manufacture a duplicate name.
    pub fn apply(&self, left: &Table, right: &Table) -> Result<Table> {
        for (left_name, right_name) in &self.pairs {
            if left.column_index(left_name).is_none() {
                return Err(CompareError::unknown_column("table A", left_name));
            }
            if right.column_index(right_name).is_none() {
                return Err(CompareError::unknown_column("table B", right_name));
            }
        }

        let renamed: Vec<String> = right
            .columns()
            .iter()
            .map(|name| {
                self.pairs
                    .iter()
                    .find(|(_, right_name)| right_name == name)
                    .map(|(left_name, _)| left_name.clone())
                    .unwrap_or_else(|| name.clone())
            })
            .collect();

        let mut seen = HashSet::new();
        for name in &renamed {
            if !seen.insert(name.as_str()) {
                return Err(CompareError::mapping(format!(
                    "renaming produces duplicate column '{name}'"
                )));
            }
        }

        Ok(right.with_columns(renamed))
    }
}
