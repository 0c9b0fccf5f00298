//! Explicit comparison state.
//!
//! A [`CompareSession`] holds what the caller has assembled so far: the two
//! loaded tables, an optional column mapping, and the chosen key columns.
//! Every operation is a pure function of that state; comparing never mutates
//! the loaded tables, and a failed load on one side leaves the other side's
//! table untouched. One session per caller needs no locking.

use crate::diff::{self, DifferenceRecord};
use crate::error::{CompareError, Result};
use crate::mapping::ColumnMapping;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::A => "table A",
            Side::B => "table B",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CompareSession {
    table_a: Option<Table>,
    table_b: Option<Table>,
    mapping: Option<ColumnMapping>,
    key_columns: Vec<String>,
}

impl CompareSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a normalized table for one side, replacing any previous one.
    pub fn load(&mut self, side: Side, table: Table) {
        match side {
            Side::A => self.table_a = Some(table),
            Side::B => self.table_b = Some(table),
        }
    }

    pub fn table(&self, side: Side) -> Option<&Table> {
        match side {
            Side::A => self.table_a.as_ref(),
            Side::B => self.table_b.as_ref(),
        }
    }

    pub fn set_mapping(&mut self, mapping: ColumnMapping) {
        self.mapping = Some(mapping);
    }

    pub fn set_key_columns(&mut self, keys: Vec<String>) {
        self.key_columns = keys;
    }

    /// Column names both loaded tables share, in table A order.
    pub fn common_columns(&self) -> Result<Vec<String>> {
        Ok(self.required(Side::A)?.common_columns(self.required(Side::B)?))
    }

    /// Columns unique to each side, for the "Unique columns" report sheet.
    pub fn unique_columns(&self) -> Result<(Vec<String>, Vec<String>)> {
        let a = self.required(Side::A)?;
        let b = self.required(Side::B)?;
        Ok((a.unique_columns(b), b.unique_columns(a)))
    }

    /// Runs the comparison over the current state.
    ///
    /// With a mapping installed, table B is compared through its renamed
    /// view; when no explicit key columns were chosen, the mapped left-side
    /// names serve as the key set.
    pub fn compare(&self) -> Result<Vec<DifferenceRecord>> {
        let a = self.required(Side::A)?;
        let b = self.required(Side::B)?;
        match &self.mapping {
            Some(mapping) => {
                let mapped_b = mapping.apply(a, b)?;
                let keys = if self.key_columns.is_empty() {
                    mapping.left_names()
                } else {
                    self.key_columns.clone()
                };
                diff::diff(a, &mapped_b, &keys)
            }
            None => diff::diff(a, b, &self.key_columns),
        }
    }

    fn required(&self, side: Side) -> Result<&Table> {
        self.table(side).ok_or_else(|| CompareError::NotLoaded {
            side: side.label().to_string(),
        })
    }
}
