//! Code → classification lookup table.

use crate::dataset::{load_dataset, require_columns, string_values};
use crate::error::Result;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::path::Path;

/// Column names of a lookup dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupColumns {
    pub key: String,
    pub group: String,
    pub class: String,
}

impl Default for LookupColumns {
    fn default() -> Self {
        Self {
            key: "codebase".to_owned(),
            group: "main_group".to_owned(),
            class: "Main_class".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub group: String,
    pub class: String,
}

/// Read-only mapping built once per enrichment run.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, Classification>,
    columns: LookupColumns,
}

impl LookupTable {
    /// Build the table from a reference frame.
    ///
    /// Rows with a null key are skipped; a repeated key replaces the earlier
    /// entry. Null group or class values become empty strings.
    pub fn from_dataset(df: &DataFrame, columns: LookupColumns) -> Result<Self> {
        require_columns(df, "lookup", &[&columns.key, &columns.group, &columns.class])?;

        let keys = string_values(df, &columns.key)?;
        let groups = string_values(df, &columns.group)?;
        let classes = string_values(df, &columns.class)?;

        let mut entries = HashMap::with_capacity(keys.len());
        for ((key, group), class) in keys.into_iter().zip(groups).zip(classes) {
            let Some(key) = key else { continue };
            entries.insert(
                key,
                Classification {
                    group: group.unwrap_or_default(),
                    class: class.unwrap_or_default(),
                },
            );
        }

        tracing::debug!("Lookup table holds {} codes", entries.len());
        Ok(Self { entries, columns })
    }

    pub fn from_file(path: &Path, columns: LookupColumns) -> Result<Self> {
        Self::from_dataset(&load_dataset(path)?, columns)
    }

    pub fn get(&self, code: &str) -> Option<&Classification> {
        self.entries.get(code)
    }

    pub fn columns(&self) -> &LookupColumns {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
