//! Drop repeated rows, keeping the first occurrence.

use crate::dataset::{column_names, load_dataset, require_columns, save_dataset};
use crate::error::Result;
use polars::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    pub original: usize,
    pub unique: usize,
    pub removed: usize,
}

impl DedupReport {
    pub fn duplicate_percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        self.removed as f64 / self.original as f64 * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows, {} unique, {} duplicates removed ({:.2}%)",
            self.original,
            self.unique,
            self.removed,
            self.duplicate_percent()
        )
    }
}

/// Keep the first row of every distinct key over `columns`.
///
/// `None` or an empty subset compares whole rows. Nulls compare equal to
/// each other. Surviving rows keep their original order.
pub fn dedup(df: &DataFrame, columns: Option<&[String]>) -> Result<(DataFrame, DedupReport)> {
    let subset = columns.filter(|columns| !columns.is_empty());
    if let Some(columns) = subset {
        require_columns(df, "input", columns)?;
    }

    let unique = df.unique_stable(subset, UniqueKeepStrategy::First, None)?;

    let report = DedupReport {
        original: df.height(),
        unique: unique.height(),
        removed: df.height() - unique.height(),
    };
    let key = subset.map_or_else(|| column_names(df), <[String]>::to_vec);
    tracing::info!("Checked duplicates on {key:?}: {}", report.summary());
    Ok((unique, report))
}

/// Deduplicate a CSV file; overwrites `input` unless `output` is given.
pub fn dedup_file(input: &Path, output: Option<&Path>, columns: Option<&[String]>) -> Result<DedupReport> {
    let df = load_dataset(input)?;
    let (mut unique, report) = dedup(&df, columns)?;
    save_dataset(&mut unique, output.unwrap_or(input))?;
    Ok(report)
}
