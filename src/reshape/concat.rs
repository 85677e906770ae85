//! Stack two datasets on their shared columns.

use crate::dataset::{column_names, has_column, load_dataset, save_dataset};
use crate::error::{Result, TabkitError};
use polars::prelude::{DataFrame, DataType, Series};
use std::path::Path;

/// Output file used by `tabkit concat` when `--output` is not given.
pub const DEFAULT_CONCAT_OUTPUT: &str = "merged_output.csv";

/// Rows of `a` followed by rows of `b`, restricted to their common columns
/// (in `a`'s order) plus the `extras` that exist only in `b`.
///
/// Rows from `a` hold nulls in the extra columns. Extras absent from `b`
/// are ignored.
pub fn concat_aligned(a: &DataFrame, b: &DataFrame, extras: &[String]) -> Result<DataFrame> {
    let common: Vec<String> = column_names(a)
        .into_iter()
        .filter(|name| has_column(b, name))
        .collect();
    if common.is_empty() {
        return Err(TabkitError::NoCommonColumns);
    }

    let mut kept_extras: Vec<&str> = Vec::new();
    for extra in extras {
        if has_column(b, extra) && !common.contains(extra) && !kept_extras.contains(&extra.as_str()) {
            kept_extras.push(extra);
        }
    }

    let mut top = a.select(common.iter().map(String::as_str))?;
    for extra in &kept_extras {
        top.with_column(Series::full_null((*extra).into(), a.height(), &DataType::String))?;
    }

    let order = common.iter().map(String::as_str).chain(kept_extras.iter().copied());
    let bottom = b.select(order)?;
    let merged = top.vstack(&bottom)?;

    tracing::info!(
        "Concatenated {} + {} rows on {} common and {} extra columns",
        a.height(),
        b.height(),
        common.len(),
        kept_extras.len()
    );
    Ok(merged)
}

/// Concatenate two CSV files and write the result to `output`.
pub fn concat_files(a: &Path, b: &Path, output: &Path, extras: &[String]) -> Result<usize> {
    let a = load_dataset(a)?;
    let b = load_dataset(b)?;
    let mut merged = concat_aligned(&a, &b, extras)?;
    save_dataset(&mut merged, output)?;
    Ok(merged.height())
}
