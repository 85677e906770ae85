//! CSV loading and saving.
//!
//! Every column is read as a string so that identifiers like `007` or
//! `1e3` survive a round-trip unchanged. Numeric interpretation is left to
//! the operations that need it.

use crate::error::{Result, ResultExt as _, TabkitError};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Read a CSV file with a header row into a frame of string columns.
///
/// Fails with [`TabkitError::SourceNotFound`] if `path` is not a file and
/// [`TabkitError::EmptyDataset`] if it holds no data rows.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(TabkitError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    // Polars refuses zero-byte input outright, so report it the same way as
    // a header-only file.
    if std::fs::metadata(path)?.len() == 0 {
        return Err(TabkitError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(LazyFrame::collect)
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    if df.height() == 0 {
        return Err(TabkitError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        "Loaded {} ({} rows, {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write `df` to `path` as CSV, replacing any existing file.
///
/// The frame is written to a sibling temp file first and renamed into place,
/// so a failed write never leaves a truncated output behind. Missing parent
/// directories are created.
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp = temp_sibling(path);
    let written = File::create(&tmp)
        .map_err(TabkitError::from)
        .and_then(|file| {
            CsvWriter::new(file)
                .include_header(true)
                .finish(df)
                .map_err(TabkitError::from)
        })
        .and_then(|()| std::fs::rename(&tmp, path).map_err(TabkitError::from));

    if written.is_err()
        && let Err(e) = std::fs::remove_file(&tmp)
    {
        tracing::debug!("Failed to remove temp file {}: {e}", tmp.display());
    }
    written.with_context(|| format!("Failed to write CSV {}", path.display()))?;

    tracing::debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_str()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub fn has_column(df: &DataFrame, column: &str) -> bool {
    df.get_column_names_str().contains(&column)
}

/// Fail with [`TabkitError::MissingKey`] for the first absent column.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, dataset: &str, columns: &[S]) -> Result<()> {
    match columns.iter().find(|c| !has_column(df, c.as_ref())) {
        Some(missing) => Err(TabkitError::missing_key(dataset, missing.as_ref())),
        None => Ok(()),
    }
}

/// Cell values of `column` as owned strings, nulls preserved.
pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Build a string column from owned values.
pub fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}
