//! Write one CSV per distinct value of a column.

use crate::dataset::{load_dataset, require_columns, save_dataset, string_values};
use crate::error::Result;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// File stem for a group value: spaces and `/` become `_`.
pub fn sanitize_file_stem(value: &str) -> String {
    let stem = value.replace([' ', '/'], "_");
    if stem.is_empty() { "_".to_owned() } else { stem }
}

/// Group rows of `df` by `column`, in order of first appearance.
///
/// Rows with a null group value are skipped.
pub fn partition(df: &DataFrame, column: &str) -> Result<Vec<(String, DataFrame)>> {
    require_columns(df, "input", &[column])?;
    let present = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .collect()?;

    present
        .partition_by_stable([column], true)?
        .into_iter()
        .map(|group| -> Result<(String, DataFrame)> {
            let value = string_values(&group, column)?
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_default();
            Ok((value, group))
        })
        .collect()
}

/// Split `df` into `<out_dir>/<sanitized value>.csv` files.
///
/// Returns the written paths. Two values that sanitize to the same stem
/// share a file and the later group wins.
pub fn split_by_column(df: &DataFrame, column: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (value, mut group) in partition(df, column)? {
        let path = out_dir.join(format!("{}.csv", sanitize_file_stem(&value)));
        save_dataset(&mut group, &path)?;
        tracing::debug!("Wrote {} rows for '{value}' to {}", group.height(), path.display());
        written.push(path);
    }
    tracing::info!("Split into {} files under {}", written.len(), out_dir.display());
    Ok(written)
}

pub fn split_file(input: &Path, column: &str, out_dir: &Path) -> Result<Vec<PathBuf>> {
    split_by_column(&load_dataset(input)?, column, out_dir)
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("North East"), "North_East", "Spaces become underscores");
        assert_eq!(sanitize_file_stem("a/b c"), "a_b_c", "Slashes become underscores");
        assert_eq!(sanitize_file_stem(""), "_", "Empty value gets a placeholder stem");
    }

    #[test]
    fn test_partition_first_appearance_order() {
        let df = df!(
            "region" => [Some("west"), Some("east"), None, Some("west")],
            "v" => ["1", "2", "3", "4"]
        )
        .unwrap();

        let groups = partition(&df, "region").unwrap();
        let names: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["west", "east"], "Groups should follow first appearance");
        assert_eq!(
            groups.first().map(|(_, g)| g.height()),
            Some(2),
            "Both west rows should land in one group"
        );
        let total: usize = groups.iter().map(|(_, g)| g.height()).sum();
        assert_eq!(total, 3, "The null row should be skipped");
    }

    #[test]
    fn test_partition_keeps_row_order_within_group() {
        let df = df!("k" => ["b", "a", "b", "b"], "v" => ["1", "2", "3", "4"]).unwrap();

        let groups = partition(&df, "k").unwrap();
        let (name, group) = groups.first().unwrap();
        assert_eq!(name, "b", "First group should be b");
        assert_eq!(
            string_values(group, "v").unwrap(),
            vec![Some("1".to_owned()), Some("3".to_owned()), Some("4".to_owned())],
            "Rows should keep their input order"
        );
    }

    #[test]
    fn test_split_writes_one_file_per_group() {
        let dir = TempDir::new().unwrap();
        let df = df!("team" => ["A/B", "C D", "A/B"], "v" => ["1", "2", "3"]).unwrap();

        let paths = split_by_column(&df, "team", dir.path()).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("A_B.csv"), dir.path().join("C_D.csv")],
            "Should write one sanitized file per group"
        );
        let content = std::fs::read_to_string(dir.path().join("A_B.csv")).unwrap();
        assert_eq!(content, "team,v\nA/B,1\nA/B,3\n", "Group file should hold its rows");
    }
}
