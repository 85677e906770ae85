//! Code-prefix lookup enrichment.
//!
//! For every row whose trigger column holds the trigger value (by default
//! `report == "mist"`), the leading word of the text column (`Name`) is
//! looked up in a reference table and the row's `main_group` / `Main_class`
//! are set from the hit. Other rows are left untouched.

pub mod lookup;

pub use lookup::{Classification, LookupColumns, LookupTable};

use crate::dataset::{
    has_column, load_dataset, require_columns, save_dataset, string_column, string_values,
};
use crate::error::Result;
use polars::prelude::DataFrame;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LEADING_WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\w+").ok());

/// Which rows to enrich and from which column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOptions {
    pub trigger_column: String,
    pub trigger_value: String,
    pub source_column: String,
    /// Column back-filled with the extracted code when it is empty on a hit
    pub code_column: Option<String>,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            trigger_column: "report".to_owned(),
            trigger_value: "mist".to_owned(),
            source_column: "Name".to_owned(),
            code_column: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub rows: usize,
    pub triggered: usize,
    pub matched: usize,
}

/// The leading run of word characters of `value`, or `""` if it starts with
/// anything else.
///
/// ```
/// assert_eq!(tabkit::enrich::extract_code("COMP PETER"), "COMP");
/// assert_eq!(tabkit::enrich::extract_code(" COMP"), "");
/// ```
pub fn extract_code(value: &str) -> &str {
    LEADING_WORD
        .as_ref()
        .and_then(|re| re.find(value))
        .map_or("", |m| m.as_str())
}

/// Enrich `df` in memory.
///
/// The classification columns are added as empty strings when absent.
/// Existing values are kept, nulls become `""`.
pub fn enrich(
    mut df: DataFrame,
    lookup: &LookupTable,
    options: &EnrichOptions,
) -> Result<(DataFrame, EnrichReport)> {
    require_columns(
        &df,
        "primary",
        &[&options.trigger_column, &options.source_column],
    )?;

    let rows = df.height();
    let triggers = string_values(&df, &options.trigger_column)?;
    let sources = string_values(&df, &options.source_column)?;

    let columns = lookup.columns();
    let mut groups = existing_or_empty(&df, &columns.group, rows)?;
    let mut classes = existing_or_empty(&df, &columns.class, rows)?;
    let mut codes = match &options.code_column {
        Some(name) => Some(existing_or_empty(&df, name, rows)?),
        None => None,
    };

    let mut report = EnrichReport {
        rows,
        ..EnrichReport::default()
    };

    for (idx, (trigger, source)) in triggers.iter().zip(&sources).enumerate() {
        if trigger.as_deref() != Some(options.trigger_value.as_str()) {
            continue;
        }
        report.triggered += 1;

        let code = extract_code(source.as_deref().unwrap_or(""));
        let Some(hit) = lookup.get(code) else {
            continue;
        };
        report.matched += 1;

        if let (Some(group), Some(class)) = (groups.get_mut(idx), classes.get_mut(idx)) {
            group.clone_from(&hit.group);
            class.clone_from(&hit.class);
        }
        if let Some(cell) = codes.as_mut().and_then(|codes| codes.get_mut(idx))
            && cell.is_empty()
        {
            *cell = code.to_owned();
        }
    }

    df.with_column(owned_column(&columns.group, groups))?;
    df.with_column(owned_column(&columns.class, classes))?;
    if let (Some(name), Some(codes)) = (&options.code_column, codes) {
        df.with_column(owned_column(name, codes))?;
    }

    tracing::info!(
        "Enriched {} of {} triggered rows ({} rows scanned)",
        report.matched,
        report.triggered,
        report.rows
    );
    Ok((df, report))
}

/// Enrich a CSV file against a lookup CSV.
///
/// The result overwrites `input` unless `output` is given.
pub fn enrich_file(
    input: &Path,
    lookup_path: &Path,
    output: Option<&Path>,
    options: &EnrichOptions,
    columns: LookupColumns,
) -> Result<EnrichReport> {
    let lookup = LookupTable::from_file(lookup_path, columns)?;
    let df = load_dataset(input)?;
    let (mut df, report) = enrich(df, &lookup, options)?;
    save_dataset(&mut df, output.unwrap_or(input))?;
    Ok(report)
}

fn existing_or_empty(df: &DataFrame, column: &str, rows: usize) -> Result<Vec<String>> {
    if !has_column(df, column) {
        return Ok(vec![String::new(); rows]);
    }
    Ok(string_values(df, column)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn owned_column(name: &str, values: Vec<String>) -> polars::prelude::Column {
    string_column(name, values.into_iter().map(Some).collect())
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use polars::prelude::*;

    fn lookup() -> LookupTable {
        let df = df!(
            "codebase" => ["COMP", "EVT", "DVD"],
            "main_group" => ["dataScience", "analytics", "Play"],
            "Main_class" => ["analytics", "basicPackage", "models"]
        )
        .unwrap();
        LookupTable::from_dataset(&df, LookupColumns::default()).unwrap()
    }

    fn values(df: &DataFrame, column: &str) -> Vec<String> {
        string_values(df, column)
            .unwrap()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }

    #[test]
    fn test_extract_code() {
        assert_eq!(extract_code("COMP PETER"), "COMP", "Code stops at the first space");
        assert_eq!(extract_code("_foo"), "_foo", "Underscore is a word character");
        assert_eq!(extract_code(""), "", "Empty input has no code");
        assert_eq!(extract_code("COMP123_X"), "COMP123_X", "Digits belong to the code");
        assert_eq!(extract_code("-dash"), "", "Leading punctuation gives no code");
        assert_eq!(extract_code("Café-au-lait"), "Café", "Unicode letters are word characters");
        assert_eq!(extract_code("Ω2\tx"), "Ω2", "Tab ends the code");
        assert_eq!(extract_code("٣٤ x"), "٣٤", "Unicode digits are word characters");
    }

    #[test]
    fn test_only_triggered_rows_are_enriched() {
        let df = df!(
            "Name" => ["COMP PETER", "EVT MAKES", "XYZ thing", "DVD PLAY"],
            "report" => ["mist", "other", "mist", "mist"]
        )
        .unwrap();

        let (out, report) = enrich(df, &lookup(), &EnrichOptions::default()).unwrap();
        assert_eq!(
            report,
            EnrichReport {
                rows: 4,
                triggered: 3,
                matched: 2,
            },
            "Three rows are triggered and two codes are known"
        );
        assert_eq!(
            values(&out, "main_group"),
            vec!["dataScience", "", "", "Play"],
            "Only matched triggered rows get a group"
        );
        assert_eq!(
            values(&out, "Main_class"),
            vec!["analytics", "", "", "models"],
            "Class is set together with group"
        );
    }

    #[test]
    fn test_existing_values_kept_and_code_backfilled() {
        let df = df!(
            "Name" => [Some("COMP PETER"), Some("EVT MAKES"), None],
            "Category" => ["UTILITY", "Cooking", "UTILITY"],
            "main_group" => [Some("old"), Some("analytics"), None],
            "Main_class" => ["old", "basicPackage", "package"],
            "codebase" => [None, Some("EVT"), None::<&str>]
        )
        .unwrap();
        let options = EnrichOptions {
            trigger_column: "Category".to_owned(),
            trigger_value: "UTILITY".to_owned(),
            code_column: Some("codebase".to_owned()),
            ..EnrichOptions::default()
        };

        let (out, report) = enrich(df, &lookup(), &options).unwrap();
        assert_eq!(report.triggered, 2, "Two UTILITY rows are triggered");
        assert_eq!(report.matched, 1, "Only the COMP row has a known code");
        assert_eq!(
            values(&out, "main_group"),
            vec!["dataScience", "analytics", ""],
            "Hit overwrites, other rows keep their values"
        );
        assert_eq!(
            values(&out, "Main_class"),
            vec!["analytics", "basicPackage", "package"],
            "Untriggered and unmatched rows keep their class"
        );
        assert_eq!(
            values(&out, "codebase"),
            vec!["COMP", "EVT", ""],
            "Empty code is back-filled on a hit only"
        );
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let df = df!(
            "Name" => ["COMP PETER", "DVD PLAY"],
            "report" => ["mist", "mist"]
        )
        .unwrap();
        let table = lookup();
        let options = EnrichOptions::default();

        let (once, _) = enrich(df, &table, &options).unwrap();
        let (twice, _) = enrich(once.clone(), &table, &options).unwrap();
        assert!(once.equals_missing(&twice), "Second pass should change nothing");
    }

    #[test]
    fn test_missing_trigger_column() {
        let df = df!("Name" => ["COMP"]).unwrap();
        let err = enrich(df, &lookup(), &EnrichOptions::default()).unwrap_err();
        assert!(err.to_string().contains("report"), "Error should name the trigger column");
    }
}
