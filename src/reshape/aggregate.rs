//! Percentage breakdown of a weight column by sub-category.
//!
//! Given rows of `(empName, Category, Sub_Category, Hit)`, produces one row
//! per entity with each known sub-category's share of the entity's total
//! weight rendered as `"N%"`.

use crate::dataset::{require_columns, string_column, string_values};
use crate::error::{Result, TabkitError};
use polars::prelude::*;

const WEIGHT: &str = "__tabkit_weight";
const TOTAL: &str = "__tabkit_total";

/// Column names and options for [`percentage_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageSpec {
    pub entity_column: String,
    pub category_column: String,
    pub sub_category_column: String,
    pub weight_column: String,
    /// Sub-categories that get an output column, in output order
    pub known: Vec<String>,
    /// Group by `(entity, category)` instead of entity alone
    pub group_by_category: bool,
}

impl Default for PercentageSpec {
    fn default() -> Self {
        Self {
            entity_column: "empName".to_owned(),
            category_column: "Category".to_owned(),
            sub_category_column: "Sub_Category".to_owned(),
            weight_column: "Hit".to_owned(),
            known: ["Gold", "Silver", "Bronse"].map(str::to_owned).to_vec(),
            group_by_category: false,
        }
    }
}

/// `round(100 * part / total)`, ties away from zero; `0` for a zero total.
pub fn share_percent(part: f64, total: f64) -> i64 {
    if total == 0.0 {
        return 0;
    }
    (100.0 * part / total).round() as i64
}

fn part_column(index: usize) -> String {
    format!("__tabkit_part_{index}")
}

fn float_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    Ok(df
        .column(column)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect())
}

/// Rows that take part in the aggregation, with the weight parsed into
/// [`WEIGHT`].
///
/// Only these rows have their weight checked, so junk in a row that is
/// skipped anyway never fails the run.
fn counted_rows(df: &DataFrame, spec: &PercentageSpec) -> Result<LazyFrame> {
    let weight = spec.weight_column.as_str();
    let parsed = df
        .clone()
        .lazy()
        .filter(
            col(spec.entity_column.as_str())
                .is_not_null()
                .and(col(spec.sub_category_column.as_str()).is_not_null()),
        )
        .with_columns([
            col(spec.category_column.as_str()).fill_null(lit("")),
            col(weight).cast(DataType::Float64).alias(WEIGHT),
        ]);

    let invalid = parsed
        .clone()
        .filter(
            col(weight)
                .is_not_null()
                .and(col(weight).neq(lit("")))
                .and(col(WEIGHT).is_null()),
        )
        .select([col(weight)])
        .limit(1)
        .collect()?;
    if let Some(value) = string_values(&invalid, weight)?.into_iter().flatten().next() {
        return Err(TabkitError::InvalidValue {
            column: weight.to_owned(),
            value,
            reason: "not a number".to_owned(),
        });
    }

    Ok(parsed.with_column(col(WEIGHT).fill_null(lit(0.0))))
}

/// Build the percentage table, one row per entity sorted by entity.
///
/// Rows with a null entity or sub-category are ignored. Sub-categories not
/// listed in `spec.known` still count towards the total. Null or empty
/// weights count as zero; any other non-numeric weight on a counted row is
/// an [`TabkitError::InvalidValue`].
pub fn percentage_table(df: &DataFrame, spec: &PercentageSpec) -> Result<DataFrame> {
    require_columns(
        df,
        "input",
        &[
            &spec.entity_column,
            &spec.category_column,
            &spec.sub_category_column,
            &spec.weight_column,
        ],
    )?;

    let entity = spec.entity_column.as_str();
    let category = spec.category_column.as_str();
    let sub = spec.sub_category_column.as_str();

    let mut keys = vec![col(entity)];
    let mut aggs = vec![col(WEIGHT).sum().alias(TOTAL)];
    if spec.group_by_category {
        keys.push(col(category));
    } else {
        aggs.push(col(category).first());
    }
    aggs.extend(spec.known.iter().enumerate().map(|(index, name)| {
        when(col(sub).eq(lit(name.as_str())))
            .then(col(WEIGHT))
            .otherwise(lit(0.0))
            .sum()
            .alias(part_column(index))
    }));

    let grouped = counted_rows(df, spec)?
        .group_by(keys.clone())
        .agg(aggs)
        .sort_by_exprs(keys, SortMultipleOptions::default())
        .collect()?;

    let totals = float_values(&grouped, TOTAL)?;
    let mut columns = vec![grouped.column(entity)?.clone(), grouped.column(category)?.clone()];
    for (index, name) in spec.known.iter().enumerate() {
        let shares = float_values(&grouped, &part_column(index))?
            .into_iter()
            .zip(&totals)
            .map(|(part, total)| {
                let percent = share_percent(part.unwrap_or(0.0), total.unwrap_or(0.0));
                Some(format!("{percent}%"))
            })
            .collect();
        columns.push(string_column(name, shares));
    }

    tracing::debug!("Aggregated {} groups", grouped.height());
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use crate::dataset::column_names;

    fn row_values(df: &DataFrame, column: &str) -> Vec<String> {
        string_values(df, column)
            .unwrap()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }

    #[test]
    fn test_share_percent_rounding() {
        assert_eq!(share_percent(3.0, 4.0), 75, "3 of 4 should be 75%");
        assert_eq!(share_percent(1.0, 3.0), 33, "1 of 3 should round down");
        assert_eq!(share_percent(2.0, 3.0), 67, "2 of 3 should round up");
        assert_eq!(share_percent(1.0, 8.0), 13, "12.5 should round away from zero");
        assert_eq!(share_percent(5.0, 0.0), 0, "Zero total should give 0");
    }

    #[test]
    fn test_gold_silver_bronse_example() {
        let df = df!(
            "empName" => ["A", "A", "A"],
            "Category" => ["X", "X", "X"],
            "Sub_Category" => ["Gold", "Silver", "Gold"],
            "Hit" => ["2", "1", "1"]
        )
        .unwrap();

        let out = percentage_table(&df, &PercentageSpec::default()).unwrap();
        assert_eq!(
            column_names(&out),
            vec!["empName", "Category", "Gold", "Silver", "Bronse"],
            "Output should hold entity, category and one column per known sub-category"
        );
        assert_eq!(row_values(&out, "Gold"), vec!["75%"], "Gold should be 3 of 4");
        assert_eq!(row_values(&out, "Silver"), vec!["25%"], "Silver should be 1 of 4");
        assert_eq!(row_values(&out, "Bronse"), vec!["0%"], "Absent Bronse should be 0%");
    }

    #[test]
    fn test_entities_sorted_and_first_category_kept() {
        let df = df!(
            "empName" => ["zed", "amy", "zed", "amy"],
            "Category" => ["late", "c1", "other", "c2"],
            "Sub_Category" => ["Gold", "Bronse", "Platinum", "Bronse"],
            "Hit" => ["1", "4", "1", ""]
        )
        .unwrap();

        let out = percentage_table(&df, &PercentageSpec::default()).unwrap();
        assert_eq!(row_values(&out, "empName"), vec!["amy", "zed"], "Entities should be sorted");
        assert_eq!(
            row_values(&out, "Category"),
            vec!["c1", "late"],
            "First category seen should be kept"
        );
        assert_eq!(
            row_values(&out, "Bronse"),
            vec!["100%", "0%"],
            "Empty weight should count as zero"
        );
        // Platinum has no column but halves zed's Gold share
        assert_eq!(
            row_values(&out, "Gold"),
            vec!["0%", "50%"],
            "Unknown sub-category should count toward the total"
        );
    }

    #[test]
    fn test_group_by_category() {
        let df = df!(
            "empName" => ["A", "A", "A"],
            "Category" => ["X", "Y", "Y"],
            "Sub_Category" => ["Gold", "Silver", "Bronse"],
            "Hit" => ["5", "1", "3"]
        )
        .unwrap();
        let spec = PercentageSpec {
            group_by_category: true,
            ..PercentageSpec::default()
        };

        let out = percentage_table(&df, &spec).unwrap();
        assert_eq!(out.height(), 2, "Should have one row per entity and category");
        assert_eq!(row_values(&out, "Category"), vec!["X", "Y"], "Categories should be sorted");
        assert_eq!(row_values(&out, "Gold"), vec!["100%", "0%"], "Gold share per category");
        assert_eq!(row_values(&out, "Silver"), vec!["0%", "25%"], "Silver share per category");
        assert_eq!(row_values(&out, "Bronse"), vec!["0%", "75%"], "Bronse share per category");
    }

    #[test]
    fn test_zero_total_renders_zero() {
        let df = df!(
            "empName" => ["A"],
            "Category" => ["X"],
            "Sub_Category" => ["Gold"],
            "Hit" => ["0"]
        )
        .unwrap();
        let out = percentage_table(&df, &PercentageSpec::default()).unwrap();
        assert_eq!(row_values(&out, "Gold"), vec!["0%"], "Zero total should render 0%");
    }

    #[test]
    fn test_non_numeric_weight() {
        let df = df!(
            "empName" => ["A"],
            "Category" => ["X"],
            "Sub_Category" => ["Gold"],
            "Hit" => ["lots"]
        )
        .unwrap();
        let err = percentage_table(&df, &PercentageSpec::default()).unwrap_err();
        match err {
            TabkitError::InvalidValue { column, value, .. } => {
                assert_eq!(column, "Hit", "Error should name the weight column");
                assert_eq!(value, "lots", "Error should carry the bad value");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_weight_on_skipped_row_is_ignored() {
        let df = df!(
            "empName" => [Some("A"), None, Some("A")],
            "Category" => ["X", "X", "X"],
            "Sub_Category" => [Some("Gold"), Some("Gold"), None],
            "Hit" => ["2", "n/a", "junk"]
        )
        .unwrap();

        let out = percentage_table(&df, &PercentageSpec::default()).unwrap();
        assert_eq!(out.height(), 1, "Only entity A should be reported");
        assert_eq!(
            row_values(&out, "Gold"),
            vec!["100%"],
            "Rows without entity or sub-category should not be counted"
        );
    }
}
