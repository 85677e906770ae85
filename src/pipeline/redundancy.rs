//! Collapse disputed columns left behind by the joins.
//!
//! A rule `{ column: status, keep_from: b }` keeps B's copy of `status`
//! (`status_b`), renames it back to `status` and drops the other copies.

use crate::config::{RedundancyMatch, RedundancyRule};
use crate::dataset::column_names;
use crate::error::Result;
use polars::prelude::*;

/// What one rule does to a column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePlan {
    /// Column kept and renamed to the rule's name
    pub survivor: String,
    pub dropped: Vec<String>,
}

/// Columns a rule considers copies of its disputed column.
pub fn siblings<'a>(columns: &'a [String], rule: &RedundancyRule, mode: RedundancyMatch) -> Vec<&'a str> {
    let fragment = rule.column.as_str();
    columns
        .iter()
        .map(String::as_str)
        .filter(|name| match mode {
            RedundancyMatch::Suffix => {
                *name == fragment
                    || name
                        .strip_prefix(fragment)
                        .is_some_and(|rest| rest == "_b" || rest == "_c")
            }
            RedundancyMatch::Substring => name.contains(fragment),
        })
        .collect()
}

/// Decide the survivor for `rule`, or `None` when no copy exists.
///
/// The survivor is `keep_from`'s copy, else the unsuffixed column, else the
/// first copy in column order.
pub fn plan_rule(columns: &[String], rule: &RedundancyRule, mode: RedundancyMatch) -> Option<RulePlan> {
    let found = siblings(columns, rule, mode);
    let preferred = format!("{}{}", rule.column, rule.keep_from.suffix());

    let survivor = [preferred.as_str(), rule.column.as_str()]
        .into_iter()
        .find(|name| found.contains(name))
        .or_else(|| found.first().copied())?
        .to_owned();

    let dropped = found
        .into_iter()
        .filter(|name| *name != survivor)
        .map(str::to_owned)
        .collect();

    Some(RulePlan { survivor, dropped })
}

/// Apply `rules` in order.
///
/// Applying the same rules to the result again leaves its columns unchanged.
pub fn resolve_redundancy(
    df: DataFrame,
    rules: &[RedundancyRule],
    mode: RedundancyMatch,
) -> Result<DataFrame> {
    let mut df = df;
    for rule in rules {
        let columns = column_names(&df);
        let Some(plan) = plan_rule(&columns, rule, mode) else {
            tracing::warn!("Redundancy rule '{}' matched no columns", rule.column);
            continue;
        };

        if plan.dropped.is_empty() && plan.survivor == rule.column {
            continue;
        }

        tracing::debug!(
            "Keeping '{}' as '{}', dropping {:?}",
            plan.survivor,
            rule.column,
            plan.dropped
        );

        let exprs: Vec<Expr> = columns
            .iter()
            .filter(|name| !plan.dropped.contains(name))
            .map(|name| {
                if *name == plan.survivor {
                    col(name.as_str()).alias(rule.column.as_str())
                } else {
                    col(name.as_str())
                }
            })
            .collect();
        df = df.lazy().select(exprs).collect()?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;
    use crate::config::SourceTag;
    use crate::dataset::string_values;

    fn rule(column: &str, keep_from: SourceTag) -> RedundancyRule {
        RedundancyRule {
            column: column.to_owned(),
            keep_from,
        }
    }

    fn joined() -> DataFrame {
        df!(
            "id" => ["1", "2"],
            "status" => ["a1", "a2"],
            "status_b" => ["b1", "b2"],
            "status_code" => ["s1", "s2"],
            "status_c" => ["c1", "c2"]
        )
        .unwrap()
    }

    #[test]
    fn test_suffix_mode_keeps_a_by_default() {
        let out = resolve_redundancy(
            joined(),
            &[rule("status", SourceTag::A)],
            RedundancyMatch::Suffix,
        )
        .unwrap();
        assert_eq!(column_names(&out), vec!["id", "status", "status_code"], "Copies of status should be dropped");
        assert_eq!(
            string_values(&out, "status").unwrap(),
            vec![Some("a1".to_owned()), Some("a2".to_owned())],
            "A values should survive"
        );
    }

    #[test]
    fn test_keep_from_c_renames_survivor() {
        let out = resolve_redundancy(
            joined(),
            &[rule("status", SourceTag::C)],
            RedundancyMatch::Suffix,
        )
        .unwrap();
        assert_eq!(column_names(&out), vec!["id", "status_code", "status"], "C copy should survive in its position");
        assert_eq!(
            string_values(&out, "status").unwrap(),
            vec![Some("c1".to_owned()), Some("c2".to_owned())],
            "C values should survive"
        );
    }

    #[test]
    fn test_substring_mode_over_matches() {
        let out = resolve_redundancy(
            joined(),
            &[rule("status", SourceTag::A)],
            RedundancyMatch::Substring,
        )
        .unwrap();
        assert_eq!(column_names(&out), vec!["id", "status"], "Substring match also drops status_code");
    }

    #[test]
    fn test_absent_keep_from_falls_back_to_plain_column() {
        let df = df!("status" => ["a"], "status_b" => ["b"]).unwrap();
        let out =
            resolve_redundancy(df, &[rule("status", SourceTag::C)], RedundancyMatch::Suffix).unwrap();
        assert_eq!(column_names(&out), vec!["status"], "Plain column should survive");
        assert_eq!(string_values(&out, "status").unwrap(), vec![Some("a".to_owned())], "Plain values should be kept");
    }

    #[test]
    fn test_no_sibling_is_noop() {
        let out = resolve_redundancy(
            joined(),
            &[rule("region", SourceTag::B)],
            RedundancyMatch::Suffix,
        )
        .unwrap();
        assert_eq!(column_names(&out), column_names(&joined()), "Unmatched rule should change nothing");
    }

    #[test]
    fn test_only_suffixed_copy_is_renamed() {
        let df = df!("id" => ["1"], "score_c" => ["9"]).unwrap();
        let out =
            resolve_redundancy(df, &[rule("score", SourceTag::A)], RedundancyMatch::Suffix).unwrap();
        assert_eq!(column_names(&out), vec!["id", "score"], "Lone copy should take the rule name");
    }

    #[test]
    fn test_idempotent() {
        let rules = [rule("status", SourceTag::B), rule("missing", SourceTag::A)];
        for mode in [RedundancyMatch::Suffix, RedundancyMatch::Substring] {
            let once = resolve_redundancy(joined(), &rules, mode).unwrap();
            let twice = resolve_redundancy(once.clone(), &rules, mode).unwrap();
            assert_eq!(column_names(&once), column_names(&twice), "Second pass should keep the columns");
            assert!(once.equals_missing(&twice), "Second pass should keep the values");
        }
    }
}
