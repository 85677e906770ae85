//! Three-way join engine.
//!
//! A is joined with B, then the result is joined with a projection of C.
//! Both stages join on A's identifier. Output columns are declared up front
//! instead of inferred from the join: the left side's columns in their order,
//! then the right side's columns in theirs, with every right column that
//! collides with a left column renamed `<name>_b` (stage AB) or `<name>_c`
//! (stage AC). A's columns are never renamed.

use super::redundancy::resolve_redundancy;
use crate::config::{JoinConfig, JoinMode, SourceTag};
use crate::dataset::{column_names, require_columns};
use crate::error::{Result, ResultExt as _, TabkitError};
use polars::prelude::*;
use std::collections::HashSet;

const LEFT_KEY: &str = "__tabkit_left_key";
const RIGHT_KEY: &str = "__tabkit_right_key";

/// The three loaded input datasets.
#[derive(Debug, Clone)]
pub struct JoinInputs {
    pub a: DataFrame,
    pub b: DataFrame,
    pub c: DataFrame,
}

/// Result of [`join_datasets`].
///
/// Besides the merged frame it remembers the output names of the three
/// identifier columns, which differ from the configured names whenever the
/// renaming policy applied to them.
#[derive(Debug, Clone)]
pub struct JoinedDataset {
    pub data: DataFrame,
    pub a_id: String,
    pub b_id: String,
    pub c_id: String,
}

impl JoinedDataset {
    /// Output name of `side`'s identifier column.
    pub fn identifier(&self, side: SourceTag) -> &str {
        match side {
            SourceTag::A => &self.a_id,
            SourceTag::B => &self.b_id,
            SourceTag::C => &self.c_id,
        }
    }

    /// Project the merged frame to a single identifier column.
    ///
    /// Fails with [`TabkitError::MissingKey`] when that identifier was
    /// removed, e.g. by `keep_only_a_identifier`.
    pub fn identifiers(&self, side: SourceTag) -> Result<DataFrame> {
        let name = self.identifier(side);
        require_columns(&self.data, "joined", &[name])?;
        Ok(self.data.select([name])?)
    }
}

/// One join stage's renaming of right-hand columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    /// `(input name, output name)` in right-side column order
    pub columns: Vec<(String, String)>,
}

impl RenamePlan {
    /// Apply the collision policy for `right` joined onto `left`.
    ///
    /// Names kept as-is are reserved before renamed ones are checked, so a
    /// right side carrying both `x` and `x_b` reports the rename of `x` as the
    /// collision.
    pub fn build(left: &[String], right: &[String], tag: SourceTag) -> Result<Self> {
        let left_set: HashSet<&str> = left.iter().map(String::as_str).collect();
        let columns: Vec<(String, String)> = right
            .iter()
            .map(|name| {
                let out = if left_set.contains(name.as_str()) {
                    format!("{name}{}", tag.suffix())
                } else {
                    name.clone()
                };
                (name.clone(), out)
            })
            .collect();

        let mut taken: HashSet<&str> = left_set;
        taken.extend(
            columns
                .iter()
                .filter(|(input, out)| input == out)
                .map(|(_, out)| out.as_str()),
        );
        for (input, out) in columns.iter().filter(|(input, out)| input != out) {
            if !taken.insert(out.as_str()) {
                return Err(TabkitError::ColumnCollision {
                    stage: stage_name(tag).to_owned(),
                    original: input.clone(),
                    column: out.clone(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Output name of an input column.
    pub fn output_name(&self, input: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == input)
            .map(|(_, out)| out.as_str())
    }

    pub fn renamed(&self) -> impl Iterator<Item = &(String, String)> {
        self.columns.iter().filter(|(input, out)| input != out)
    }
}

fn stage_name(tag: SourceTag) -> &'static str {
    match tag {
        SourceTag::A => "A",
        SourceTag::B => "A-B",
        SourceTag::C => "AB-C",
    }
}

/// Reduce C to its identifier followed by the allow-listed columns.
///
/// Duplicate names and a repeated identifier are dropped, first occurrence
/// wins.
pub fn project_c(c: &DataFrame, id_column: &str, columns_from_c: &[String]) -> Result<DataFrame> {
    let mut keep: Vec<&str> = vec![id_column];
    for column in columns_from_c {
        if !keep.contains(&column.as_str()) {
            keep.push(column);
        }
    }
    require_columns(c, "c", &keep)?;
    Ok(c.select(keep)?)
}

/// Join `right` onto `left` matching `left[left_key]` with `right[right_key]`.
///
/// The output holds `left`'s columns then `right`'s columns under the names
/// given by `plan`. Null keys never match. Both key columns are kept through
/// the join so a right-only row still carries its right-side identifier
/// while the left side's columns are null.
pub fn join_stage(
    left: DataFrame,
    left_key: &str,
    right: DataFrame,
    right_key: &str,
    plan: &RenamePlan,
    mode: JoinMode,
) -> Result<DataFrame> {
    let mut output: Vec<Expr> = left
        .get_column_names_str()
        .into_iter()
        .map(col)
        .collect();
    output.extend(plan.columns.iter().map(|(_, out)| col(out.as_str())));

    let mut right_exprs: Vec<Expr> = plan
        .columns
        .iter()
        .map(|(input, out)| col(input.as_str()).alias(out.as_str()))
        .collect();
    right_exprs.push(col(right_key).alias(RIGHT_KEY));

    let joined = left
        .lazy()
        .with_column(col(left_key).alias(LEFT_KEY))
        .join(
            right.lazy().select(right_exprs),
            [col(LEFT_KEY)],
            [col(RIGHT_KEY)],
            JoinArgs::new(mode.join_type()).with_coalesce(JoinCoalesce::KeepColumns),
        )
        .select(output)
        .collect()?;
    Ok(joined)
}

/// Join A, B and C as configured and resolve redundant columns.
///
/// Nothing is written; see [`super::run_join`] for the persisting variant.
pub fn join_datasets(inputs: JoinInputs, config: &JoinConfig) -> Result<JoinedDataset> {
    let files = &config.files;
    let id_a = files.a.id_column.as_str();
    let id_b = files.b.id_column.as_str();
    let id_c = files.c.id_column.as_str();

    require_columns(&inputs.a, "a", &[id_a])?;
    require_columns(&inputs.b, "b", &[id_b])?;
    let c = project_c(&inputs.c, id_c, &config.columns_from_c)?;

    let plan_b = RenamePlan::build(&column_names(&inputs.a), &column_names(&inputs.b), SourceTag::B)?;
    for (input, out) in plan_b.renamed() {
        tracing::debug!("Renaming B column '{input}' to '{out}'");
    }
    let b_id = plan_b.output_name(id_b).unwrap_or(id_b).to_owned();

    let ab = join_stage(inputs.a, id_a, inputs.b, id_b, &plan_b, config.join_type)
        .context("A-B join failed")?;
    tracing::info!("Joined A with B ({}): {} rows", config.join_type, ab.height());

    let plan_c = RenamePlan::build(&column_names(&ab), &column_names(&c), SourceTag::C)?;
    for (input, out) in plan_c.renamed() {
        tracing::debug!("Renaming C column '{input}' to '{out}'");
    }
    let c_id = plan_c.output_name(id_c).unwrap_or(id_c).to_owned();

    let mut data = join_stage(ab, id_a, c, id_c, &plan_c, config.join_type_c)
        .context("AB-C join failed")?;
    tracing::info!("Joined AB with C ({}): {} rows", config.join_type_c, data.height());

    if config.keep_only_a_identifier {
        let keep: Vec<String> = column_names(&data)
            .into_iter()
            .filter(|name| *name != b_id && *name != c_id)
            .collect();
        data = data.select(keep)?;
        tracing::debug!("Dropped identifier columns '{b_id}' and '{c_id}'");
    }

    let data = resolve_redundancy(data, &config.redundant_fields, config.redundancy_match)?;

    Ok(JoinedDataset {
        data,
        a_id: id_a.to_owned(),
        b_id,
        c_id,
    })
}
