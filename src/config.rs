//! Join configuration: the YAML document that drives `tabkit join`.
//!
//! ```yaml
//! files:
//!   a: { path: customers.csv, id_column: customer_id }
//!   b: { path: orders.csv,    id_column: cust_ref }
//!   c: { path: regions.csv,   id_column: cid }
//! columns_from_c: [region, status]
//! join_type: inner
//! join_type_c: left
//! keep_only_a_identifier: true
//! redundant_fields:
//!   - { column: status, keep_from: a }
//! output_path: joined_{date}.csv
//! ```

use crate::error::{Result, TabkitError};
use polars::prelude::JoinType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Output file used when `output_path` is not configured.
pub const DEFAULT_OUTPUT_PATH: &str = "joined_output.csv";

/// Root join configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    /// The three input datasets
    pub files: FilesConfig,

    /// Columns of C retained in addition to C's identifier
    #[serde(default)]
    pub columns_from_c: Vec<String>,

    /// Join mode for A with B
    #[serde(default = "default_join_type")]
    pub join_type: JoinMode,

    /// Join mode for (A with B) with C
    #[serde(default = "default_join_type_c")]
    pub join_type_c: JoinMode,

    /// Drop B's and C's identifier columns from the result
    #[serde(default)]
    pub keep_only_a_identifier: bool,

    /// Disputed columns to collapse after the joins
    #[serde(default)]
    pub redundant_fields: Vec<RedundancyRule>,

    /// How redundancy rules select sibling columns
    #[serde(default)]
    pub redundancy_match: RedundancyMatch,

    /// Output path template (supports `{date}` substitution)
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl JoinConfig {
    /// Load and validate a join configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TabkitError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            TabkitError::ConfigParse(msg) => {
                TabkitError::ConfigParse(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate a join configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| TabkitError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| TabkitError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        for (tag, spec) in self.files.iter() {
            if spec.id_column.trim().is_empty() {
                return Err(TabkitError::ConfigParse(format!(
                    "files.{tag}.id_column must not be empty"
                )));
            }
            if spec.path.as_os_str().is_empty() {
                return Err(TabkitError::ConfigParse(format!(
                    "files.{tag}.path must not be empty"
                )));
            }
        }

        if let Some(rule) = self.redundant_fields.iter().find(|r| r.column.is_empty()) {
            return Err(TabkitError::ConfigParse(format!(
                "redundant_fields entry with keep_from '{}' has an empty column",
                rule.keep_from
            )));
        }

        if self.output_path.trim().is_empty() {
            return Err(TabkitError::ConfigParse(
                "output_path must not be empty".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Input dataset locations, keyed by source tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub a: FileSpec,
    pub b: FileSpec,
    pub c: FileSpec,
}

impl FilesConfig {
    pub fn get(&self, tag: SourceTag) -> &FileSpec {
        match tag {
            SourceTag::A => &self.a,
            SourceTag::B => &self.b,
            SourceTag::C => &self.c,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceTag, &FileSpec)> {
        SourceTag::ALL.into_iter().map(|tag| (tag, self.get(tag)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    pub path: PathBuf,
    pub id_column: String,
}

/// Relational join variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    Inner,
    Left,
    Right,
    #[serde(alias = "full")]
    Outer,
}

impl JoinMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Outer => "outer",
        }
    }

    pub(crate) fn join_type(self) -> JoinType {
        match self {
            Self::Inner => JoinType::Inner,
            Self::Left => JoinType::Left,
            Self::Right => JoinType::Right,
            Self::Outer => JoinType::Full,
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input dataset a column came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    #[default]
    A,
    B,
    C,
}

impl SourceTag {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Suffix given to this source's colliding columns; A is never renamed.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::A => "",
            Self::B => "_b",
            Self::C => "_c",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "a"),
            Self::B => write!(f, "b"),
            Self::C => write!(f, "c"),
        }
    }
}

/// Keep one copy of a disputed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundancyRule {
    pub column: String,
    #[serde(default)]
    pub keep_from: SourceTag,
}

/// Sibling selection for redundancy rules.
///
/// `Substring` matches every column containing the rule's fragment, so a
/// rule for `status` also removes an unrelated `status_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedundancyMatch {
    /// Exactly `column`, `column_b` and `column_c`
    #[default]
    Suffix,
    Substring,
}

fn default_join_type() -> JoinMode {
    JoinMode::Inner
}

fn default_join_type_c() -> JoinMode {
    JoinMode::Left
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_owned()
}
