//! Centralized error handling for tabkit.
//!
//! Every library operation returns [`Result`], whose error type is the
//! [`TabkitError`] enum. Variants carry the failing path or column so a
//! failed run can be diagnosed from the log alone.
//!
//! ## Context Extension Trait
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`TabkitError`]:
//!
//! ```no_run
//! use tabkit::error::ResultExt as _;
//!
//! fn read_lookup() -> tabkit::error::Result<String> {
//!     std::fs::read_to_string("lookup_file.csv").context("Failed to read lookup file")
//! }
//! ```
//!
//! The binary wraps these in `anyhow` at the top level, so `?` works in
//! both directions.

use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabkit operations.
#[derive(Debug, Error)]
pub enum TabkitError {
    /// The configuration document does not exist.
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The configuration document is malformed or fails validation.
    #[error("invalid configuration: {0}")]
    ConfigParse(String),

    /// An input dataset path does not resolve to a file.
    #[error("source dataset not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// A configured identifier or column is absent from its dataset.
    #[error("dataset '{dataset}' has no column '{column}'")]
    MissingKey { dataset: String, column: String },

    /// The source exists but holds no data rows.
    #[error("dataset {} contains no rows", path.display())]
    EmptyDataset { path: PathBuf },

    /// The join renaming policy would produce a duplicate column name.
    #[error("column '{column}' already exists, cannot rename '{original}' during the {stage} join")]
    ColumnCollision {
        stage: String,
        original: String,
        column: String,
    },

    /// A cell could not be interpreted (e.g. a non-numeric weight).
    #[error("invalid value '{value}' in column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    /// Two datasets to be stacked have no column in common.
    #[error("datasets share no columns")]
    NoCommonColumns,

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars errors while reading, joining or writing frames
    #[error("data processing error: {0}")]
    DataProcessing(#[from] PolarsError),

    /// An error wrapped with a description of what was being attempted.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<TabkitError>,
    },
}

impl TabkitError {
    pub(crate) fn missing_key(dataset: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingKey {
            dataset: dataset.into(),
            column: column.into(),
        }
    }
}

/// Result type alias for tabkit operations.
pub type Result<T> = std::result::Result<T, TabkitError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TabkitError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| TabkitError::Context {
            context: msg.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TabkitError::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}
