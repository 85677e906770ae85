//! Single-dataset utilities: percentage aggregation, de-duplication,
//! column-aligned concatenation and split-by-group.

pub mod aggregate;
pub mod concat;
pub mod dedup;
pub mod split;

pub use aggregate::{PercentageSpec, percentage_table, share_percent};
pub use concat::{DEFAULT_CONCAT_OUTPUT, concat_aligned, concat_files};
pub use dedup::{DedupReport, dedup, dedup_file};
pub use split::{partition, sanitize_file_stem, split_by_column, split_file};
