//! Three-file join pipeline.
//!
//! Driven by a [`JoinConfig`](crate::config::JoinConfig) YAML document:
//!
//! 1. Load datasets A, B and C (all columns as strings).
//! 2. Join A with B on the configured identifiers using `join_type`.
//! 3. Join the result with C, reduced to its identifier plus
//!    `columns_from_c`, using `join_type_c`.
//! 4. Optionally drop B's and C's identifier columns.
//! 5. Collapse redundant columns per `redundant_fields`.
//! 6. Write the result atomically to `output_path`.
//!
//! # Example
//!
//! ```no_run
//! use tabkit::config::JoinConfig;
//! use tabkit::pipeline::run_join;
//!
//! let config = JoinConfig::from_file("join.yaml")?;
//! let report = run_join(&config, None)?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod executor;
pub mod join;
pub mod redundancy;

pub use executor::{RunReport, expand_path_template, load_inputs, run_join};
pub use join::{JoinInputs, JoinedDataset, RenamePlan, join_datasets, join_stage, project_c};
pub use redundancy::{RulePlan, plan_rule, resolve_redundancy};
