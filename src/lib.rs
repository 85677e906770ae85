//! # tabkit - config-driven CSV manipulation
//!
//! The core is a three-file join: datasets A, B and C are joined on
//! configurable identifier columns, colliding columns are renamed by a
//! declared policy, and redundant copies of disputed columns are collapsed.
//! Around it sit smaller single-file operations ported from a collection of
//! data-wrangling scripts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabkit::config::JoinConfig;
//! use tabkit::pipeline::run_join;
//!
//! let config = JoinConfig::from_yaml(
//!     r"
//! files:
//!   a: { path: customers.csv, id_column: id }
//!   b: { path: orders.csv, id_column: customer_id }
//!   c: { path: regions.csv, id_column: id }
//! columns_from_c: [region]
//! join_type_c: left
//! ",
//! )?;
//! let report = run_join(&config, None)?;
//! println!("{}", report.summary());
//! # Ok::<(), tabkit::error::TabkitError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: CSV loading (all columns as strings) and atomic saving
//! - [`config`]: YAML join configuration
//! - [`pipeline`]: join engine, redundancy resolution and execution
//! - [`enrich`]: code-prefix lookup enrichment
//! - [`reshape`]: percentage aggregation, dedup, concat and split
//! - [`error`]: error types and the [`error::ResultExt`] context helper
//! - [`logging`]: tracing subscriber setup for the binary
//!
//! Every operation works on a fresh in-memory Polars `DataFrame`; nothing is
//! shared between invocations.

pub mod config;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reshape;
