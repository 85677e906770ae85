//! Join execution: load the three inputs, join, write the result.

use super::join::{JoinInputs, JoinedDataset, join_datasets};
use crate::config::{JoinConfig, SourceTag};
use crate::dataset::{load_dataset, save_dataset};
use crate::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Report generated after a join run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Rows read from A, B and C
    pub rows_in: [usize; 3],

    /// Rows written
    pub rows_out: usize,

    /// Columns written
    pub columns_out: usize,

    /// Resolved output file
    pub output: PathBuf,

    /// Time taken for execution
    pub duration: std::time::Duration,
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        let [a, b, c] = self.rows_in;
        format!(
            "Join completed: {a}/{b}/{c} input rows -> {} rows, {} columns written to {} in {:.2}s",
            self.rows_out,
            self.columns_out,
            self.output.display(),
            self.duration.as_secs_f64()
        )
    }
}

/// Load A, B and C from the configured paths.
///
/// Relative paths resolve against the current directory.
pub fn load_inputs(config: &JoinConfig) -> Result<JoinInputs> {
    let load = |tag: SourceTag| load_dataset(&config.files.get(tag).path);
    Ok(JoinInputs {
        a: load(SourceTag::A)?,
        b: load(SourceTag::B)?,
        c: load(SourceTag::C)?,
    })
}

/// Run the full join described by `config` and write the output.
///
/// `output_override` replaces the configured `output_path`. The output file
/// is only touched once the join has succeeded.
pub fn run_join(config: &JoinConfig, output_override: Option<&Path>) -> Result<RunReport> {
    let start = std::time::Instant::now();

    let inputs = load_inputs(config)?;
    let rows_in = [inputs.a.height(), inputs.b.height(), inputs.c.height()];
    let [a, b, c] = rows_in;
    tracing::info!("Loaded inputs: A={a} B={b} C={c} rows");

    let JoinedDataset { mut data, .. } = join_datasets(inputs, config)?;

    let output = output_override.map_or_else(
        || expand_path_template(&config.output_path),
        Path::to_path_buf,
    );
    save_dataset(&mut data, &output)?;

    let report = RunReport {
        rows_in,
        rows_out: data.height(),
        columns_out: data.width(),
        output,
        duration: start.elapsed(),
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}

/// Expand `{date}` in an output path to today's local date (`YYYY-MM-DD`).
pub fn expand_path_template(template: &str) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    PathBuf::from(template.replace("{date}", &today))
}
