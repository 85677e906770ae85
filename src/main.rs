//! # tabkit command-line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize logging (stderr, optional rotating files)
//!   └─> Run the subcommand; log the error and exit 1 on failure
//! ```
//!
//! ```bash
//! tabkit join --config join.yaml
//! tabkit enrich large_file.csv lookup_file.csv
//! tabkit aggregate hits.csv --output percentages.csv
//! ```

#![expect(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::Parser as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let logging = cli
        .log_dir()
        .and_then(|dir| tabkit::logging::init(dir.as_deref()));
    if let Err(e) = &logging {
        eprintln!("Warning: logging unavailable: {e:#}");
    }

    match cli::run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if logging.is_ok() {
                tracing::error!("{e:#}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
