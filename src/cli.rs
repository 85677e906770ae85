use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabkit::config::JoinConfig;
use tabkit::enrich::{EnrichOptions, LookupColumns, enrich_file};
use tabkit::pipeline::run_join;
use tabkit::reshape::{
    DEFAULT_CONCAT_OUTPUT, PercentageSpec, concat_files, dedup_file, percentage_table, split_file,
};

#[derive(Parser)]
#[command(
    name = "tabkit",
    version,
    about = "Config-driven CSV joining, lookup enrichment and reshaping"
)]
pub struct Cli {
    /// Also write rotating log files to this directory
    #[arg(long, global = true, env = "TABKIT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write rotating log files to the platform data directory
    #[arg(long, global = true, conflicts_with = "log_dir")]
    pub log_to_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Directory for file logging, if enabled.
    pub fn log_dir(&self) -> Result<Option<PathBuf>> {
        match (&self.log_dir, self.log_to_file) {
            (Some(dir), _) => Ok(Some(dir.clone())),
            (None, true) => tabkit::logging::default_log_dir().map(Some),
            (None, false) => Ok(None),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join datasets A, B and C as described by a YAML config
    Join {
        /// Path to the join configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Override the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill main_group / Main_class from a lookup table by code prefix
    Enrich(EnrichArgs),
    /// Percentage of weight per sub-category for each entity
    Aggregate(AggregateArgs),
    /// Remove duplicate rows, keeping the first occurrence
    Dedup {
        /// Input CSV file
        input: PathBuf,

        /// Output file. Defaults to overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Columns to compare (comma separated). Defaults to all columns.
        #[arg(short, long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },
    /// Stack two files on their common columns
    Concat {
        /// First file; its column order is kept
        a: PathBuf,

        /// Second file
        b: PathBuf,

        /// Extra columns of the second file to keep (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        extra: Vec<String>,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_CONCAT_OUTPUT)]
        output: PathBuf,
    },
    /// Write one file per distinct value of a column
    Split {
        /// Input CSV file
        input: PathBuf,

        /// Column to split on
        #[arg(short, long)]
        column: String,

        /// Directory for the per-group files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
pub struct EnrichArgs {
    /// File to enrich
    #[arg(default_value = "large_file.csv")]
    pub input: PathBuf,

    /// Lookup table file
    #[arg(default_value = "lookup_file.csv")]
    pub lookup: PathBuf,

    /// Output file. Defaults to overwriting the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Column selecting the rows to enrich
    #[arg(long, default_value = "report")]
    pub trigger_column: String,

    /// Value of the trigger column that selects a row
    #[arg(long, default_value = "mist")]
    pub trigger_value: String,

    /// Column whose leading word is the lookup code
    #[arg(long, default_value = "Name")]
    pub name_column: String,

    /// Column to back-fill with the extracted code when empty
    #[arg(long)]
    pub code_column: Option<String>,

    /// Code column of the lookup table
    #[arg(long, default_value = "codebase")]
    pub lookup_key: String,

    #[arg(long, default_value = "main_group")]
    pub group_column: String,

    #[arg(long, default_value = "Main_class")]
    pub class_column: String,
}

#[derive(Args)]
pub struct AggregateArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Output file. Prints the table when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Group by entity and category instead of entity alone
    #[arg(long)]
    pub by_category: bool,

    #[arg(long, default_value = "empName")]
    pub entity_column: String,

    #[arg(long, default_value = "Category")]
    pub category_column: String,

    #[arg(long, default_value = "Sub_Category")]
    pub sub_category_column: String,

    #[arg(long, default_value = "Hit")]
    pub weight_column: String,

    /// Sub-categories reported as columns (comma separated)
    #[arg(long, value_delimiter = ',', default_values = ["Gold", "Silver", "Bronse"])]
    pub known: Vec<String>,
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Join { config, output } => handle_join(&config, output.as_deref()),
        Commands::Enrich(args) => handle_enrich(args),
        Commands::Aggregate(args) => handle_aggregate(args),
        Commands::Dedup {
            input,
            output,
            columns,
        } => {
            let report = dedup_file(&input, output.as_deref(), columns.as_deref())
                .with_context(|| format!("Failed to deduplicate {}", input.display()))?;
            println!("{}", report.summary());
            Ok(())
        }
        Commands::Concat {
            a,
            b,
            extra,
            output,
        } => {
            let rows = concat_files(&a, &b, &output, &extra).context("Failed to concatenate files")?;
            println!("Merged {rows} rows into {}", output.display());
            Ok(())
        }
        Commands::Split {
            input,
            column,
            out_dir,
        } => {
            let paths = split_file(&input, &column, &out_dir)
                .with_context(|| format!("Failed to split {}", input.display()))?;
            for path in &paths {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn handle_join(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let config = JoinConfig::from_file(config_path)?;
    tracing::info!(
        "Joining {} + {} ({}) + {} ({})",
        config.files.a.path.display(),
        config.files.b.path.display(),
        config.join_type,
        config.files.c.path.display(),
        config.join_type_c
    );
    let report = run_join(&config, output).context("Join failed")?;
    println!("{}", report.summary());
    Ok(())
}

fn handle_enrich(args: EnrichArgs) -> Result<()> {
    let options = EnrichOptions {
        trigger_column: args.trigger_column,
        trigger_value: args.trigger_value,
        source_column: args.name_column,
        code_column: args.code_column,
    };
    let columns = LookupColumns {
        key: args.lookup_key,
        group: args.group_column,
        class: args.class_column,
    };

    let report = enrich_file(
        &args.input,
        &args.lookup,
        args.output.as_deref(),
        &options,
        columns,
    )
    .with_context(|| format!("Failed to enrich {}", args.input.display()))?;

    let target = args.output.as_deref().unwrap_or(&args.input);
    println!(
        "Updated {} of {} triggered rows ({} total) in {}",
        report.matched,
        report.triggered,
        report.rows,
        target.display()
    );
    Ok(())
}

fn handle_aggregate(args: AggregateArgs) -> Result<()> {
    let spec = PercentageSpec {
        entity_column: args.entity_column,
        category_column: args.category_column,
        sub_category_column: args.sub_category_column,
        weight_column: args.weight_column,
        known: args.known,
        group_by_category: args.by_category,
    };

    let df = tabkit::dataset::load_dataset(&args.input)?;
    let mut table = percentage_table(&df, &spec).context("Failed to compute percentages")?;

    match args.output {
        Some(path) => {
            tabkit::dataset::save_dataset(&mut table, &path)?;
            println!("Wrote {} rows to {}", table.height(), path.display());
        }
        None => println!("{table}"),
    }
    Ok(())
}
