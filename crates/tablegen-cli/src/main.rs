mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tablegen_core::Error as CoreError;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "tablegen", version, about = "CRUD source generator driven by database schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Introspect a database and generate source artifacts.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Database connection string (flag form).
    #[arg(long, value_name = "CONNECTION_STRING", conflicts_with = "conn_pos")]
    conn: Option<String>,
    /// Database connection string (positional form).
    #[arg(value_name = "CONNECTION_STRING", required_unless_present = "conn")]
    conn_pos: Option<String>,
    /// Database engine family (mysql, postgres, sqlite, mssql).
    #[arg(long, default_value = "postgres")]
    engine: String,
    /// Database name reported to catalog queries.
    #[arg(long, default_value = "")]
    database: String,
    /// Table to generate for; repeatable. Empty means every table.
    #[arg(long = "table", value_name = "TABLE")]
    tables: Vec<String>,
    /// Output directory root.
    #[arg(long, default_value = "generated")]
    out: PathBuf,
    /// Package name stamped into generated sources.
    #[arg(long, default_value = "model")]
    package: String,
    /// Directory of *.tmpl files shadowing the embedded templates.
    #[arg(long, value_name = "DIR")]
    templates: Option<PathBuf>,
    /// JSON payload overriding type-map associations.
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,
    /// TOML generation config; flags still take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Replace existing output files.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
    /// Run gofmt over rendered sources.
    #[arg(long, default_value_t = false)]
    format: bool,
    /// Use the boxed-null wrapper types for nullable columns.
    #[arg(long, default_value_t = false)]
    alternate_null: bool,
    /// Disable json tags on generated record fields.
    #[arg(long, default_value_t = false)]
    no_json_tags: bool,
    /// Per-column diagnostics.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let Command::Generate(args) = cli.command;

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run::run(args).await {
        Ok(summary) if summary.failed_tables.is_empty() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(
                failed = summary.failed_tables.len(),
                tables = ?summary.failed_tables,
                "run finished with per-table failures"
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(%err, "run aborted");
            ExitCode::FAILURE
        }
    }
}
