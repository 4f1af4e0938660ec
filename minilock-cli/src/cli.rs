use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use minilock::database::{Database, DatabaseConfig};
use tracing_subscriber::EnvFilter;

use crate::script_executor::ScriptExecutor;
use crate::shell::ShellArgs;

const LOG_ENV: &str = "MINILOCK_LOG";

#[derive(Debug, Parser)]
#[command(name = "minilock", version, about = "A multi-granularity 2V2PL lock scheduler")]
pub struct Cli {
    /// Log filter for diagnostics written to stderr, e.g. "debug" or "minilock_scheduler=info".
    ///
    /// Overrides the MINILOCK_LOG environment variable.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    Shell(ShellArgs),
    /// Run every line of a file as a schedule.
    Execute(ScriptExecutor),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.log_level.as_deref())?;
        match self.command {
            CliCommand::Shell(shell) => shell.run(),
            CliCommand::Execute(executor) => executor.run(),
        }
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).into_diagnostic()?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| miette::miette!("failed to initialize logging: {e}"))
}

/// Layout of the in-memory database a command runs against.
#[derive(Debug, Args, Clone)]
pub struct DatabaseArgs {
    /// Number of pages in every demo table.
    #[arg(long, default_value_t = 2)]
    pages: usize,

    /// Number of rows on every page of the demo tables.
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// If set, the demo tables will not be created.
    #[arg(long)]
    empty: bool,
}

impl DatabaseArgs {
    pub fn open(&self) -> Result<Database> {
        let config = DatabaseConfig {
            pages_per_table: self.pages,
            rows_per_page: self.rows,
            demo_tables: !self.empty,
        };
        Ok(Database::open_in_memory(&config)?)
    }
}
