//! tasa CLI - keeps Argentine financial index series up to date.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tasa_lib::ReconcileError;

mod commands;
mod display;
mod settings;

use settings::Settings;

/// Exit code for usage and configuration errors.
const USAGE_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "tasa")]
#[command(about = "Argentine financial index series, reconciled from their publishers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the series files (default: $TASA_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Series catalog file replacing the built-in one
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Run date (YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true)]
    today: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and reconcile one or more series
    Update {
        /// Series identifiers (e.g., cer, activa)
        ids: Vec<String>,

        /// Update every series in catalog order
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Classify without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// List configured series
    List,

    /// Show a series definition and its stored state
    Info {
        /// Series identifier
        id: String,
    },

    /// Print the latest stored entries of a series
    Show {
        /// Series identifier
        id: String,

        /// Number of entries to print
        #[arg(short, long, default_value = "10")]
        tail: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = Settings::resolve(
        cli.data_dir,
        cli.registry.as_deref(),
        cli.today.as_deref(),
        cli.timeout,
    )?;

    match command {
        Commands::Update { ids, all, dry_run } => {
            commands::update::update(&settings, &ids, all, dry_run, cli.quiet).await
        }
        Commands::List => commands::list::list_series(&settings),
        Commands::Info { id } => commands::info::show_info(&settings, &id),
        Commands::Show { id, tail } => commands::show::show_entries(&settings, &id, tail),
    }
}

/// Maps a failure to its exit code: the failing stage for reconciliation
/// errors, usage otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ReconcileError>()
        .map_or(USAGE_EXIT, ReconcileError::exit_code)
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
