//! Command-line front end for the tracker core.
//!
//! # Responsibility
//! - Open the configured SQLite store and drive core operations.
//! - Print machine-readable JSON for stats and dashboard output.

use anyhow::{bail, Context, Result};
use aspire_core::db::open_db;
use aspire_core::logging::init_logging_from;
use aspire_core::{export_file_name, SqliteKvStore, TrackerConfig, TrackerService};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "aspire", version, about = "Job application tracker store")]
struct Cli {
    /// SQLite file to use instead of `ASPIRE_DB_PATH`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level instead of `ASPIRE_LOG_LEVEL` (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory instead of `ASPIRE_LOG_DIR`; enables file logging.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core version and resolved store path.
    Info,
    /// Print aggregate statistics as JSON.
    Stats,
    /// Print dashboard data as JSON.
    Dashboard,
    /// Write all data to a JSON bundle.
    Export {
        /// Output file. Defaults to `aspire-data-export-<date>.json`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all data with a previously exported bundle.
    Import { path: PathBuf },
    /// Remove every application and reminder.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::from_env().with_overrides(cli.db, cli.log_level, cli.log_dir);
    init_logging_from(&config).map_err(anyhow::Error::msg)?;

    if let Command::Info = cli.command {
        println!("aspire_core version={}", aspire_core::core_version());
        println!("db_path={}", config.db_path.display());
        println!("log_level={}", config.log_level);
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let store = SqliteKvStore::try_new(&conn)?;
    let mut service = TrackerService::open(store)?;

    match cli.command {
        Command::Info => {}
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&service.stats()?)?);
        }
        Command::Dashboard => {
            println!("{}", serde_json::to_string_pretty(&service.dashboard(Utc::now())?)?);
        }
        Command::Export { out } => {
            let now = Utc::now();
            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(now)));
            let json = service.export(now)?;
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("exported to {}", path.display());
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            let summary = service.import(&text)?;
            println!(
                "imported applications={} reminders={}",
                summary.applications, summary.reminders
            );
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to clear all data without --yes");
            }
            service.clear_all()?;
            println!("all data cleared");
        }
    }

    Ok(())
}
