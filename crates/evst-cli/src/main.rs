use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use evst_cli::commands::{add, classify, events, status, util};
use evst_cli::{Cli, Commands, Config};
use evst_core::{Clock, EventDescriptor, FixedClock, SystemClock};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config: &Config) -> Result<evst_db::Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    evst_db::Database::open(&config.database_path).context("failed to open database")
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Resolves `--at` to a clock; relative values are taken from the wall clock.
fn resolve_clock(at: Option<&str>) -> Result<Box<dyn Clock>> {
    match at {
        Some(at) => {
            let at = util::parse_datetime(at, Utc::now()).context("invalid --at")?;
            Ok(Box::new(FixedClock::new(at)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn parse_end(end: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    util::parse_datetime(end, now).context("invalid --end")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout();

    match cli.command {
        Some(Commands::Add {
            group,
            end,
            review_hours,
            id,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let db = open_database(&config)?;
            let end_date = parse_end(&end, Utc::now())?;
            let review_hours = review_hours.unwrap_or(config.default_review_hours);
            add::run(&mut stdout, &db, &group, end_date, review_hours, id)?;
        }
        Some(Commands::Status { group, at, json }) => {
            let config = load_config(cli.config.as_deref())?;
            let db = open_database(&config)?;
            let clock = resolve_clock(at.as_deref())?;
            status::run(&mut stdout, &db, clock, &group, json).await?;
        }
        Some(Commands::Events { group, at }) => {
            let config = load_config(cli.config.as_deref())?;
            let db = open_database(&config)?;
            let now = resolve_clock(at.as_deref())?.now();
            events::run(&mut stdout, &db, &group, now)?;
        }
        Some(Commands::Classify {
            end,
            review_hours,
            at,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let now = resolve_clock(at.as_deref())?.now();
            let end_date = parse_end(&end, now)?;
            let review_hours = review_hours.unwrap_or(config.default_review_hours);
            classify::run(
                &mut stdout,
                EventDescriptor::new(end_date, review_hours),
                now,
                json,
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
