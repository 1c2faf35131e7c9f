//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use evst_core::{GroupId, ValidationError};

/// Event status tracker.
///
/// Records time-bounded events per group and reports whether the latest one
/// is active, in review, or done.
#[derive(Debug, Parser)]
#[command(name = "evst", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record an event for a group.
    Add {
        /// Group the event belongs to.
        #[arg(long, value_parser = parse_group_id)]
        group: GroupId,

        /// When the event ends (ISO 8601 or relative, e.g. 'in 2 hours').
        #[arg(long)]
        end: String,

        /// Review window after the end, in hours. Defaults to config.
        #[arg(long, allow_negative_numbers = true)]
        review_hours: Option<f64>,

        /// Event ID. A random UUID is generated when omitted.
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the status of a group's latest event.
    Status {
        /// Group to check.
        #[arg(long, value_parser = parse_group_id)]
        group: GroupId,

        /// Evaluate at this instant instead of now.
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List a group's events with their individual status.
    Events {
        /// Group to list.
        #[arg(long, value_parser = parse_group_id)]
        group: GroupId,

        /// Evaluate at this instant instead of now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Classify an ad-hoc event without touching the database.
    Classify {
        /// When the event ends (ISO 8601 or relative).
        #[arg(long)]
        end: String,

        /// Review window after the end, in hours. Defaults to config.
        #[arg(long, allow_negative_numbers = true)]
        review_hours: Option<f64>,

        /// Evaluate at this instant instead of now.
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_group_id(s: &str) -> Result<GroupId, ValidationError> {
    GroupId::new(s)
}
