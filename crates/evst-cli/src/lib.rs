//! Event status CLI library.
//!
//! This crate provides the CLI interface for event status checks.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
