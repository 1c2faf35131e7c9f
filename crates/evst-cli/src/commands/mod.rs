//! CLI subcommand implementations.

pub mod add;
pub mod classify;
pub mod events;
pub mod status;
pub mod util;
