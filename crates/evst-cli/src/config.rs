//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Review window used when `add` or `classify` is given no `--review-hours`.
pub const DEFAULT_REVIEW_HOURS: f64 = 24.0;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Default review window for new events, in hours.
    pub default_review_hours: f64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("evst.db"),
            default_review_hours: DEFAULT_REVIEW_HOURS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/evst/config.toml`, the given
    /// file, then `EVST_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("EVST_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for evst.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("evst"))
}

/// Returns the platform-specific data directory for evst.
///
/// On Linux: `~/.local/share/evst`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("evst"))
}
