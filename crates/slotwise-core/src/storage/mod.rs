mod config;

pub use config::{CacheConfig, EngineConfig, HistoryConfig, RankingConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/slotwise[-dev]/` based on SLOTWISE_ENV.
///
/// Set SLOTWISE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SLOTWISE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("slotwise-dev")
    } else {
        base_dir.join("slotwise")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
