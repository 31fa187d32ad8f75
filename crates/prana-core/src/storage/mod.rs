mod config;
mod profile;

pub use config::{Config, SessionConfig, SoundConfig, UiConfig};
pub use profile::{JsonFileStore, MemoryStore, Profile, ProfileStore};

use std::path::PathBuf;

pub(crate) fn base_dir() -> PathBuf {
    let base = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PRANA_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base.join("prana-dev")
    } else {
        base.join("prana")
    }
}

/// Returns `~/.config/prana[-dev]/` based on PRANA_ENV.
///
/// Set PRANA_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = base_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
