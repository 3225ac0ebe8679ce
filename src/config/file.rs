//! TOML settings file loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::SettingsOverrides;

/// Failure while reading a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or contains unknown options.
    #[error("invalid settings file {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// What: Load explicit settings overrides from a TOML file.
///
/// Inputs:
/// - `path`: Settings file (e.g. `lingocache.toml`)
///
/// Output:
/// - `SettingsOverrides` with the fields present in the file
///
/// # Errors
/// - Returns `ConfigError::Read` when the file cannot be read
/// - Returns `ConfigError::Parse` when the TOML is invalid or names an unknown option
///
/// Details:
/// - An empty file yields empty overrides.
/// - Accepts both the long field names and the short aliases (`path`, `fallback_langs`,
///   `default_lang`, `cache_ttl`, `logging`, `colored`).
pub fn load_overrides(path: &Path) -> Result<SettingsOverrides, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_overrides(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// What: Parse settings overrides from TOML text.
fn parse_overrides(contents: &str) -> Result<SettingsOverrides, toml::de::Error> {
    if contents.trim().is_empty() {
        return Ok(SettingsOverrides::default());
    }
    toml::from_str(contents)
}
