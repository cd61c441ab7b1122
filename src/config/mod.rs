//! Configuration file loading and context root resolution.
//!
//! The configuration file is optional. It is searched in the following order:
//!
//! 1. Path given as the `CONFIG_FILE` CLI argument (must exist)
//! 2. Default location, used only if present:
//!    - **Linux/macOS:** `~/.context-index-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.context-index-mcp\config.json`
//!
//! Without a file, built-in defaults apply.
//!
//! # Context Root
//!
//! The directory whose subdirectories are served as services is taken from,
//! in order: the `MCP_CONTEXT_PATH` environment variable, the `context_path`
//! config field, and finally [`DEFAULT_CONTEXT_PATH`].

mod settings;

pub use settings::{Config, LoggingConfig};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable that selects the context root.
pub const CONTEXT_PATH_ENV: &str = "MCP_CONTEXT_PATH";

/// Context root used when neither the environment nor the config names one.
pub const DEFAULT_CONTEXT_PATH: &str = "./context-index";

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.context-index-mcp/`
/// - **Windows:** `%USERPROFILE%\.context-index-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".context-index-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// If `path` is `None`, the default location is tried and built-in defaults
/// are returned when no file exists there.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given configuration file is missing or cannot be read
/// - The JSON is malformed
/// - Fields are unknown or invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}

/// Resolves the context root from the process environment and `config`.
#[must_use]
pub fn resolve_context_path(config: &Config) -> PathBuf {
    resolve_context_path_from(std::env::var_os(CONTEXT_PATH_ENV), config)
}

/// Resolves the context root from an explicit environment value and `config`.
///
/// An empty environment value is treated as unset.
#[must_use]
pub fn resolve_context_path_from(env_value: Option<OsString>, config: &Config) -> PathBuf {
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.context_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTEXT_PATH))
}
