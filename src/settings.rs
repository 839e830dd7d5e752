// Runtime settings for the configuration layer
//
// Loaded from environment variables (with an optional .env file via dotenvy):
// - MAKO_CONFIG_DIR (optional): directory holding section files
// - MAKO_OVERWRITE_DEFAULTS (optional): whether the startup defaults hook
//   replaces files that already exist

use crate::error::{ConfigError, Result};
use std::path::PathBuf;

pub const CONFIG_DIR_VAR: &str = "MAKO_CONFIG_DIR";
pub const OVERWRITE_DEFAULTS_VAR: &str = "MAKO_OVERWRITE_DEFAULTS";

/// Settings consumed by `AppBuilder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Directory holding section files
    pub config_dir: PathBuf,

    /// Passed as `overwrite` to the startup defaults hook
    pub overwrite_defaults: bool,
}

impl ServiceSettings {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            overwrite_defaults: false,
        }
    }

    /// Load settings from environment and .env file
    ///
    /// # Errors
    /// - MAKO_OVERWRITE_DEFAULTS set to something other than a boolean
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_dir = std::env::var(CONFIG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_dir());

        let overwrite_defaults = match std::env::var(OVERWRITE_DEFAULTS_VAR) {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::EnvError(format!(
                    "{} must be true/false/1/0, got '{}'",
                    OVERWRITE_DEFAULTS_VAR, value
                ))
            })?,
            Err(_) => false,
        };

        Ok(Self {
            config_dir,
            overwrite_defaults,
        })
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::new(default_config_dir())
    }
}

/// Platform config directory plus `mako`, or `./config` if there is none
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("mako"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
