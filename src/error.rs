// Centralized error handling using thiserror
//
// Design Decision: One error enum for the whole crate
//
// The configuration service only ever returns the `Configuration` variant to
// callers of `get_config_section`. Every other variant belongs to the
// collaborators (storage, filesystem, settings, builder) and is logged and
// absorbed at the service boundary.

use thiserror::Error;

/// Main error type for the configuration layer
///
/// Usage:
///     fn read_section(text: &str) -> Result<MyConfig> {
///         let config = serde_json::from_str(text)?;
///         Ok(config)
///     }
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A section could not be produced at all
    ///
    /// Raised when no file exists and no default is available, or when the
    /// file is present but undecodable and no default is available.
    #[error("Can't load configuration section '{section}' nor default: {reason}")]
    Configuration { section: String, reason: String },

    /// Storage/persistence error
    ///
    /// Failures reported by a storage backend that are not plain IO errors
    /// (injected faults, backend-specific conditions).
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// A storage file name that would escape the flat storage root
    #[error("Path error: {0}")]
    PathError(String),

    /// Environment variable present but invalid
    #[error("Environment error: {0}")]
    EnvError(String),

    /// Dependency wiring failed
    #[error("Build error: {0}")]
    BuildError(String),
}

impl ConfigError {
    /// Build the error returned when neither a stored value nor a default exists
    pub fn configuration(section: &str, reason: impl Into<String>) -> Self {
        ConfigError::Configuration {
            section: section.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the section-level failure surfaced by the configuration service
    pub fn is_configuration(&self) -> bool {
        matches!(self, ConfigError::Configuration { .. })
    }
}

/// Type alias for Result with ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;
