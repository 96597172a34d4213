//! Configuration error types for the config module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the configuration source.
///
/// The set is closed: every failure of [`ConfigLoader::load`] is one of these
/// three kinds, and none of them is retryable. The caller must fix the file
/// or the environment and restart.
///
/// [`ConfigLoader::load`]: super::ConfigLoader::load
#[derive(Debug, Error)]
pub enum LoadError {
    /// Config file not found at the resolved path
    #[error("File {} does not exist!", .0.display())]
    SourceNotFound(PathBuf),

    /// The file could not be parsed, or lacks `default` / `default.config`
    #[error("Error while loading configfile \"{}\": {message}", .path.display())]
    SourceInvalid { path: PathBuf, message: String },

    /// A `${env:NAME}` reference points at an unset variable
    #[error("Environment variable '{name}' referenced in configuration is not set")]
    MissingEnvironmentVariable { name: String },
}

impl LoadError {
    /// Create a source-invalid error
    pub fn invalid<P: Into<PathBuf>, M: Into<String>>(path: P, message: M) -> Self {
        Self::SourceInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing environment variable error
    pub fn missing_env<N: Into<String>>(name: N) -> Self {
        Self::MissingEnvironmentVariable { name: name.into() }
    }
}

/// Errors raised when reading typed settings out of a loaded tree.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// A section exists but has the wrong shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, LoadError>;
