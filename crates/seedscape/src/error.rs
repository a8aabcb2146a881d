//! # Error Types

use std::path::PathBuf;

use seedscape_procedural::ProceduralError;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`crate::config::AppConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The file parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Noise parameters were rejected by the generator.
    #[error(transparent)]
    Terrain(#[from] ProceduralError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors from parsing an explorer move script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A character that is not one of `w a s d e` or whitespace.
    #[error("unknown move {ch:?} at position {index} (expected w, a, s, d or e)")]
    UnknownMove {
        /// Offending character.
        ch: char,
        /// Character index in the script.
        index: usize,
    },
}
