use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors produced by the settings store and its backends.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The raw value could not be coerced to the setting's declared type.
    ///
    /// Nothing is written when this is returned.
    #[error("invalid value '{value}' for '{key}': expected a {expected}")]
    Validation {
        /// Setting key being written
        key: String,
        /// Raw value supplied by the caller
        value: String,
        /// Name of the declared type
        expected: &'static str,
    },

    /// Reading or writing the settings file failed.
    #[error("I/O error on '{path}': {details}")]
    Io {
        /// Path where the I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// The settings file exists but is not a valid flat TOML table.
    #[error("failed to parse settings file '{path}': {details}")]
    Parse {
        /// Path of the settings file
        path: PathBuf,
        /// Parser error details
        details: String,
    },

    /// The in-memory settings could not be serialized.
    #[error("failed to serialize settings: {details}")]
    Serialization {
        /// Serializer error details
        details: String,
    },

    /// A backend lock was poisoned by a panicking writer.
    #[error("failed to acquire {lock_type} lock on settings")]
    Lock {
        /// Type of lock that failed (read, write)
        lock_type: &'static str,
    },
}

impl SettingsError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: &Path, error: io::Error) -> Self {
        SettingsError::Io {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Whether this error is a user-facing validation failure rather than
    /// an environment problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, SettingsError::Validation { .. })
    }
}
