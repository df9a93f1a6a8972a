use thiserror::Error;

/// Errors raised while assembling the CLI configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Name of the environment variable
        variable: &'static str,
        /// Value found in the environment
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The default settings location could not be determined.
    #[error("cannot locate settings file: {details}")]
    SettingsPath {
        /// Underlying error details
        details: String,
    },
}
