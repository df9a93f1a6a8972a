use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    bus::{BusError, RequestError},
    config::ConfigError,
    settings::SettingsError,
};

/// Name of the installed binary, used in usage strings.
pub const BIN_NAME: &str = "dictctl";

/// Process exit status for success and for deferred (pass-through) arguments.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for usage, unknown-command and validation errors.
pub const EXIT_USAGE_ERROR: u8 = 1;
/// Exit status when the dictation app did not answer a status query.
pub const EXIT_NO_RESPONSE: u8 = 2;
/// Exit status for environment failures such as I/O or bus errors.
pub const EXIT_FAILURE: u8 = 3;

/// Errors that can occur during CLI command execution.
///
/// Every failure is reported to the user as a single line and mapped to an
/// exit status by [`CliError::exit_code`].
#[derive(Error, Debug)]
pub enum CliError {
    /// The first argument is not a command this CLI knows.
    #[error("Unknown command: {command} (run 'dictctl help' to see available commands)")]
    UnknownCommand {
        /// The unrecognized command text
        command: String,
    },

    /// A command was invoked with the wrong number or shape of arguments.
    #[error("{reason}. Usage: {usage}")]
    Usage {
        /// What was wrong with the invocation
        reason: String,
        /// Correct invocation form
        usage: String,
    },

    /// A settings operation failed, including value validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The status query timed out.
    #[error(
        "Dictation app is not running or not responding (no reply within {}ms)",
        timeout.as_millis()
    )]
    NoResponse {
        /// How long the query waited
        timeout: Duration,
    },

    /// The control bus could not be used.
    #[error("Control bus error: {0}")]
    Bus(#[from] BusError),

    /// A request failed for a reason other than a timeout.
    #[error("Request failed: {0}")]
    Request(RequestError),

    /// Command output could not be rendered.
    #[error("Cannot render output: {details}")]
    Output {
        /// Underlying error details
        details: String,
    },

    /// The CLI's own configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Exit status the process should terminate with.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::UnknownCommand { .. } | CliError::Usage { .. } | CliError::Config(_) => {
                EXIT_USAGE_ERROR
            }
            CliError::Settings(e) if e.is_validation() => EXIT_USAGE_ERROR,
            CliError::NoResponse { .. } => EXIT_NO_RESPONSE,
            CliError::Settings(_)
            | CliError::Bus(_)
            | CliError::Request(_)
            | CliError::Output { .. } => EXIT_FAILURE,
        }
    }
}

impl From<RequestError> for CliError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::NoResponse { timeout } => CliError::NoResponse { timeout },
            RequestError::Bus(e) => CliError::Bus(e),
            other => CliError::Request(other),
        }
    }
}

/// Type alias for command execution results.
///
/// Commands return their user-facing output on success.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "key", "value", "--json").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected shape of this argument.
    pub value_type: ArgType,
}

impl CommandArg {
    /// How the argument appears in a usage line: `<key>`, `<on|off|sleep>`,
    /// `[--json]`.
    pub fn usage_token(&self) -> String {
        let inner = match &self.value_type {
            ArgType::Choice(options) => format!("<{}>", options.join("|")),
            ArgType::Flag => self.name.clone(),
            ArgType::Key | ArgType::Value => format!("<{}>", self.name),
        };

        if self.required {
            inner
        } else {
            format!("[{inner}]")
        }
    }
}

/// Shape of a command argument, used for usage text.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// A setting key.
    Key,

    /// A free-form value.
    Value,

    /// One of a fixed set of words.
    Choice(Vec<String>),

    /// A literal flag such as `--json`.
    Flag,
}

/// Complete metadata for a CLI command.
///
/// Used for help generation, argument-count validation and usage errors.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "mode").
    pub name: String,

    /// Category the command is nested under (e.g., "config"), or `None`
    /// for top-level commands.
    pub category: Option<String>,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,
}

impl CommandMetadata {
    /// Invocation form without the binary name, e.g. `config set <key> <value>`.
    pub fn invocation(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(category) = &self.category {
            parts.push(category.clone());
        }
        parts.push(self.name.clone());
        parts.extend(self.args.iter().map(CommandArg::usage_token));

        parts.join(" ")
    }

    /// Full usage line, e.g. `dictctl config set <key> <value>`.
    pub fn usage(&self) -> String {
        format!("{BIN_NAME} {}", self.invocation())
    }
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against the
    /// command's metadata; commands validate argument values themselves.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values and for failures of the
    /// settings store or control bus.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
