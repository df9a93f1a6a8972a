use std::{sync::Arc, time::Duration};

use tracing::debug;

use super::{
    CliError, CommandRegistry, commands,
    formatting::{format_command, format_description, format_header, format_key, format_subheader},
    types::{BIN_NAME, CommandMetadata},
};
use crate::{
    bus::ControlBus,
    settings::{SettingsSchema, SettingsStore},
};

/// Outcome of dispatching one argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A command ran; print its output.
    Output(String),

    /// The arguments are not for this CLI (e.g. a platform-reserved flag).
    /// Nothing should be printed and the process exits successfully.
    PassThrough,
}

/// High-level service for dispatching CLI arguments to commands.
///
/// Built once per process with the shared settings store and control bus,
/// then asked to [`dispatch`](Self::dispatch) a single argument list.
pub struct CliService {
    registry: CommandRegistry,
    schema: SettingsSchema,
}

impl CliService {
    /// Creates a new CLI service with all built-in commands registered.
    ///
    /// # Arguments
    /// * `settings` - Settings store used by the `config` commands
    /// * `bus` - Control bus used by `mode` and `status`
    /// * `status_timeout` - How long `status` waits for a reply
    pub fn new(
        settings: Arc<SettingsStore>,
        bus: Arc<dyn ControlBus>,
        status_timeout: Duration,
    ) -> Self {
        let schema = settings.schema().clone();

        let mut registry = CommandRegistry::new();
        commands::config::register_commands(&mut registry, settings);
        commands::register_control_commands(&mut registry, bus, status_timeout);

        Self { registry, schema }
    }

    /// Dispatches the arguments that follow the program name.
    ///
    /// An empty list and `help`/`-h`/`--help` produce help text, or details
    /// of one command when followed by its name (`help config set`);
    /// `-v`/`--version` produces the version. Any other dash-prefixed token
    /// is not for this CLI and yields [`Dispatch::PassThrough`].
    ///
    /// # Errors
    /// Returns `CliError` for unknown commands, usage errors and failures of
    /// the command itself. Use [`CliError::exit_code`] for the exit status.
    pub async fn dispatch(&self, args: &[String]) -> Result<Dispatch, CliError> {
        let Some(first) = args.first() else {
            return Ok(Dispatch::Output(self.help_text()));
        };

        match first.as_str() {
            "help" | "-h" | "--help" if args.len() > 1 => {
                let metadata = self.registry.find(&args[1..])?;
                Ok(Dispatch::Output(Self::command_help(&metadata)))
            }
            "help" | "-h" | "--help" => Ok(Dispatch::Output(self.help_text())),
            "-v" | "--version" => Ok(Dispatch::Output(Self::version_text())),
            token if token.starts_with('-') => {
                debug!(token, "argument not handled here, deferring");
                Ok(Dispatch::PassThrough)
            }
            _ => self.registry.execute(args).await.map(Dispatch::Output),
        }
    }

    /// `dictctl <version>`.
    pub fn version_text() -> String {
        format!("{BIN_NAME} {}", env!("CARGO_PKG_VERSION"))
    }

    /// Detailed help for one command: usage, arguments and examples.
    pub fn command_help(metadata: &CommandMetadata) -> String {
        let mut lines = vec![
            format_command(&metadata.usage()),
            format!("  {}", format_description(&metadata.description)),
        ];

        if !metadata.args.is_empty() {
            let tokens: Vec<String> = metadata.args.iter().map(|arg| arg.usage_token()).collect();
            let width = tokens.iter().map(String::len).max().unwrap_or_default();

            lines.push(String::new());
            lines.push(format_subheader("Arguments:"));
            for (token, arg) in tokens.iter().zip(&metadata.args) {
                lines.push(format!(
                    "  {token:<width$}  {}",
                    format_description(&arg.description)
                ));
            }
        }

        if !metadata.examples.is_empty() {
            lines.push(String::new());
            lines.push(format_subheader("Examples:"));
            lines.extend(metadata.examples.iter().map(|example| format!("  {example}")));
        }

        lines.join("\n")
    }

    /// Help listing every command and every recognized setting.
    pub fn help_text(&self) -> String {
        let commands = self.registry.list_commands();

        let mut entries: Vec<(String, String)> = commands
            .iter()
            .map(|metadata| (metadata.invocation(), metadata.description.clone()))
            .collect();
        entries.push((
            "help [command]".to_string(),
            "Show this help, or details of one command (also -h, --help)".to_string(),
        ));
        entries.push(("-v | --version".to_string(), "Show the version".to_string()));

        let command_width = entries.iter().map(|(usage, _)| usage.len()).max().unwrap_or_default();

        let mut lines = vec![
            format_header(&format!("{BIN_NAME} - control the dictation app")),
            String::new(),
            format_subheader("Usage:"),
            format!("  {BIN_NAME} <command> [args]"),
            String::new(),
            format_subheader("Commands:"),
        ];

        for (usage, description) in &entries {
            lines.push(format!(
                "  {}  {}",
                format_command(&format!("{usage:<command_width$}")),
                format_description(description)
            ));
        }

        let settings = self.schema.descriptors();
        let key_width = settings
            .iter()
            .map(|descriptor| descriptor.key.len())
            .max()
            .unwrap_or_default();

        lines.push(String::new());
        lines.push(format_subheader("Settings:"));

        for descriptor in settings {
            lines.push(format!(
                "  {}  {:<6}  {}",
                format_key(&format!("{:<key_width$}", descriptor.key)),
                descriptor.value_type.as_str(),
                format_description(descriptor.description)
            ));
        }

        lines.join("\n")
    }
}
