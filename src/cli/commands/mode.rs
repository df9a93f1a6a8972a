use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    bus::{ControlBus, ControlMessage, DictationMode, ParseModeError},
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
};

/// Command switching the running app's dictation mode.
///
/// Fire-and-forget: the directive is published and the command returns
/// without waiting. If the app is not running the message is lost, which is
/// not an error.
///
/// # Example Usage
///
/// ```bash
/// dictctl mode on
/// dictctl mode sleep
/// ```
pub struct ModeCommand {
    bus: Arc<dyn ControlBus>,
}

impl ModeCommand {
    /// Creates a new ModeCommand publishing on `bus`.
    pub fn new(bus: Arc<dyn ControlBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl Command for ModeCommand {
    /// Publishes a `setMode` message.
    ///
    /// # Errors
    ///
    /// * `CliError::Usage` - If the mode is missing or not one of on/off/sleep
    /// * `CliError::Bus` - If the bus cannot be reached
    async fn execute(&self, args: &[String]) -> CommandResult {
        let raw = args.first().ok_or_else(|| CliError::Usage {
            reason: "Missing mode argument".to_string(),
            usage: self.metadata().usage(),
        })?;

        let mode: DictationMode = raw.parse().map_err(|e: ParseModeError| CliError::Usage {
            reason: e.to_string(),
            usage: self.metadata().usage(),
        })?;

        self.bus.publish(ControlMessage::set_mode(mode)).await?;
        info!(%mode, "mode directive sent");

        Ok(format!("Requested dictation mode: {mode}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "mode".to_string(),
            category: None,
            description: "Switch the running app's dictation mode".to_string(),
            args: vec![CommandArg {
                name: "mode".to_string(),
                description: "Target mode".to_string(),
                required: true,
                value_type: ArgType::Choice(
                    DictationMode::ALL
                        .iter()
                        .map(|mode| mode.as_str().to_string())
                        .collect(),
                ),
            }],
            examples: vec![
                "dictctl mode on".to_string(),
                "dictctl mode sleep".to_string(),
            ],
        }
    }
}
