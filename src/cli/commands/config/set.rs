use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    settings::SettingsStore,
};

/// Command for writing a setting.
///
/// The raw argument is coerced to the setting's declared type before it is
/// persisted; a value that does not fit (e.g. `abc` for a number) is
/// rejected and the previous value is kept.
///
/// # Example Usage
///
/// ```bash
/// dictctl config set live_dictation_enabled on
/// dictctl config set sleep_timer_minutes 15
/// dictctl config set dictation_language en-US
/// ```
pub struct SetCommand {
    settings: Arc<SettingsStore>,
}

impl SetCommand {
    /// Creates a new SetCommand over the shared settings store.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Command for SetCommand {
    /// Stores the value and echoes what was written, masking secrets.
    ///
    /// # Errors
    ///
    /// * `CliError::Usage` - If the key or value argument is missing
    /// * `CliError::Settings` - If validation fails or the store cannot be written
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(key), Some(raw)) = (args.first(), args.get(1)) else {
            return Err(CliError::Usage {
                reason: "Expected <key> and <value> arguments".to_string(),
                usage: self.metadata().usage(),
            });
        };

        let value = self.settings.set(key, raw)?;

        Ok(format!("Set {key} = {}", self.settings.render(key, &value)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            description: "Store a setting, coerced to its declared type".to_string(),
            args: vec![
                CommandArg {
                    name: "key".to_string(),
                    description: "Setting key".to_string(),
                    required: true,
                    value_type: ArgType::Key,
                },
                CommandArg {
                    name: "value".to_string(),
                    description: "New value; booleans accept true/1/yes/on".to_string(),
                    required: true,
                    value_type: ArgType::Value,
                },
            ],
            examples: vec![
                "dictctl config set live_dictation_enabled on".to_string(),
                "dictctl config set sleep_timer_minutes 15".to_string(),
            ],
        }
    }
}
