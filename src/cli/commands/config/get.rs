use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    settings::{NOT_SET, SettingsStore},
};

/// Command for reading a single setting.
///
/// Prints the full stored value. Secrets are not masked here, so
/// `config get` can be used to copy a key back out of the store.
///
/// # Example Usage
///
/// ```bash
/// dictctl config get dictation_provider
/// dictctl config get sleep_timer_minutes
/// ```
pub struct GetCommand {
    settings: Arc<SettingsStore>,
}

impl GetCommand {
    /// Creates a new GetCommand over the shared settings store.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Command for GetCommand {
    /// Prints `<key>: <value>`, or `(not set)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// * `CliError::Usage` - If no key argument is provided
    /// * `CliError::Settings` - If the store cannot be read
    async fn execute(&self, args: &[String]) -> CommandResult {
        let key = args.first().ok_or_else(|| CliError::Usage {
            reason: "Missing <key> argument".to_string(),
            usage: self.metadata().usage(),
        })?;

        let value = self.settings.get(key)?;

        let display = value
            .map(|value| value.to_string())
            .unwrap_or_else(|| NOT_SET.to_string());

        Ok(format!("{key}: {display}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            description: "Show the stored value of a setting".to_string(),
            args: vec![CommandArg {
                name: "key".to_string(),
                description: "Setting key (see the settings list in help)".to_string(),
                required: true,
                value_type: ArgType::Key,
            }],
            examples: vec![
                "dictctl config get dictation_provider".to_string(),
                "dictctl config get sleep_timer_minutes".to_string(),
            ],
        }
    }
}
