use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{Command, CommandResult, types::CommandMetadata},
    settings::SettingsStore,
};

/// Command listing every recognized setting with its current value.
///
/// Settings appear in schema order. API keys longer than the mask threshold
/// are shown as a short prefix plus their length.
pub struct ListCommand {
    settings: Arc<SettingsStore>,
}

impl ListCommand {
    /// Creates a new ListCommand over the shared settings store.
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let rows = self.settings.list()?;

        let width = rows
            .iter()
            .map(|row| row.descriptor.key.len())
            .max()
            .unwrap_or_default();

        let lines: Vec<String> = rows
            .iter()
            .map(|row| format!("{:<width$}  {}", row.descriptor.key, row.display))
            .collect();

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            description: "List all settings and their values".to_string(),
            args: vec![],
            examples: vec!["dictctl config list".to_string()],
        }
    }
}
