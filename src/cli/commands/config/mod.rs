//! Settings management commands.
mod get;
mod list;
mod set;

use std::sync::Arc;

pub use get::GetCommand;
pub use list::ListCommand;
pub use set::SetCommand;

use crate::{cli::CommandRegistry, settings::SettingsStore};

/// Category the settings commands are registered under.
pub(crate) const CATEGORY_NAME: &str = "config";

/// Registers `config list`, `config get` and `config set`.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `settings` - Shared settings store for the commands
pub fn register_commands(registry: &mut CommandRegistry, settings: Arc<SettingsStore>) {
    registry.register_command(Box::new(ListCommand::new(settings.clone())));
    registry.register_command(Box::new(GetCommand::new(settings.clone())));
    registry.register_command(Box::new(SetCommand::new(settings)));
}
