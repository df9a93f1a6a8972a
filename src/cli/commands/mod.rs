//! Built-in commands.
//!
//! `config` commands work on the settings store only; `mode` and `status`
//! talk to the running app over the control bus.

pub mod config;
mod mode;
mod status;

use std::{sync::Arc, time::Duration};

pub use mode::ModeCommand;
pub use status::StatusCommand;

use super::CommandRegistry;
use crate::bus::ControlBus;

/// Registers the top-level commands that control the running app.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `bus` - Control bus shared by the commands
/// * `status_timeout` - How long `status` waits for a reply
pub fn register_control_commands(
    registry: &mut CommandRegistry,
    bus: Arc<dyn ControlBus>,
    status_timeout: Duration,
) {
    registry.register_command(Box::new(ModeCommand::new(bus.clone())));
    registry.register_command(Box::new(StatusCommand::new(bus, status_timeout)));
}
