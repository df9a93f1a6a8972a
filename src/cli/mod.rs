//! Command-line front end.
//!
//! Arguments are dispatched through a registry of commands, either top-level
//! (`mode`, `status`) or grouped under a category (`config get`). Help text
//! is generated from command metadata and the settings schema.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use commands::{
    ModeCommand, StatusCommand,
    config::{GetCommand, ListCommand, SetCommand},
};
pub use registry::CommandRegistry;
pub use service::{CliService, Dispatch};
pub use types::{
    ArgType, BIN_NAME, CliError, Command, CommandArg, CommandMetadata, CommandResult,
    EXIT_FAILURE, EXIT_NO_RESPONSE, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
