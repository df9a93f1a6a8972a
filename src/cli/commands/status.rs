use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    bus::{ControlBus, RequestResponseClient},
    cli::{
        CliError, Command, CommandResult,
        formatting::format_status,
        types::{ArgType, CommandArg, CommandMetadata},
    },
};

const JSON_FLAG: &str = "--json";

/// Command querying the running app for its status.
///
/// Waits up to the configured timeout for a reply. No reply means the app
/// is not running or not responding, reported as
/// [`CliError::NoResponse`].
pub struct StatusCommand {
    client: RequestResponseClient,
    timeout: Duration,
}

impl StatusCommand {
    /// Creates a new StatusCommand querying over `bus`.
    pub fn new(bus: Arc<dyn ControlBus>, timeout: Duration) -> Self {
        Self {
            client: RequestResponseClient::new(bus),
            timeout,
        }
    }
}

#[async_trait]
impl Command for StatusCommand {
    /// Prints the reply as labelled lines, or as JSON with `--json`.
    ///
    /// # Errors
    ///
    /// * `CliError::Usage` - If an argument other than `--json` is given
    /// * `CliError::NoResponse` - If no reply arrives before the timeout
    /// * `CliError::Bus` - If the bus cannot be reached
    async fn execute(&self, args: &[String]) -> CommandResult {
        let json = match args.first().map(String::as_str) {
            None => false,
            Some(JSON_FLAG) => true,
            Some(other) => {
                return Err(CliError::Usage {
                    reason: format!("Unexpected argument '{other}'"),
                    usage: self.metadata().usage(),
                });
            }
        };

        let status = self.client.request_status(self.timeout).await?;

        if json {
            return serde_json::to_string_pretty(&status).map_err(|e| CliError::Output {
                details: e.to_string(),
            });
        }

        Ok(format_status(&status))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "status".to_string(),
            category: None,
            description: "Show the running app's mode and connection state".to_string(),
            args: vec![CommandArg {
                name: JSON_FLAG.to_string(),
                description: "Print the reply as JSON".to_string(),
                required: false,
                value_type: ArgType::Flag,
            }],
            examples: vec![
                "dictctl status".to_string(),
                "dictctl status --json".to_string(),
            ],
        }
    }
}
