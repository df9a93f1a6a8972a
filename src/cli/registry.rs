use std::collections::HashMap;

use super::{
    CliError, Command, CommandResult,
    types::{BIN_NAME, CommandMetadata},
};

/// Registry for CLI commands, either top-level or grouped by category.
///
/// ```text
/// registry
/// ├── config
/// │   ├── get
/// │   ├── list
/// │   └── set
/// ├── mode
/// └── status
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    /// category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    /// top-level command name -> command implementation
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under the category named in its metadata, or at
    /// the top level if it has none. A command with the same name replaces
    /// the previous one.
    pub fn register_command(&mut self, command: Box<dyn Command>) {
        let metadata = command.metadata();

        match metadata.category {
            Some(category) => {
                self.categories
                    .entry(category)
                    .or_default()
                    .insert(metadata.name, command);
            }
            None => {
                self.commands.insert(metadata.name, command);
            }
        }
    }

    /// Resolves `args` to a command, checks the argument count and runs it.
    ///
    /// # Errors
    ///
    /// * `CliError::UnknownCommand` - no command matches
    /// * `CliError::Usage` - a category without a subcommand, or the wrong
    ///   number of arguments
    ///
    /// Other errors come from the command itself.
    pub async fn execute(&self, args: &[String]) -> CommandResult {
        let (command, command_args) = self.resolve(args)?;

        Self::validate_args(&command.metadata(), command_args)?;

        command.execute(command_args).await
    }

    /// Metadata of every registered command, sorted by category then name.
    pub fn list_commands(&self) -> Vec<CommandMetadata> {
        let mut commands: Vec<CommandMetadata> = self
            .commands
            .values()
            .chain(self.categories.values().flat_map(|category| category.values()))
            .map(|command| command.metadata())
            .collect();

        commands.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
        });

        commands
    }

    /// Metadata of the command named by `args`, ignoring any trailing
    /// arguments.
    ///
    /// # Errors
    ///
    /// Same resolution errors as [`CommandRegistry::execute`].
    pub fn find(&self, args: &[String]) -> Result<CommandMetadata, CliError> {
        self.resolve(args).map(|(command, _)| command.metadata())
    }

    fn resolve<'a>(&self, args: &'a [String]) -> Result<(&dyn Command, &'a [String]), CliError> {
        let Some(name) = args.first() else {
            return Err(CliError::Usage {
                reason: "Missing command".to_string(),
                usage: format!("{BIN_NAME} <command> [args]"),
            });
        };

        if let Some(command) = self.commands.get(name) {
            return Ok((command.as_ref(), &args[1..]));
        }

        let category = self
            .categories
            .get(name)
            .ok_or_else(|| CliError::UnknownCommand {
                command: name.clone(),
            })?;

        let Some(subcommand) = args.get(1) else {
            let mut names: Vec<&str> = category.keys().map(String::as_str).collect();
            names.sort_unstable();

            return Err(CliError::Usage {
                reason: format!("Missing {name} subcommand"),
                usage: format!("{BIN_NAME} {name} <{}>", names.join("|")),
            });
        };

        let command = category
            .get(subcommand)
            .ok_or_else(|| CliError::UnknownCommand {
                command: format!("{name} {subcommand}"),
            })?;

        Ok((command.as_ref(), &args[2..]))
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::Usage {
                reason: format!(
                    "Expected at least {} argument(s), got {}",
                    required_count,
                    args.len(),
                ),
                usage: metadata.usage(),
            });
        }

        if args.len() > total_count {
            return Err(CliError::Usage {
                reason: format!(
                    "Expected at most {} argument(s), got {}",
                    total_count,
                    args.len(),
                ),
                usage: metadata.usage(),
            });
        }

        Ok(())
    }
}
