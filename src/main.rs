//! dictctl - entry point.
//!
//! Runs exactly one command and exits with a status describing the outcome.

use std::{env, io, process::ExitCode, sync::Arc};

use dictctl::{
    bus::{ControlBus, DbusBus},
    cli::{CliError, CliService, Dispatch, EXIT_SUCCESS, formatting::format_error},
    config::CliConfig,
    settings::{SettingsSchema, SettingsStore, TomlFileBackend},
    tracing_config,
};
use tracing::{debug, warn};

/// Conventional exit status after SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = tracing_config::init_cli_mode() {
        eprintln!("{}", format_error(&format!("Cannot initialize logging: {e}")));
    }

    let args: Vec<String> = env::args().skip(1).collect();

    let code = run_until_interrupted(run(&args), tokio::signal::ctrl_c()).await;
    ExitCode::from(code)
}

/// Runs `work` unless `interrupt` resolves first. A failure to listen for
/// the interrupt leaves `work` running to completion.
async fn run_until_interrupted<W, I>(work: W, interrupt: I) -> u8
where
    W: Future<Output = u8>,
    I: Future<Output = io::Result<()>>,
{
    tokio::select! {
        code = work => code,
        Ok(()) = interrupt => {
            warn!("interrupted");
            EXIT_INTERRUPTED
        }
    }
}

/// Builds the service from the environment, runs one command and reports
/// the outcome. Returns the exit status.
async fn run(args: &[String]) -> u8 {
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => return report(&CliError::from(e)),
    };
    debug!(?config, "configuration loaded");

    let settings = SettingsStore::new(
        SettingsSchema::builtin(),
        Box::new(TomlFileBackend::new(&config.settings_file)),
        config.mask.clone(),
    );
    let bus: Arc<dyn ControlBus> = Arc::new(DbusBus::new(config.bus));
    let service = CliService::new(Arc::new(settings), bus, config.status_timeout);

    match service.dispatch(args).await {
        Ok(Dispatch::Output(output)) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            EXIT_SUCCESS
        }
        Ok(Dispatch::PassThrough) => EXIT_SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(error: &CliError) -> u8 {
    eprintln!("{}", format_error(&error.to_string()));
    error.exit_code()
}
