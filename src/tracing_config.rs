use std::{env, io};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Selects the log output format (`json` or `compact`).
pub const ENV_LOG_FORMAT: &str = "DICTCTL_LOG_FORMAT";

/// Initialize tracing for one-shot CLI invocations
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// Uses the RUST_LOG environment variable if set, otherwise only warnings
/// and errors are shown. Output is compact unless DICTCTL_LOG_FORMAT=json.
///
/// # Errors
/// Returns error if a global tracing subscriber is already installed
pub fn init_cli_mode() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let format = env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);

    match format.as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stderr),
                )
                .try_init()?;
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_level(true)
                        .with_writer(io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}
