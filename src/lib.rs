//! dictctl - command-line control for a running dictation app.
//!
//! Two jobs share one binary:
//!
//! - Typed settings shared with the app, stored in a TOML file and
//!   validated against a fixed schema (`config list/get/set`)
//! - Directives and queries sent to the running app over a host-local
//!   publish/subscribe bus (`mode`, `status`)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dictctl::settings::{MaskPolicy, SettingsSchema, SettingsStore, TomlFileBackend};
//!
//! let store = SettingsStore::new(
//!     SettingsSchema::builtin(),
//!     Box::new(TomlFileBackend::new("/tmp/dictctl/settings.toml")),
//!     MaskPolicy::default(),
//! );
//!
//! store.set("sleep_timer_minutes", "15")?;
//! println!("{:?}", store.get("sleep_timer_minutes")?);
//! # Ok::<(), dictctl::settings::SettingsError>(())
//! ```

/// Control bus transports and the request/response client.
pub mod bus;

/// Command-line interface: dispatch, commands and formatting.
pub mod cli;

/// Runtime configuration of the CLI itself.
pub mod config;

/// Typed settings store shared with the dictation app.
pub mod settings;

/// Logging setup.
pub mod tracing_config;
