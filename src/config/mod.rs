//! Runtime configuration of the CLI itself.
//!
//! Everything is read from environment variables with sensible defaults;
//! the settings shared with the dictation app live in
//! [`settings`](crate::settings), not here.

mod error;
mod paths;

use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub use error::ConfigError;
pub use paths::ConfigPaths;

use crate::{
    bus::{BusKind, DEFAULT_STATUS_TIMEOUT},
    settings::MaskPolicy,
};

/// Selects the D-Bus message bus (`session` or `system`).
pub const ENV_BUS: &str = "DICTCTL_BUS";
/// Status query timeout in milliseconds.
pub const ENV_STATUS_TIMEOUT_MS: &str = "DICTCTL_STATUS_TIMEOUT_MS";
/// Overrides the settings file location.
pub const ENV_SETTINGS_FILE: &str = "DICTCTL_SETTINGS_FILE";
/// Secret values longer than this many characters are masked.
pub const ENV_MASK_THRESHOLD: &str = "DICTCTL_MASK_THRESHOLD";
/// Number of characters left visible in a masked secret.
pub const ENV_MASK_PREFIX: &str = "DICTCTL_MASK_PREFIX";

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Message bus carrying control messages.
    pub bus: BusKind,

    /// How long `status` waits for a reply.
    pub status_timeout: Duration,

    /// Location of the persistent settings file.
    pub settings_file: PathBuf,

    /// Masking applied to secrets in `config list`.
    pub mask: MaskPolicy,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable holds an unusable value or the
    /// settings location cannot be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable holds an unusable value or the
    /// settings location cannot be determined.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bus = match lookup(ENV_BUS) {
            Some(raw) => BusKind::from_str(&raw).map_err(|reason| ConfigError::InvalidValue {
                variable: ENV_BUS,
                value: raw.clone(),
                reason,
            })?,
            None => BusKind::default(),
        };

        let status_timeout = match parse_count(&lookup, ENV_STATUS_TIMEOUT_MS)? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    variable: ENV_STATUS_TIMEOUT_MS,
                    value: "0".to_string(),
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
            Some(millis) => Duration::from_millis(millis as u64),
            None => DEFAULT_STATUS_TIMEOUT,
        };

        let settings_file = match lookup(ENV_SETTINGS_FILE).filter(|path| !path.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => ConfigPaths::settings_file_from(&lookup).map_err(|e| {
                ConfigError::SettingsPath {
                    details: e.to_string(),
                }
            })?,
        };

        let defaults = MaskPolicy::default();
        let mask = MaskPolicy {
            threshold: parse_count(&lookup, ENV_MASK_THRESHOLD)?.unwrap_or(defaults.threshold),
            visible_prefix: parse_count(&lookup, ENV_MASK_PREFIX)?
                .unwrap_or(defaults.visible_prefix),
            ..defaults
        };

        if mask.visible_prefix > mask.threshold {
            return Err(ConfigError::InvalidValue {
                variable: ENV_MASK_PREFIX,
                value: mask.visible_prefix.to_string(),
                reason: format!("must not exceed the mask threshold ({})", mask.threshold),
            });
        }

        Ok(Self {
            bus,
            status_timeout,
            settings_file,
            mask,
        })
    }
}

fn parse_count<F>(lookup: &F, variable: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(variable) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            variable,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_with(&[("HOME", "/home/user")]).unwrap();

        assert_eq!(config.bus, BusKind::Session);
        assert_eq!(config.status_timeout, DEFAULT_STATUS_TIMEOUT);
        assert_eq!(
            config.settings_file,
            PathBuf::from("/home/user/.config/dictctl/settings.toml")
        );
        assert_eq!(config.mask, MaskPolicy::default());
    }

    #[test]
    fn overrides_are_honoured() {
        let config = config_with(&[
            (ENV_BUS, "system"),
            (ENV_STATUS_TIMEOUT_MS, "500"),
            (ENV_SETTINGS_FILE, "/tmp/settings.toml"),
            (ENV_MASK_THRESHOLD, "12"),
            (ENV_MASK_PREFIX, "2"),
        ])
        .unwrap();

        assert_eq!(config.bus, BusKind::System);
        assert_eq!(config.status_timeout, Duration::from_millis(500));
        assert_eq!(config.settings_file, PathBuf::from("/tmp/settings.toml"));
        assert_eq!(config.mask.threshold, 12);
        assert_eq!(config.mask.visible_prefix, 2);
        assert_eq!(config.mask.secret_suffix, "_api_key");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = config_with(&[("HOME", "/h"), (ENV_STATUS_TIMEOUT_MS, "0")]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                variable: ENV_STATUS_TIMEOUT_MS,
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let result = config_with(&[("HOME", "/h"), (ENV_STATUS_TIMEOUT_MS, "soon")]);

        assert!(result.is_err());
    }

    #[test]
    fn unknown_bus_is_rejected() {
        let result = config_with(&[("HOME", "/h"), (ENV_BUS, "tram")]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                variable: ENV_BUS,
                ..
            })
        ));
    }

    #[test]
    fn prefix_longer_than_threshold_is_rejected() {
        let result = config_with(&[
            ("HOME", "/h"),
            (ENV_MASK_THRESHOLD, "4"),
            (ENV_MASK_PREFIX, "6"),
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn missing_home_without_override_fails() {
        let result = config_with(&[]);

        assert!(matches!(result, Err(ConfigError::SettingsPath { .. })));
    }
}
