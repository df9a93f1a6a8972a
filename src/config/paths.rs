use std::{
    io::{Error, ErrorKind},
    path::PathBuf,
};

/// Name of the application directory under the XDG config home.
const APP_DIR: &str = "dictctl";

/// File name of the persistent settings store.
const SETTINGS_FILE: &str = "settings.toml";

/// Utility struct for locating configuration directories and files
///
/// Follows the XDG Base Directory specification
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory for the application, reading
    /// environment variables through `lookup`
    ///
    /// - First checks `XDG_CONFIG_HOME`
    /// - Falls back to `$HOME/.config`
    /// - Appends "dictctl" to the base config directory
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is available
    pub fn config_dir_from<F>(lookup: F) -> Result<PathBuf, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_home = lookup("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .or_else(|| lookup("HOME").map(|home| format!("{home}/.config")))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join(APP_DIR))
    }

    /// Returns the default path of the settings file shared with the app
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    pub fn settings_file_from<F>(lookup: F) -> Result<PathBuf, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::config_dir_from(lookup)?.join(SETTINGS_FILE))
    }
}
