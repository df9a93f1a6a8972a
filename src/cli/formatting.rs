//! Formatting utilities for CLI output.
//!
//! Help and error text are styled with ANSI colors. Command output that
//! scripts are likely to consume (`config get`, `status --json`) is plain.

use crate::bus::StatusResponse;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Blue color
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats subheaders with styling
pub fn format_subheader(text: &str) -> String {
    format!(
        "{}{}{}{}",
        Colors::BOLD,
        Colors::YELLOW,
        text,
        Colors::RESET
    )
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::GREEN, text, Colors::RESET)
}

/// Formats setting keys with styling
pub fn format_key(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::BLUE, text, Colors::RESET)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Renders a status reply as `Label: value` lines.
///
/// Fields the app did not send are left out. A reply without any fields
/// still means the app is running, so it gets its own line instead of empty
/// output.
///
/// # Examples
///
/// ```
/// use dictctl::{bus::StatusResponse, cli::formatting::format_status};
///
/// let status = StatusResponse {
///     mode: Some("on".to_string()),
///     connected: Some(true),
///     ..StatusResponse::default()
/// };
/// assert_eq!(format_status(&status), "Mode: on\nConnected: yes");
/// ```
pub fn format_status(status: &StatusResponse) -> String {
    if status.is_empty() {
        return "Dictation app is running (no status details reported)".to_string();
    }

    let mut lines = Vec::new();

    if let Some(mode) = &status.mode {
        lines.push(format!("Mode: {mode}"));
    }
    if let Some(connected) = status.connected {
        lines.push(format!("Connected: {}", if connected { "yes" } else { "no" }));
    }
    if let Some(provider) = &status.provider {
        lines.push(format!("Provider: {provider}"));
    }
    if let Some(transcript) = &status.transcript {
        lines.push(format!("Transcript: {transcript}"));
    }

    lines.join("\n")
}
