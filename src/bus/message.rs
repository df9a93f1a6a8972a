use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Name under which a control message is published.
///
/// The topic names are a compatibility contract with the dictation app and
/// must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    /// Topic of the fire-and-forget mode directive.
    pub const SET_MODE: &'static str = "setMode";
    /// Topic of the status query.
    pub const GET_STATUS: &'static str = "getStatus";
    /// Topic the app replies to status queries on.
    pub const STATUS_RESPONSE: &'static str = "statusResponse";

    /// Creates a topic from an arbitrary name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `setMode`
    pub fn set_mode() -> Self {
        Self::new(Self::SET_MODE)
    }

    /// `getStatus`
    pub fn get_status() -> Self {
        Self::new(Self::GET_STATUS)
    }

    /// `statusResponse`
    pub fn status_response() -> Self {
        Self::new(Self::STATUS_RESPONSE)
    }

    /// The topic name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A primitive carried in a message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// String value.
    Text(String),

    /// Boolean value.
    Flag(bool),
}

impl PayloadValue {
    /// Returns the string if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(s) => Some(s),
            PayloadValue::Flag(_) => None,
        }
    }

    /// Returns the boolean if this is a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            PayloadValue::Flag(b) => Some(*b),
            PayloadValue::Text(_) => None,
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Flag(value)
    }
}

/// Key/value payload of a control message.
pub type Payload = BTreeMap<String, PayloadValue>;

/// An ephemeral message exchanged over the control bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    /// Topic the message is published under.
    pub topic: Topic,

    /// Payload fields.
    pub payload: Payload,
}

impl ControlMessage {
    /// Creates a message with an empty payload.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            payload: Payload::new(),
        }
    }

    /// Adds a payload field.
    pub fn with(mut self, key: &str, value: impl Into<PayloadValue>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// `setMode` directive carrying the requested mode.
    pub fn set_mode(mode: DictationMode) -> Self {
        Self::new(Topic::set_mode()).with("mode", mode.as_str())
    }

    /// `getStatus` query.
    pub fn status_request() -> Self {
        Self::new(Topic::get_status())
    }

    /// Looks up a payload field.
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.payload.get(key)
    }
}

/// Dictation mode the app can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationMode {
    /// Listening and transcribing.
    On,

    /// Not listening.
    Off,

    /// Listening for a wake phrase only.
    Sleep,
}

impl DictationMode {
    /// All modes in the order they are offered to users.
    pub const ALL: [DictationMode; 3] = [DictationMode::On, DictationMode::Off, DictationMode::Sleep];

    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            DictationMode::On => "on",
            DictationMode::Off => "off",
            DictationMode::Sleep => "sleep",
        }
    }
}

impl fmt::Display for DictationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known dictation mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid mode '{0}', expected one of: on, off, sleep")]
pub struct ParseModeError(pub String);

impl FromStr for DictationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(DictationMode::On),
            "off" => Ok(DictationMode::Off),
            "sleep" => Ok(DictationMode::Sleep),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// The app's reply to a status query. Every field is optional; the app omits
/// whatever it has no value for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    /// Current dictation mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Whether the app is connected to its recognition provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,

    /// Active recognition provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Most recent transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl StatusResponse {
    /// Whether the reply carried no fields at all.
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.connected.is_none()
            && self.provider.is_none()
            && self.transcript.is_none()
    }

    /// Builds the `statusResponse` message the app would publish.
    pub fn to_message(&self) -> ControlMessage {
        let mut message = ControlMessage::new(Topic::status_response());

        if let Some(mode) = &self.mode {
            message = message.with("mode", mode.as_str());
        }
        if let Some(connected) = self.connected {
            message = message.with("connected", connected);
        }
        if let Some(provider) = &self.provider {
            message = message.with("provider", provider.as_str());
        }
        if let Some(transcript) = &self.transcript {
            message = message.with("transcript", transcript.as_str());
        }

        message
    }
}

impl From<&ControlMessage> for StatusResponse {
    /// Extracts the known fields; fields with an unexpected type are dropped.
    fn from(message: &ControlMessage) -> Self {
        let text = |key: &str| {
            message
                .get(key)
                .and_then(PayloadValue::as_text)
                .map(str::to_string)
        };

        Self {
            mode: text("mode"),
            connected: message.get("connected").and_then(PayloadValue::as_flag),
            provider: text("provider"),
            transcript: text("transcript"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_mode_message_uses_wire_names() {
        let message = ControlMessage::set_mode(DictationMode::Sleep);

        assert_eq!(message.topic.as_str(), "setMode");
        assert_eq!(message.get("mode"), Some(&PayloadValue::from("sleep")));
    }

    #[test]
    fn status_request_has_empty_payload() {
        let message = ControlMessage::status_request();

        assert_eq!(message.topic.as_str(), "getStatus");
        assert!(message.payload.is_empty());
    }

    #[test]
    fn mode_parsing_accepts_any_case() {
        assert_eq!("on".parse::<DictationMode>(), Ok(DictationMode::On));
        assert_eq!("OFF".parse::<DictationMode>(), Ok(DictationMode::Off));
        assert_eq!("Sleep".parse::<DictationMode>(), Ok(DictationMode::Sleep));
        assert_eq!(
            "standby".parse::<DictationMode>(),
            Err(ParseModeError("standby".to_string()))
        );
    }

    #[test]
    fn status_response_ignores_mistyped_fields() {
        let message = ControlMessage::new(Topic::status_response())
            .with("mode", "on")
            .with("connected", "yes")
            .with("provider", true);

        let status = StatusResponse::from(&message);

        assert_eq!(status.mode.as_deref(), Some("on"));
        assert_eq!(status.connected, None);
        assert_eq!(status.provider, None);
        assert_eq!(status.transcript, None);
    }

    #[test]
    fn status_response_message_round_trip_keeps_partial_fields() {
        let status = StatusResponse {
            mode: Some("sleep".to_string()),
            connected: Some(false),
            ..StatusResponse::default()
        };

        let message = status.to_message();

        assert_eq!(message.topic.as_str(), "statusResponse");
        assert_eq!(message.payload.len(), 2);
        assert_eq!(StatusResponse::from(&message), status);
    }

    #[test]
    fn empty_status_serializes_to_empty_object() {
        let json = serde_json::to_string(&StatusResponse::default()).unwrap_or_default();

        assert_eq!(json, "{}");
    }
}
