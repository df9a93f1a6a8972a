use std::fmt;

/// Declared type of a setting's stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Free-form text, stored verbatim.
    String,

    /// A boolean flag.
    Bool,

    /// A decimal number.
    Number,
}

impl ValueType {
    /// Lowercase name used in help output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema entry describing one recognized setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDescriptor {
    /// Stable key under which the value is persisted.
    pub key: &'static str,

    /// Human-readable description shown in help and listings.
    pub description: &'static str,

    /// Type the stored value must always be interpretable as.
    pub value_type: ValueType,
}

impl SettingDescriptor {
    /// Creates a descriptor.
    pub const fn new(key: &'static str, value_type: ValueType, description: &'static str) -> Self {
        Self {
            key,
            description,
            value_type,
        }
    }
}

const BUILTIN_SETTINGS: &[SettingDescriptor] = &[
    SettingDescriptor::new(
        "dictation_provider",
        ValueType::String,
        "Dictation provider (apple, deepgram, openai)",
    ),
    SettingDescriptor::new("deepgram_api_key", ValueType::String, "Deepgram API key"),
    SettingDescriptor::new("openai_api_key", ValueType::String, "OpenAI API key"),
    SettingDescriptor::new(
        "launch_mode",
        ValueType::String,
        "Mode to enter on launch (on, off, sleep)",
    ),
    SettingDescriptor::new(
        "sleep_timer_minutes",
        ValueType::Number,
        "Minutes of silence before sleeping (0 disables)",
    ),
    SettingDescriptor::new(
        "live_dictation_enabled",
        ValueType::Bool,
        "Stream partial transcripts while speaking",
    ),
    SettingDescriptor::new(
        "dictation_language",
        ValueType::String,
        "Recognition language code (e.g. en-US)",
    ),
    SettingDescriptor::new("play_sounds", ValueType::Bool, "Play start/stop sounds"),
];

/// Ordered registry of recognized settings.
///
/// Order is display order for `config list` and help output. New settings
/// are appended; the backing store is schemaless so no migration is needed.
#[derive(Debug, Clone)]
pub struct SettingsSchema {
    descriptors: Vec<SettingDescriptor>,
}

impl SettingsSchema {
    /// Creates a schema from an explicit descriptor list.
    pub fn new(descriptors: Vec<SettingDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The settings understood by the dictation app.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SETTINGS.to_vec())
    }

    /// All descriptors in display order.
    pub fn descriptors(&self) -> &[SettingDescriptor] {
        &self.descriptors
    }

    /// Looks up a descriptor by key, returning `None` for unknown keys.
    pub fn lookup(&self, key: &str) -> Option<&SettingDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.key == key)
    }
}

impl Default for SettingsSchema {
    fn default() -> Self {
        Self::builtin()
    }
}
