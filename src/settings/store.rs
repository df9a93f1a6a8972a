use tracing::{info, instrument, warn};

use super::{
    MaskPolicy, SettingDescriptor, SettingsBackend, SettingsError, SettingsSchema, StoredValue,
    ValueType,
};

/// Placeholder shown for settings with no stored value.
pub const NOT_SET: &str = "(not set)";

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];

/// One row of `config list` output.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedSetting<'a> {
    /// Schema entry for the setting.
    pub descriptor: &'a SettingDescriptor,

    /// Raw stored value, if any.
    pub value: Option<StoredValue>,

    /// Value as it should be displayed, masked for secrets.
    pub display: String,
}

/// Typed access to persisted settings.
///
/// Constructed once per process and shared by the commands that need it.
/// Validation and coercion happen here, before anything reaches the
/// backend, so stored values always match their declared type.
pub struct SettingsStore {
    schema: SettingsSchema,
    backend: Box<dyn SettingsBackend>,
    mask: MaskPolicy,
}

impl SettingsStore {
    /// Creates a store over `backend` validating against `schema`.
    pub fn new(schema: SettingsSchema, backend: Box<dyn SettingsBackend>, mask: MaskPolicy) -> Self {
        Self {
            schema,
            backend,
            mask,
        }
    }

    /// The schema the store validates against.
    pub fn schema(&self) -> &SettingsSchema {
        &self.schema
    }

    /// Every recognized setting with its current value, in schema order.
    ///
    /// # Errors
    /// Returns `SettingsError` if the backend cannot be read.
    pub fn list(&self) -> Result<Vec<ListedSetting<'_>>, SettingsError> {
        self.schema
            .descriptors()
            .iter()
            .map(|descriptor| {
                let value = self.backend.read(descriptor.key)?;
                let display = match &value {
                    Some(value) => self.render(descriptor.key, value),
                    None => NOT_SET.to_string(),
                };

                Ok(ListedSetting {
                    descriptor,
                    value,
                    display,
                })
            })
            .collect()
    }

    /// Reads the raw value stored under `key`. Secrets are not masked.
    ///
    /// # Errors
    /// Returns `SettingsError` if the backend cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<StoredValue>, SettingsError> {
        self.backend.read(key)
    }

    /// Coerces `raw` to the declared type of `key` and persists it.
    ///
    /// Keys missing from the schema are stored verbatim as text. Returns the
    /// value that was written.
    ///
    /// # Errors
    /// * `SettingsError::Validation` - `raw` is not a number for a numeric setting
    /// * any backend error if the write fails; the store is unchanged either way
    #[instrument(skip(self, raw))]
    pub fn set(&self, key: &str, raw: &str) -> Result<StoredValue, SettingsError> {
        let value = self.coerce(key, raw)?;
        self.backend.write(key, value.clone())?;

        info!(key, "setting updated");
        Ok(value)
    }

    /// Renders a value for display under `key`, masking secrets.
    ///
    /// The app writes the same file, so a value may be stored with a
    /// different type than the schema declares. It is shown as the declared
    /// type where it can be read as one: booleans as `true`/`false`, numbers
    /// in decimal form. Keys outside the schema are shown as stored.
    pub fn render(&self, key: &str, value: &StoredValue) -> String {
        let Some(descriptor) = self.schema.lookup(key) else {
            return self.render_text(key, value);
        };

        match (descriptor.value_type, value) {
            (ValueType::Bool, StoredValue::Flag(flag)) => flag.to_string(),
            (ValueType::Bool, StoredValue::Text(text)) => parse_flag(text.trim()).to_string(),
            (ValueType::Bool, StoredValue::Number(number)) => (*number != 0.0).to_string(),
            (ValueType::Number, StoredValue::Text(text)) => match parse_number(text) {
                Some(number) => StoredValue::Number(number).to_string(),
                None => text.clone(),
            },
            (ValueType::Number, StoredValue::Flag(flag)) => u8::from(*flag).to_string(),
            (ValueType::Number, StoredValue::Number(_)) => value.to_string(),
            (ValueType::String, _) => self.render_text(key, value),
        }
    }

    fn render_text(&self, key: &str, value: &StoredValue) -> String {
        match value {
            StoredValue::Text(text) => self.mask.render(key, text),
            other => self.mask.render(key, &other.to_string()),
        }
    }

    fn coerce(&self, key: &str, raw: &str) -> Result<StoredValue, SettingsError> {
        let Some(descriptor) = self.schema.lookup(key) else {
            warn!(key, "storing unrecognized setting as text");
            return Ok(StoredValue::Text(raw.to_string()));
        };

        match descriptor.value_type {
            ValueType::String => Ok(StoredValue::Text(raw.to_string())),
            ValueType::Bool => Ok(StoredValue::Flag(parse_flag(raw))),
            ValueType::Number => parse_number(raw)
                .map(StoredValue::Number)
                .ok_or_else(|| SettingsError::Validation {
                    key: key.to_string(),
                    value: raw.to_string(),
                    expected: ValueType::Number.as_str(),
                }),
        }
    }
}

/// Interprets a raw flag: `true`, `1`, `yes` and `on` (any case) are true,
/// everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    TRUTHY.iter().any(|truthy| raw.eq_ignore_ascii_case(truthy))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
