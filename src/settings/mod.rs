//! Typed settings shared with the dictation app.
//!
//! [`SettingsSchema`] declares the recognized keys and their types,
//! [`SettingsStore`] validates and coerces values against it, and a
//! [`SettingsBackend`] persists the flat key-value namespace.

mod backend;
mod error;
mod mask;
mod schema;
mod store;
mod value;

pub use backend::{MemoryBackend, SettingsBackend, TomlFileBackend};
pub use error::SettingsError;
pub use mask::MaskPolicy;
pub use schema::{SettingDescriptor, SettingsSchema, ValueType};
pub use store::{ListedSetting, NOT_SET, SettingsStore, parse_flag};
pub use value::StoredValue;
