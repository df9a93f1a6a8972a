use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::RwLock,
};

use tempfile::NamedTempFile;
use toml::Table;
use tracing::{debug, instrument, warn};

use super::{SettingsError, StoredValue};

/// Flat key-value storage underneath [`SettingsStore`](super::SettingsStore).
///
/// Backends are schemaless: validation happens in the store before `write`
/// is called. `write` must be durable when it returns, because the CLI
/// process exits right after a `config set`.
pub trait SettingsBackend: Send + Sync {
    /// Reads the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns `SettingsError` if the underlying storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<StoredValue>, SettingsError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `SettingsError` if the value cannot be persisted; the previous
    /// value is left in place in that case.
    fn write(&self, key: &str, value: StoredValue) -> Result<(), SettingsError>;
}

/// Volatile backend used by tests and by embedders with their own storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<BTreeMap<String, StoredValue>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<StoredValue>, SettingsError> {
        let values = self
            .values
            .read()
            .map_err(|_| SettingsError::Lock { lock_type: "read" })?;

        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: StoredValue) -> Result<(), SettingsError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| SettingsError::Lock { lock_type: "write" })?;

        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Backend persisting settings as a flat TOML table on disk.
///
/// The file is shared with the dictation app. Every read goes to disk so
/// changes made by the app are always visible. Writes hold an exclusive
/// advisory lock on a sibling `.lock` file for the whole read-modify-write,
/// stage the new table in a private temporary file in the same directory and
/// atomically rename it into place. Readers therefore always see a complete
/// file, and concurrent writers to different keys keep each other's updates.
/// Writers to the same key race with last-write-wins semantics.
#[derive(Debug, Clone)]
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    /// Creates a backend over the file at `path`. The file is created on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the advisory lock file guarding writes.
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("toml.lock")
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn load_table(&self) -> Result<Table, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file not found, treating as empty");
                return Ok(Table::new());
            }
            Err(e) => return Err(SettingsError::io(&self.path, e)),
        };

        toml::from_str::<Table>(&content).map_err(|e| SettingsError::Parse {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }

    fn persist(&self, table: &Table) -> Result<(), SettingsError> {
        let directory = self.directory();

        let content = toml::to_string(table).map_err(|e| SettingsError::Serialization {
            details: e.to_string(),
        })?;

        let mut staging =
            NamedTempFile::new_in(directory).map_err(|e| SettingsError::io(directory, e))?;
        staging
            .write_all(content.as_bytes())
            .map_err(|e| SettingsError::io(staging.path(), e))?;
        staging
            .as_file()
            .sync_all()
            .map_err(|e| SettingsError::io(staging.path(), e))?;

        staging
            .persist(&self.path)
            .map_err(|e| SettingsError::io(&self.path, e.error))?;

        Ok(())
    }
}

impl SettingsBackend for TomlFileBackend {
    fn read(&self, key: &str) -> Result<Option<StoredValue>, SettingsError> {
        let table = self.load_table()?;

        let Some(raw) = table.get(key) else {
            return Ok(None);
        };

        let value = StoredValue::from_toml(raw);
        if value.is_none() {
            warn!(key, kind = raw.type_str(), "ignoring setting with unsupported TOML type");
        }

        Ok(value)
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn write(&self, key: &str, value: StoredValue) -> Result<(), SettingsError> {
        let directory = self.directory();
        fs::create_dir_all(directory).map_err(|e| SettingsError::io(directory, e))?;

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| SettingsError::io(&lock_path, e))?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.write().map_err(|e| SettingsError::io(&lock_path, e))?;
        debug!("settings write lock acquired");

        let mut table = self.load_table()?;
        table.insert(key.to_string(), value.to_toml());

        self.persist(&table)
    }
}
