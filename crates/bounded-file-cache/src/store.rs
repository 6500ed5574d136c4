//! Single-file JSON store with whole-store expiry and a size ceiling
//!
//! Every operation is a blocking read/modify/write of the whole file. Nothing is cached
//! in memory between calls and there is no locking, so two handles writing the same file
//! race and the last full rewrite wins.

use crate::error::{FileError, Result, StoreError};
use crate::types::{
    StoreFile, StoreOptions, DEFAULT_EXPIRY_MS, DEFAULT_MAX_FILE_SIZE, DEFAULT_STORE_DIR,
    TIMESTAMP_KEY,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to one namespaced store file
#[derive(Debug, Clone)]
pub struct Store {
    namespace: String,
    store_name: String,
    file_path: PathBuf,
    expiry: Duration,
    max_file_size: u64,
}

impl Store {
    /// Open a store in [`DEFAULT_STORE_DIR`] with the default expiry and size ceiling
    pub fn new(namespace: &str, store_name: &str) -> Result<Self> {
        Self::with_options(namespace, store_name, StoreOptions::default())
    }

    /// Open a store, creating its directory and file as needed.
    ///
    /// An existing file at or above the size ceiling is replaced by a blank one.
    pub fn with_options(namespace: &str, store_name: &str, options: StoreOptions) -> Result<Self> {
        validate_name("namespace", namespace)?;
        validate_name("store name", store_name)?;

        let expiry = options
            .expiry
            .unwrap_or(Duration::from_millis(DEFAULT_EXPIRY_MS));
        let expiry_ms = i64::try_from(expiry.as_millis())
            .map_err(|_| StoreError::invalid("expiry window is too large"))?;
        if expiry_ms <= 0 {
            return Err(StoreError::invalid(
                "expiry window must be at least 1 millisecond",
            ));
        }

        let max_file_size = options.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE);
        if max_file_size == 0 {
            return Err(StoreError::invalid("max file size must be positive"));
        }

        let directory = options
            .directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

        fs::create_dir_all(&directory).map_err(|source| StoreError::DirectoryCreate {
            path: directory.clone(),
            source,
        })?;

        let store = Self {
            namespace: namespace.to_string(),
            store_name: store_name.to_string(),
            file_path: store_file_path(&directory, namespace, store_name),
            expiry,
            max_file_size,
        };
        store.init_file()?;

        Ok(store)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Path of the backing JSON file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Look up a key. Expired contents read as empty but are left on disk.
    pub fn get_item(&self, key: &str) -> Result<Option<Value>> {
        let mut contents = self
            .working_contents(now_ms())
            .map_err(|source| self.read_error(source))?;

        let value = contents.entries.remove(key);
        if value.is_some() {
            debug!(path = ?self.file_path, key = %key, "Store hit");
        } else {
            debug!(path = ?self.file_path, key = %key, "Store miss");
        }
        Ok(value)
    }

    /// Look up a key and deserialize it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| self.read_error(e.into())),
            None => Ok(None),
        }
    }

    /// Store `value` under `key` and rewrite the whole file.
    ///
    /// Returns whether the file is still within the size ceiling afterwards. The write is
    /// kept on disk even when this returns `false`; an oversized file is only reset the next
    /// time a handle is opened on it, or by [`Store::clear_cache`].
    pub fn set_item(&self, key: &str, value: Value) -> Result<bool> {
        if key == TIMESTAMP_KEY {
            return Err(StoreError::invalid(format!(
                "{TIMESTAMP_KEY} is reserved and cannot be set"
            )));
        }

        let mut contents = self
            .working_contents(now_ms())
            .map_err(|source| self.write_error(source))?;
        contents.entries.insert(key.to_string(), value);

        self.write_file(&contents)
            .map_err(|source| self.write_error(source))?;

        let size = fs::metadata(&self.file_path)
            .map_err(|e| self.write_error(e.into()))?
            .len();

        let within_limit = size <= self.max_file_size;
        if !within_limit {
            warn!(
                path = ?self.file_path,
                key = %key,
                size,
                max_file_size = self.max_file_size,
                "Store file exceeds size ceiling after write"
            );
        }
        Ok(within_limit)
    }

    /// Serialize `value` and store it under `key`
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<bool> {
        let value = serde_json::to_value(value).map_err(|e| self.write_error(e.into()))?;
        self.set_item(key, value)
    }

    /// Replace the backing file with a blank one, whatever its size or age
    pub fn clear_cache(&self) -> Result<()> {
        self.write_blank()
            .map_err(|source| self.write_error(source))?;
        info!(path = ?self.file_path, "Store cleared");
        Ok(())
    }

    /// Create the file if missing, or reset it if it is already at the size ceiling
    fn init_file(&self) -> Result<()> {
        let init_error = |source: FileError| StoreError::StoreInit {
            path: self.file_path.clone(),
            source,
        };

        match fs::metadata(&self.file_path) {
            Ok(meta) if meta.len() >= self.max_file_size => {
                info!(
                    path = ?self.file_path,
                    size = meta.len(),
                    max_file_size = self.max_file_size,
                    "Store file over size ceiling, resetting"
                );
                self.write_blank().map_err(init_error)
            }
            Ok(meta) => {
                debug!(path = ?self.file_path, size = meta.len(), "Reusing store file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = ?self.file_path, "Creating store file");
                self.write_blank().map_err(init_error)
            }
            Err(e) => Err(init_error(e.into())),
        }
    }

    /// Load the file, swapping in blank contents when the store has expired
    fn working_contents(&self, now: i64) -> std::result::Result<StoreFile, FileError> {
        let bytes = fs::read(&self.file_path)?;
        let contents: StoreFile = serde_json::from_slice(&bytes)?;

        // Range checked in with_options
        let expiry_ms = i64::try_from(self.expiry.as_millis()).unwrap_or(i64::MAX);
        if contents.is_expired(now, expiry_ms) {
            debug!(
                path = ?self.file_path,
                age_ms = contents.age_ms(now),
                expiry_ms,
                "Store contents expired"
            );
            return Ok(StoreFile::blank(now));
        }
        Ok(contents)
    }

    fn write_blank(&self) -> std::result::Result<(), FileError> {
        self.write_file(&StoreFile::blank(now_ms()))
    }

    fn write_file(&self, contents: &StoreFile) -> std::result::Result<(), FileError> {
        let bytes = serde_json::to_vec(contents)?;
        fs::write(&self.file_path, bytes)?;
        Ok(())
    }

    fn read_error(&self, source: FileError) -> StoreError {
        StoreError::Read {
            path: self.file_path.clone(),
            source,
        }
    }

    fn write_error(&self, source: FileError) -> StoreError {
        StoreError::Write {
            path: self.file_path.clone(),
            source,
        }
    }
}

/// `directory/namespace-store_name.json`
pub fn store_file_path(directory: &Path, namespace: &str, store_name: &str) -> PathBuf {
    directory.join(format!("{namespace}-{store_name}.json"))
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::invalid(format!("{what} must be a non-empty string")));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(StoreError::invalid(format!(
            "{what} must not contain path separators: {name:?}"
        )));
    }
    Ok(())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
