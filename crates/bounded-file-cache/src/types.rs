//! Store options and the on-disk file shape

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;

/// Directory used when the caller does not pick one
pub const DEFAULT_STORE_DIR: &str = "/tmp/store";

/// Default expiry window: 1 hour
pub const DEFAULT_EXPIRY_MS: u64 = 3_600_000;

/// Default size ceiling: 1 MB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Reserved key holding the creation time of the store contents
pub const TIMESTAMP_KEY: &str = "_timestamp";

/// Optional knobs for opening a store. Unset fields fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub directory: Option<PathBuf>,
    pub expiry: Option<Duration>,
    pub max_file_size: Option<u64>,
}

impl StoreOptions {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn with_expiry_ms(self, expiry_ms: u64) -> Self {
        self.with_expiry(Duration::from_millis(expiry_ms))
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = Some(max_file_size);
        self
    }
}

/// Contents of a store file: the reserved timestamp plus the cached entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoreFile {
    /// Epoch milliseconds at which these contents were created fresh
    #[serde(rename = "_timestamp")]
    pub timestamp: i64,
    #[serde(flatten)]
    pub entries: Map<String, Value>,
}

impl StoreFile {
    pub fn blank(now_ms: i64) -> Self {
        Self {
            timestamp: now_ms,
            entries: Map::new(),
        }
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    pub fn is_expired(&self, now_ms: i64, expiry_ms: i64) -> bool {
        self.age_ms(now_ms) > expiry_ms
    }
}
