//! Bounded file cache
//!
//! A small persistent key-value cache kept in one JSON file per namespace and store name.
//! The whole store expires together once it is older than the expiry window, and writes
//! report whether the file is still within its size ceiling. Meant for caching
//! non-user-specific lookups between restarts, not as a database.

mod config;
mod error;
mod store;
mod types;

pub use config::{parse_positive, StoreConfig, DIR_VAR, EXPIRY_MS_VAR, MAX_FILE_SIZE_VAR};
pub use error::{FileError, Result, StoreError};
pub use store::{store_file_path, Store};
pub use types::{
    StoreOptions, DEFAULT_EXPIRY_MS, DEFAULT_MAX_FILE_SIZE, DEFAULT_STORE_DIR, TIMESTAMP_KEY,
};
