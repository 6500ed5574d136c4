//! Error types for the bounded file cache

use std::path::PathBuf;
use thiserror::Error;

/// Low-level failure while touching the store file
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Bad constructor or operation input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot create store directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected failure while checking or creating the store file at startup
    #[error("Cannot initialize store file {path:?}: {source}")]
    StoreInit {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    #[error("Cannot read store file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    #[error("Cannot write store file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: FileError,
    },
}

impl StoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StoreError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_invalid_argument_display() {
        let err = StoreError::invalid("namespace must not be empty");
        assert_eq!(
            format!("{}", err),
            "Invalid argument: namespace must not be empty"
        );
    }

    #[test]
    fn test_read_error_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::Read {
            path: PathBuf::from("/tmp/store/app-taxonomy.json"),
            source: FileError::from(json_err),
        };

        let msg = format!("{}", err);
        assert!(msg.contains("app-taxonomy.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_directory_create_display() {
        let err = StoreError::DirectoryCreate {
            path: PathBuf::from("/etc/passwd"),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "File exists"),
        };
        assert!(format!("{}", err).contains("/etc/passwd"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = StoreError::Write {
            path: PathBuf::from("x.json"),
            source: FileError::Io(io::Error::new(io::ErrorKind::Other, "disk full")),
        };
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Write"));
    }
}
