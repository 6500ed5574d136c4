//! Store configuration read from the environment

use crate::error::{Result, StoreError};
use crate::types::StoreOptions;
use std::env;
use std::path::PathBuf;

pub const DIR_VAR: &str = "FILE_CACHE_DIR";
pub const EXPIRY_MS_VAR: &str = "FILE_CACHE_EXPIRY_MS";
pub const MAX_FILE_SIZE_VAR: &str = "FILE_CACHE_MAX_FILE_SIZE";

/// Store settings supplied as text. Unset or blank values keep the store defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub directory: Option<PathBuf>,
    pub expiry_ms: Option<u64>,
    pub max_file_size: Option<u64>,
}

impl StoreConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let directory = value(DIR_VAR).map(PathBuf::from);

        let expiry_ms = value(EXPIRY_MS_VAR)
            .map(|v| parse_positive(EXPIRY_MS_VAR, &v))
            .transpose()?;

        let max_file_size = value(MAX_FILE_SIZE_VAR)
            .map(|v| parse_positive(MAX_FILE_SIZE_VAR, &v))
            .transpose()?;

        Ok(Self {
            directory,
            expiry_ms,
            max_file_size,
        })
    }

    pub fn into_options(self) -> StoreOptions {
        StoreOptions {
            directory: self.directory,
            expiry: self.expiry_ms.map(std::time::Duration::from_millis),
            max_file_size: self.max_file_size,
        }
    }
}

/// Parse a positive integer, rejecting anything non-numeric or zero
pub fn parse_positive(name: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(StoreError::invalid(format!("{name} must be positive"))),
        Ok(n) => Ok(n),
        Err(_) => Err(StoreError::invalid(format!(
            "{name} must be a number, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.into_options(), StoreOptions::default());
    }

    #[test]
    fn test_full_environment() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DIR_VAR, "/var/cache/taxonomy"),
            (EXPIRY_MS_VAR, "60000"),
            (MAX_FILE_SIZE_VAR, " 2048 "),
        ]))
        .unwrap();

        assert_eq!(config.directory, Some(PathBuf::from("/var/cache/taxonomy")));
        assert_eq!(config.expiry_ms, Some(60_000));
        assert_eq!(config.max_file_size, Some(2048));

        let options = config.into_options();
        assert_eq!(options.expiry, Some(Duration::from_millis(60_000)));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[(DIR_VAR, ""), (EXPIRY_MS_VAR, "  ")])).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_non_numeric_expiry_is_rejected() {
        let result = StoreConfig::from_lookup(lookup_from(&[(EXPIRY_MS_VAR, "an hour")]));
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_non_numeric_max_file_size_is_rejected() {
        let result = StoreConfig::from_lookup(lookup_from(&[(MAX_FILE_SIZE_VAR, "45kb")]));
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("n", "123").unwrap(), 123);
        assert!(parse_positive("n", "0").is_err());
        assert!(parse_positive("n", "-5").is_err());
        assert!(parse_positive("n", "1.5").is_err());
    }
}
