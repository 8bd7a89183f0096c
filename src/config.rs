//! Partitioner configuration.
//!
//! [`PartitionerConfig`] is a plain struct with public fields and a
//! [`Default`] carrying the standard key names, prefix, buffer size, separator
//! and header skip. Override what you need with struct-update syntax, or load
//! it from JSON:
//!
//! ```
//! use flatfile_partitioner::PartitionerConfig;
//!
//! let config = PartitionerConfig::from_json_str(
//!     r#"{ "linesToSkip": 1, "keys": { "startAt": "offset" } }"#,
//! )?;
//! assert_eq!(config.lines_to_skip, 1);
//! assert_eq!(config.keys.start_at, "offset");
//! assert_eq!(config.keys.items_count, "itemsCount");
//! assert_eq!(config.buffer_size, 4096);
//! # Ok::<(), flatfile_partitioner::PartitionError>(())
//! ```

use crate::descriptor::DescriptorKeys;
use crate::error::{PartitionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default prefix of generated partition names.
pub const DEFAULT_PARTITION_PREFIX: &str = "partition-";
/// Default read buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
/// Default byte that ends a line.
pub const DEFAULT_LINE_SEPARATOR: u8 = b'\n';
/// Default number of header lines to skip.
pub const DEFAULT_LINES_TO_SKIP: u64 = 0;

/// Configuration for [`FlatFilePartitioner`](crate::FlatFilePartitioner).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartitionerConfig {
    /// Key names written into each descriptor.
    pub keys: DescriptorKeys,
    /// Prefix of every partition name.
    pub partition_prefix: String,
    /// Size of the read buffer used while scanning.
    pub buffer_size: usize,
    /// The single byte that ends a line. CRLF input works with `\n` because
    /// the `\r` simply stays part of the line.
    pub line_separator: u8,
    /// Leading lines excluded from every partition.
    pub lines_to_skip: u64,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            keys: DescriptorKeys::default(),
            partition_prefix: DEFAULT_PARTITION_PREFIX.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            line_separator: DEFAULT_LINE_SEPARATOR,
            lines_to_skip: DEFAULT_LINES_TO_SKIP,
        }
    }
}

impl PartitionerConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`PartitionError::ConfigParse`] for malformed JSON and
    /// [`PartitionError::InvalidConfig`] if the result does not validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| PartitionError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`PartitionError::ConfigRead`] if the file cannot be read, and
    /// the errors of [`from_json_str`](Self::from_json_str) otherwise.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PartitionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check that the buffer is non-empty and that key names are non-empty
    /// and distinct.
    ///
    /// # Errors
    /// Returns [`PartitionError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(PartitionError::invalid_config(
                "buffer size must be greater than 0",
            ));
        }
        let mut seen = HashSet::new();
        for key in self.keys.all() {
            if key.is_empty() {
                return Err(PartitionError::invalid_config(
                    "descriptor key names must not be empty",
                ));
            }
            if !seen.insert(key) {
                return Err(PartitionError::invalid_config(format!(
                    "descriptor key name [{key}] is used more than once"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PartitionerConfig::default();
        assert_eq!(config.keys.start_at, "startAt");
        assert_eq!(config.keys.items_count, "itemsCount");
        assert_eq!(config.keys.previous_items_count, "previousItemsCount");
        assert_eq!(config.keys.resource, "resource");
        assert_eq!(config.partition_prefix, "partition-");
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.line_separator, 0x0A);
        assert_eq!(config.lines_to_skip, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = PartitionerConfig {
            buffer_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PartitionError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut config = PartitionerConfig::default();
        config.keys.items_count = "startAt".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("startAt"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut config = PartitionerConfig::default();
        config.keys.resource = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = PartitionerConfig {
            partition_prefix: "chunk-".into(),
            line_separator: b';',
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"partitionPrefix\":\"chunk-\""));
        let back = PartitionerConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_malformed_json() {
        let err = PartitionerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PartitionError::ConfigParse { .. }));
        assert!(err.is_configuration());
    }
}
