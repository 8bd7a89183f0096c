//! Error types for partitioning.
//!
//! Failures fall into two kinds:
//! - **configuration** errors, raised before the input is scanned (bad grid
//!   size, missing/unreadable resource, no filesystem path, invalid config);
//! - **I/O** errors, raised while the input is measured or scanned. They carry
//!   the description of the resource that failed.
//!
//! A zero-length input is not an error; it yields an empty [`Partitions`](crate::Partitions).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// What the partitioner was doing when an I/O error surfaced.
pub(crate) const PARTITIONING: &str = "partitioning";
pub(crate) const COUNTING_ITEMS: &str = "counting items for";

/// Errors returned by [`FlatFilePartitioner`](crate::FlatFilePartitioner).
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("Grid size must be greater than 0")]
    InvalidGridSize { grid_size: usize },

    #[error("Resource is not set")]
    ResourceNotSet,

    #[error("Input resource must exist: {description}")]
    ResourceMissing { description: String },

    #[error("Input resource must be readable: {description}")]
    ResourceUnreadable { description: String },

    /// The resource cannot be materialized as a filesystem path, so workers
    /// would have no way to open it.
    #[error("File could not be located for: {description}")]
    PathUnavailable {
        description: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid partitioner configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read partitioner configuration from {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse partitioner configuration")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected IO exception while {action} [{description}]")]
    Io {
        action: &'static str,
        description: String,
        #[source]
        source: io::Error,
    },
}

impl PartitionError {
    /// `true` for every error raised before any input byte is scanned.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !self.is_io()
    }

    /// `true` when reading the resource failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, PartitionError::Io { .. })
    }

    pub(crate) fn io(action: &'static str, description: String, source: io::Error) -> Self {
        PartitionError::Io {
            action,
            description,
            source,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        PartitionError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the partitioner.
pub type Result<T> = std::result::Result<T, PartitionError>;
