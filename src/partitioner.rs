//! The partitioner entry point.
//!
//! [`FlatFilePartitioner`] splits a single line-oriented file into at most
//! `grid_size` partitions of roughly equal byte size. Every partition begins
//! on a line boundary, so workers can read disjoint regions of the same file
//! concurrently: each one skips `startAt` bytes and reads `itemsCount` lines.
//!
//! The scan is a single pass over the file. A byte cursor tracks bytes and
//! lines, a border cursor tracks the nominal byte borders, and a partition is
//! cut whenever a line separator lands strictly past the current border.
//!
//! # Example
//!
//! ```no_run
//! use flatfile_partitioner::{FileResource, FlatFilePartitioner};
//!
//! # fn main() -> flatfile_partitioner::Result<()> {
//! let partitioner = FlatFilePartitioner::new(FileResource::new("data/trades.csv"))
//!     .with_lines_to_skip(1);
//!
//! for (name, descriptor) in &partitioner.partition(8)? {
//!     println!("{name}: {descriptor}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::border::PartitionBorderCursor;
use crate::config::PartitionerConfig;
use crate::count::{count_lines_after_skip, for_each_chunk};
use crate::cursor::{ByteStreamCursor, LinesCount};
use crate::descriptor::{file_uri, DescriptorBuilder, Partitions};
use crate::error::{PartitionError, Result, COUNTING_ITEMS, PARTITIONING};
use crate::io::resource::Resource;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates line-aligned, byte-balanced partitions of a flat text file.
///
/// The partitioner holds no state between calls; every [`partition`](Self::partition)
/// opens, scans and closes its own streams. It is not meant to be shared by
/// concurrent callers that also change its configuration.
#[derive(Clone, Debug, Default)]
pub struct FlatFilePartitioner {
    resource: Option<Arc<dyn Resource>>,
    config: PartitionerConfig,
}

impl FlatFilePartitioner {
    /// Partition `resource` with the default configuration.
    pub fn new(resource: impl Resource + 'static) -> Self {
        Self {
            resource: Some(Arc::new(resource)),
            config: PartitionerConfig::default(),
        }
    }

    /// Partition a shared resource.
    #[must_use]
    pub fn from_shared(resource: Arc<dyn Resource>) -> Self {
        Self {
            resource: Some(resource),
            config: PartitionerConfig::default(),
        }
    }

    pub fn set_resource(&mut self, resource: impl Resource + 'static) {
        self.resource = Some(Arc::new(resource));
    }

    #[must_use]
    pub fn resource(&self) -> Option<&Arc<dyn Resource>> {
        self.resource.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &PartitionerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PartitionerConfig {
        &mut self.config
    }

    #[must_use]
    pub fn with_config(mut self, config: PartitionerConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of leading lines to exclude, e.g. a header without a comment
    /// marker.
    #[must_use]
    pub fn with_lines_to_skip(mut self, lines_to_skip: u64) -> Self {
        self.config.lines_to_skip = lines_to_skip;
        self
    }

    #[must_use]
    pub fn with_start_at_key_name(mut self, key: impl Into<String>) -> Self {
        self.config.keys.start_at = key.into();
        self
    }

    #[must_use]
    pub fn with_items_count_key_name(mut self, key: impl Into<String>) -> Self {
        self.config.keys.items_count = key.into();
        self
    }

    #[must_use]
    pub fn with_previous_items_count_key_name(mut self, key: impl Into<String>) -> Self {
        self.config.keys.previous_items_count = key.into();
        self
    }

    #[must_use]
    pub fn with_resource_key_name(mut self, key: impl Into<String>) -> Self {
        self.config.keys.resource = key.into();
        self
    }

    #[must_use]
    pub fn with_partition_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.partition_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub fn with_line_separator(mut self, separator: u8) -> Self {
        self.config.line_separator = separator;
        self
    }

    /// Split the resource into at most `grid_size` partitions.
    ///
    /// Returns the descriptors in emission order, keyed by partition name.
    /// An empty file yields no partitions. When the file has fewer bytes than
    /// `grid_size`, a single partition covers all of it.
    ///
    /// # Errors
    /// - Configuration errors if `grid_size` is 0, the configuration is
    ///   invalid, the resource is unset, missing or unreadable, or it has no
    ///   filesystem path.
    /// - [`PartitionError::Io`] if reading the resource fails. No partial
    ///   result is returned.
    pub fn partition(&self, grid_size: usize) -> Result<Partitions> {
        if grid_size == 0 {
            return Err(PartitionError::InvalidGridSize { grid_size });
        }
        self.config.validate()?;
        let resource = self.check_resource()?;
        let description = resource.description();
        debug!("Splitting [{}]", description);

        let mut result = Partitions::new();
        let size_in_bytes = resource
            .content_length()
            .map_err(|e| PartitionError::io(PARTITIONING, description.clone(), e))?;
        if size_in_bytes == 0 {
            info!(
                "Empty input file [{}] no partition will be created.",
                description
            );
            return Ok(result);
        }

        let resource_uri = self.resource_uri(resource)?;
        let builder = DescriptorBuilder::new(
            &self.config.keys,
            &self.config.partition_prefix,
            grid_size,
            resource_uri,
        );
        let mut border = PartitionBorderCursor::new(grid_size, size_in_bytes);

        if border.bytes_per_partition() == 0 {
            let lines = self.count_items(resource)?;
            info!(
                "Not enough data ({}) for the requested gridSize [{}]",
                lines.lines_count, grid_size
            );
            border.create_partition(lines, &builder, &mut result);
            return Ok(result);
        }

        debug!(
            "Has to split [{}] byte(s) in [{}] grid(s) ({} each, {} remainder)",
            size_in_bytes,
            grid_size,
            border.bytes_per_partition(),
            border.bytes_remainder()
        );

        let input = resource
            .open()
            .map_err(|e| PartitionError::io(PARTITIONING, description.clone(), e))?;
        self.scan(input, &mut border, &builder, &mut result)
            .map_err(|e| PartitionError::io(PARTITIONING, description, e))?;
        Ok(result)
    }

    /// Partition into one slot per available CPU.
    ///
    /// # Errors
    /// Same as [`partition`](Self::partition).
    pub fn partition_per_cpu(&self) -> Result<Partitions> {
        self.partition(num_cpus::get().max(1))
    }

    /// Count the lines of `resource` left after the configured header skip,
    /// along with the header length in bytes.
    ///
    /// # Errors
    /// Returns [`PartitionError::Io`] if the resource cannot be read.
    pub fn count_items(&self, resource: &dyn Resource) -> Result<LinesCount> {
        let io_err = |e| PartitionError::io(COUNTING_ITEMS, resource.description(), e);
        let input = resource.open().map_err(io_err)?;
        count_lines_after_skip(
            input,
            self.config.line_separator,
            self.config.lines_to_skip,
            self.config.buffer_size,
        )
        .map_err(io_err)
    }

    fn scan(
        &self,
        input: Box<dyn Read + Send>,
        border: &mut PartitionBorderCursor,
        builder: &DescriptorBuilder<'_>,
        result: &mut Partitions,
    ) -> std::io::Result<()> {
        let mut cursor = ByteStreamCursor::new(self.config.line_separator, self.config.lines_to_skip);
        for_each_chunk(input, self.config.buffer_size, |chunk| {
            for &byte in chunk {
                // Separators consumed by the header never close a partition.
                let in_header = cursor.in_header();
                if cursor.observe(byte)
                    && !in_header
                    && border.is_crossed_by(cursor.current_byte_ind())
                {
                    border.create_partition(cursor.lines_count(), builder, result);
                    cursor.start_new_partition();
                }
            }
        })?;
        // The line counted here never triggers another cut; the flush below
        // covers it.
        cursor.finish();
        if cursor.outstanding_data() {
            border.create_partition(cursor.lines_count(), builder, result);
        }
        Ok(())
    }

    fn check_resource(&self) -> Result<&dyn Resource> {
        let resource = self.resource.as_deref().ok_or(PartitionError::ResourceNotSet)?;
        if !resource.exists() {
            return Err(PartitionError::ResourceMissing {
                description: resource.description(),
            });
        }
        if !resource.is_readable() {
            return Err(PartitionError::ResourceUnreadable {
                description: resource.description(),
            });
        }
        Ok(resource)
    }

    fn resource_uri(&self, resource: &dyn Resource) -> Result<String> {
        let path = resource
            .file_path()
            .map_err(|source| PartitionError::PathUnavailable {
                description: resource.description(),
                source,
            })?;
        Ok(file_uri(&path))
    }
}
