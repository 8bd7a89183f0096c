//! # flatfile-partitioner
//!
//! Splits a single line-oriented text file into partitions that parallel
//! workers can read independently. Each partition is described by the byte
//! offset to start reading at and the number of lines to read from there.
//!
//! ## Key Features
//!
//! - **Byte-balanced** - every partition gets about `size / grid_size` bytes;
//!   the remainder is spread one byte each over the first partitions
//! - **Line-aligned** - partitions always begin right after a line separator,
//!   so no line is split, skipped or read twice
//! - **Single pass** - one sequential scan of the file, no line index kept in
//!   memory
//! - **Header skipping** - leading lines can be excluded from every partition
//! - **Configurable** - key names, partition prefix, buffer size and separator
//!   byte; loadable from JSON
//! - **Worker helpers** - read a partition back by offset, sequentially or in
//!   parallel with Rayon
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatfile_partitioner::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let partitioner = FlatFilePartitioner::new(FileResource::new("input/trades.csv"))
//!     .with_lines_to_skip(1);
//! let partitions = partitioner.partition(4)?;
//!
//! let keys = &partitioner.config().keys;
//! for (name, descriptor) in &partitions {
//!     println!(
//!         "{name}: skip {} bytes, read {} lines",
//!         descriptor.start_at(keys).unwrap_or_default(),
//!         descriptor.items_count(keys).unwrap_or_default(),
//!     );
//! }
//!
//! // Each worker opens the file on its own and reads its share.
//! let lines = read_partitions_par(&partitions, keys, b'\n')?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Descriptors
//!
//! Every [`PartitionDescriptor`] carries four entries (key names are
//! configurable through [`DescriptorKeys`]):
//!
//! | key | value |
//! |---|---|
//! | `startAt` | bytes to skip before reading |
//! | `itemsCount` | lines to read |
//! | `previousItemsCount` | lines owned by earlier partitions |
//! | `resource` | `file:` URI of the input |
//!
//! [`Partitions`] returns them keyed by name (`partition-0`, `partition-1`,
//! ... zero-padded to the width of `grid_size`) in emission order.
//!
//! ## Edge cases
//!
//! - An empty file yields no partitions.
//! - A file with fewer bytes than `grid_size` yields exactly one partition.
//! - A final line without a separator counts as a line.
//! - CRLF files work with the default `\n` separator; the `\r` stays part of
//!   its line.
//!
//! ## Feature Flags
//!
//! - `parallel-io` (default) - enable [`read_partitions_par`]
//!
//! ## Module Overview
//!
//! - [`partitioner`] - the [`FlatFilePartitioner`] entry point
//! - [`config`] - [`PartitionerConfig`] and defaults
//! - [`descriptor`] - descriptors, naming and the ordered result
//! - [`io`] - the [`Resource`] abstraction and worker-side readers
//! - [`error`] - [`PartitionError`]
//! - [`testing`] - fixtures and invariant assertions for tests

mod border;
pub mod config;
mod count;
mod cursor;
pub mod descriptor;
pub mod error;
pub mod io;
pub mod partitioner;
pub mod testing;

// General re-exports
pub use config::{
    DEFAULT_BUFFER_SIZE, DEFAULT_LINE_SEPARATOR, DEFAULT_LINES_TO_SKIP, DEFAULT_PARTITION_PREFIX,
    PartitionerConfig,
};
pub use count::{count_lines, count_lines_after_skip};
pub use cursor::LinesCount;
pub use descriptor::{
    ContextValue, DEFAULT_ITEMS_COUNT_KEY, DEFAULT_PREVIOUS_ITEMS_COUNT_KEY, DEFAULT_RESOURCE_KEY,
    DEFAULT_START_AT_KEY, DescriptorKeys, PartitionDescriptor, Partitions, file_uri,
    partition_name,
};
pub use error::{PartitionError, Result};
pub use io::reader::{PartitionLines, PartitionSlice, read_partition_lines, read_partitions_seq};
pub use io::resource::{FileResource, Resource};
pub use partitioner::FlatFilePartitioner;

// Gated re-exports
#[cfg(feature = "parallel-io")]
pub use io::reader::read_partitions_par;
