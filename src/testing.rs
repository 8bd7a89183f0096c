//! Testing utilities for partitioning.
//!
//! This module provides what the crate's own tests use, and what callers need
//! to test code that consumes partitions:
//!
//! - **Mock I/O**: temporary files and an in-memory [`MemoryResource`] that can
//!   be missing, unreadable, pathless or fail mid-read
//! - **Fixtures**: sample inputs covering headers, CRLF, unterminated lines
//! - **Assertions**: [`assert_partitions_consistent`] checks every invariant of
//!   a run against the bytes it was computed from
//!
//! # Quick Start
//!
//! ```
//! use flatfile_partitioner::FlatFilePartitioner;
//! use flatfile_partitioner::testing::*;
//!
//! let data = csv_with_header(20);
//! let file = lines_file(&data).unwrap();
//! let partitioner = FlatFilePartitioner::new(file.resource()).with_lines_to_skip(1);
//! let partitions = partitioner.partition(3).unwrap();
//! assert_partitions_consistent(&data, &partitions, partitioner.config(), 3);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_io;

pub use assertions::*;
pub use fixtures::*;
pub use mock_io::*;
