//! Nominal partition borders.
//!
//! The input is divided into `grid_size` spans of `size / grid_size` bytes.
//! The `size % grid_size` leftover bytes go one each to the first partitions,
//! so nominal spans differ by at most one byte. A partition is cut at the
//! first line separator whose position passes the current border.

use crate::cursor::LinesCount;
use crate::descriptor::{DescriptorBuilder, Partitions};

#[derive(Debug)]
pub(crate) struct PartitionBorderCursor {
    bytes_per_partition: u64,
    bytes_remainder: u64,
    remainder_counter: u64,
    partition_border: u64,
    partition_index: usize,
    previous_items_count: u64,
}

impl PartitionBorderCursor {
    /// `grid_size` must be at least 1.
    pub(crate) fn new(grid_size: usize, size_in_bytes: u64) -> Self {
        let grid = grid_size as u64;
        let bytes_remainder = size_in_bytes % grid;
        let mut cursor = Self {
            bytes_per_partition: size_in_bytes / grid,
            bytes_remainder,
            remainder_counter: bytes_remainder,
            partition_border: 0,
            partition_index: 0,
            previous_items_count: 0,
        };
        cursor.advance();
        cursor
    }

    pub(crate) fn bytes_per_partition(&self) -> u64 {
        self.bytes_per_partition
    }

    pub(crate) fn bytes_remainder(&self) -> u64 {
        self.bytes_remainder
    }

    pub(crate) fn partition_border(&self) -> u64 {
        self.partition_border
    }

    /// A separator ending at `byte_ind` closes the partition only when it lies
    /// strictly past the border.
    #[inline]
    pub(crate) fn is_crossed_by(&self, byte_ind: u64) -> bool {
        byte_ind > self.partition_border
    }

    fn advance(&mut self) {
        self.partition_border += self.bytes_per_partition;
        if self.remainder_counter > 0 {
            self.partition_border += 1;
            self.remainder_counter -= 1;
        }
    }

    pub(crate) fn create_partition(
        &mut self,
        lines: LinesCount,
        builder: &DescriptorBuilder<'_>,
        result: &mut Partitions,
    ) {
        let name = builder.name(self.partition_index);
        let descriptor = builder.build(lines, self.previous_items_count);
        tracing::debug!("Added partition [{}] with [{}]", name, descriptor);
        result.insert(name, descriptor);
        self.previous_items_count += lines.lines_count;
        self.partition_index += 1;
        self.advance();
    }
}
