//! Worker-side reads of partitioned files.
//!
//! Each worker opens its own handle on the file, seeks to the partition's
//! `startAt` offset and reads exactly `itemsCount` lines. Because partition
//! borders always fall on line separators, workers never overlap and never
//! miss a line.
//!
//! This module provides:
//! - [`PartitionSlice`], the decoded form of a descriptor
//! - [`read_partition_lines`] for one partition
//! - [`read_partitions_seq`] and, with feature `parallel-io`,
//!   [`read_partitions_par`] for all partitions of a run (results in emission
//!   order)
//!
//! Lines are returned as raw bytes without the separator. No decoding is
//! applied; a `\r` before a `\n` stays part of the line.

use crate::descriptor::{DescriptorKeys, PartitionDescriptor, Partitions};
use anyhow::{Context, Result, anyhow, bail};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;

/// The lines of one partition, keyed by partition name.
pub type PartitionLines = (String, Vec<Vec<u8>>);

/// Everything a worker needs to read its share of the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSlice {
    pub name: String,
    pub path: PathBuf,
    pub start_at: u64,
    pub items_count: u64,
    pub previous_items_count: u64,
}

impl PartitionSlice {
    /// Decode a descriptor written with `keys`.
    ///
    /// # Errors
    /// Returns an error if a key is missing, has the wrong type, or the
    /// resource value is not a `file:` URI.
    pub fn from_descriptor(
        name: &str,
        descriptor: &PartitionDescriptor,
        keys: &DescriptorKeys,
    ) -> Result<Self> {
        let long = |key: &str| {
            descriptor
                .get_long(key)
                .ok_or_else(|| anyhow!("partition {name}: missing integer [{key}]"))
        };
        let uri = descriptor
            .get_string(&keys.resource)
            .ok_or_else(|| anyhow!("partition {name}: missing resource [{}]", keys.resource))?;
        let path = uri
            .strip_prefix("file:")
            .ok_or_else(|| anyhow!("partition {name}: not a file URI: {uri}"))?;
        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(path),
            start_at: long(&keys.start_at)?,
            items_count: long(&keys.items_count)?,
            previous_items_count: long(&keys.previous_items_count)?,
        })
    }

    /// Decode every descriptor of a run, in emission order.
    ///
    /// # Errors
    /// Returns the first decoding error.
    pub fn all(partitions: &Partitions, keys: &DescriptorKeys) -> Result<Vec<Self>> {
        partitions
            .iter()
            .map(|(name, d)| Self::from_descriptor(name, d, keys))
            .collect()
    }
}

/// Read the lines of one partition.
///
/// A final line without a separator is returned as a line.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if it ends
/// before `items_count` lines were read.
pub fn read_partition_lines(slice: &PartitionSlice, separator: u8) -> Result<Vec<Vec<u8>>> {
    let mut f =
        File::open(&slice.path).with_context(|| format!("open {}", slice.path.display()))?;
    f.seek(SeekFrom::Start(slice.start_at)).with_context(|| {
        format!("seek to {} in {}", slice.start_at, slice.path.display())
    })?;
    let mut rdr = BufReader::new(f);
    let mut out = Vec::with_capacity(slice.items_count.min(4096) as usize);
    while (out.len() as u64) < slice.items_count {
        let mut line = Vec::new();
        let n = rdr.read_until(separator, &mut line).with_context(|| {
            format!(
                "read line {} of {} in {}",
                slice.previous_items_count + out.len() as u64 + 1,
                slice.name,
                slice.path.display()
            )
        })?;
        if n == 0 {
            bail!(
                "{} expected {} line(s) from offset {} in {}, found {}",
                slice.name,
                slice.items_count,
                slice.start_at,
                slice.path.display(),
                out.len()
            );
        }
        if line.last() == Some(&separator) {
            line.pop();
        }
        out.push(line);
    }
    Ok(out)
}

/// Read every partition one after another.
///
/// # Errors
/// Returns the first decoding or read error.
pub fn read_partitions_seq(
    partitions: &Partitions,
    keys: &DescriptorKeys,
    separator: u8,
) -> Result<Vec<PartitionLines>> {
    PartitionSlice::all(partitions, keys)?
        .into_iter()
        .map(|s| Ok((s.name.clone(), read_partition_lines(&s, separator)?)))
        .collect()
}

/// Read every partition concurrently, one independent file handle each.
///
/// Results keep the emission order of `partitions`.
///
/// # Errors
/// Returns an error if any partition fails to decode or read.
///
/// # Feature
/// Requires the `parallel-io` feature.
#[cfg(feature = "parallel-io")]
pub fn read_partitions_par(
    partitions: &Partitions,
    keys: &DescriptorKeys,
    separator: u8,
) -> Result<Vec<PartitionLines>> {
    use rayon::prelude::*;
    let slices = PartitionSlice::all(partitions, keys)?;
    slices
        .par_iter()
        .map(|s| -> Result<PartitionLines> {
            let lines = read_partition_lines(s, separator)
                .with_context(|| format!("read partition {}", s.name))?;
            Ok((s.name.clone(), lines))
        })
        .collect()
}
