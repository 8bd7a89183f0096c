//! Assertions over partitioning results.
//!
//! [`assert_partitions_consistent`] checks a whole run against the raw bytes
//! it was computed from: line totals, cumulative counts, offsets on line
//! boundaries, naming order, the byte-balance bound, and that simulated
//! workers read every post-header line exactly once.

use crate::config::PartitionerConfig;
use crate::descriptor::{DescriptorKeys, Partitions};

/// Split `data` into lines without their separator. A trailing unterminated
/// line is included; a trailing separator does not start an empty line.
#[must_use]
pub fn split_lines(data: &[u8], separator: u8) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = data.split(|&b| b == separator).collect();
    if data.is_empty() || data.last() == Some(&separator) {
        lines.pop();
    }
    lines
}

/// Replay what each worker would read from `data`: skip `startAt` bytes and
/// take `itemsCount` lines.
///
/// # Panics
///
/// Panics if a descriptor lacks a key or a worker would run out of lines.
#[must_use]
pub fn simulate_reads<'a>(
    data: &'a [u8],
    partitions: &Partitions,
    keys: &DescriptorKeys,
    separator: u8,
) -> Vec<Vec<&'a [u8]>> {
    partitions
        .iter()
        .map(|(name, d)| {
            let start = d.start_at(keys).expect("startAt present") as usize;
            let count = d.items_count(keys).expect("itemsCount present") as usize;
            let tail = data.get(start..).unwrap_or_default();
            let lines = split_lines(tail, separator);
            assert!(
                lines.len() >= count,
                "{name}: needs {count} line(s) from offset {start}, only {} left",
                lines.len()
            );
            lines[..count].to_vec()
        })
        .collect()
}

/// Assert every invariant of a partitioning run of `data` with `config`.
///
/// # Panics
///
/// Panics with a descriptive message on the first violated invariant.
///
/// # Example
///
/// ```
/// use flatfile_partitioner::testing::{assert_partitions_consistent, lines_file};
/// use flatfile_partitioner::FlatFilePartitioner;
///
/// let data = b"aa\nbb\ncc\n";
/// let file = lines_file(data).unwrap();
/// let partitioner = FlatFilePartitioner::new(file.resource());
/// let partitions = partitioner.partition(2).unwrap();
/// assert_partitions_consistent(data, &partitions, partitioner.config(), 2);
/// ```
pub fn assert_partitions_consistent(
    data: &[u8],
    partitions: &Partitions,
    config: &PartitionerConfig,
    grid_size: usize,
) {
    let keys = &config.keys;
    let sep = config.line_separator;
    let all_lines = split_lines(data, sep);
    let skipped = (config.lines_to_skip as usize).min(all_lines.len());

    assert!(
        partitions.len() <= grid_size,
        "{} partitions emitted for grid size {grid_size}",
        partitions.len()
    );
    if data.is_empty() {
        assert!(partitions.is_empty(), "empty input produced partitions");
        return;
    }
    assert!(!partitions.is_empty(), "non-empty input produced no partitions");

    let names: Vec<&str> = partitions.names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "partition names do not sort in emission order");

    let mut expected_previous = 0u64;
    let mut last_start = 0u64;
    let mut starts = Vec::with_capacity(partitions.len());
    for (name, d) in partitions.iter() {
        let start = d.start_at(keys).expect("startAt present");
        let items = d.items_count(keys).expect("itemsCount present");
        let previous = d.previous_items_count(keys).expect("previousItemsCount present");
        assert!(d.resource_uri(keys).is_some_and(|u| u.starts_with("file:")));
        assert_eq!(previous, expected_previous, "{name}: previousItemsCount");
        assert!(start >= last_start, "{name}: startAt {start} before {last_start}");
        let start_usize = start as usize;
        if start > 0 && start_usize < data.len() {
            assert_eq!(
                data[start_usize - 1],
                sep,
                "{name}: startAt {start} is not on a line boundary"
            );
        }
        expected_previous += items;
        last_start = start;
        starts.push(start);
    }

    assert_eq!(
        expected_previous as usize + skipped,
        all_lines.len(),
        "line totals do not reconcile"
    );

    let header_len: usize = all_lines[..skipped].iter().map(|l| l.len() + 1).sum();
    assert_eq!(
        starts[0] as usize,
        header_len.min(data.len()),
        "first partition must start right after the header"
    );

    let bytes_per_partition = data.len() as u64 / grid_size as u64;
    if bytes_per_partition > 0 {
        let longest = all_lines.iter().map(|l| l.len() as u64 + 1).max().unwrap_or(0);
        let mut ends = starts[1..].to_vec();
        ends.push(data.len() as u64);
        for ((name, _), (start, end)) in partitions.iter().zip(starts.iter().zip(ends)) {
            assert!(
                end - start <= bytes_per_partition + 1 + longest,
                "{name}: span {} exceeds {bytes_per_partition} + 1 + {longest}",
                end - start
            );
        }
    }

    let read: Vec<&[u8]> = simulate_reads(data, partitions, keys, sep)
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(
        read,
        all_lines[skipped..].to_vec(),
        "workers did not read every post-header line exactly once"
    );
}
