//! Randomized checks of the partitioning invariants.
//!
//! Inputs are generated from a fixed seed so failures reproduce.

use anyhow::Result;
use flatfile_partitioner::testing::*;
use flatfile_partitioner::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"abcdefghij,;0123456789 \r";

struct Case {
    data: Vec<u8>,
    grid_size: usize,
    lines_to_skip: u64,
    buffer_size: usize,
}

fn random_case(rng: &mut StdRng) -> Case {
    let line_count = rng.gen_range(0..60);
    let mut data = Vec::new();
    for _ in 0..line_count {
        // Mostly short lines with the occasional long one.
        let len = if rng.gen_bool(0.1) {
            rng.gen_range(40..200)
        } else {
            rng.gen_range(0..12)
        };
        for _ in 0..len {
            data.push(ALPHABET[rng.gen_range(0..ALPHABET.len())]);
        }
        data.push(b'\n');
    }
    if !data.is_empty() && rng.gen_bool(0.3) {
        data.pop();
    }
    Case {
        data,
        grid_size: rng.gen_range(1..24),
        lines_to_skip: rng.gen_range(0..4),
        buffer_size: rng.gen_range(1..96),
    }
}

fn partition_case(case: &Case) -> Result<Partitions> {
    let resource = MemoryResource::new(case.data.clone()).with_path("/virtual/random.txt");
    let partitioner = FlatFilePartitioner::new(resource)
        .with_lines_to_skip(case.lines_to_skip)
        .with_buffer_size(case.buffer_size);
    let partitions = partitioner.partition(case.grid_size)?;
    assert_partitions_consistent(&case.data, &partitions, partitioner.config(), case.grid_size);
    Ok(partitions)
}

#[test]
fn test_random_inputs_hold_invariants() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed_f1a7);
    for _ in 0..500 {
        let case = random_case(&mut rng);
        partition_case(&case)?;
    }
    Ok(())
}

#[test]
fn test_buffer_size_is_irrelevant() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let mut case = random_case(&mut rng);
        let first = partition_case(&case)?;
        case.buffer_size = rng.gen_range(1..4096);
        assert_eq!(partition_case(&case)?, first);
    }
    Ok(())
}

#[test]
fn test_file_and_memory_resources_agree() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..25 {
        let case = random_case(&mut rng);
        let file = lines_file(&case.data)?;
        let from_file = FlatFilePartitioner::new(file.resource())
            .with_lines_to_skip(case.lines_to_skip)
            .partition(case.grid_size)?;
        let from_memory = partition_case(&case)?;

        let keys = DescriptorKeys::default();
        let offsets = |p: &Partitions| -> Vec<(u64, u64, u64)> {
            p.descriptors()
                .map(|d| {
                    (
                        d.start_at(&keys).unwrap(),
                        d.items_count(&keys).unwrap(),
                        d.previous_items_count(&keys).unwrap(),
                    )
                })
                .collect()
        };
        assert_eq!(offsets(&from_file), offsets(&from_memory));
        assert_eq!(
            from_file.names().collect::<Vec<_>>(),
            from_memory.names().collect::<Vec<_>>()
        );
    }
    Ok(())
}

#[test]
fn test_count_lines_matches_partition_totals() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let case = random_case(&mut rng);
        let partitions = partition_case(&case)?;
        let total: u64 = partitions
            .descriptors()
            .map(|d| d.items_count(&DescriptorKeys::default()).unwrap())
            .sum();
        let counted = count_lines_after_skip(
            case.data.as_slice(),
            DEFAULT_LINE_SEPARATOR,
            case.lines_to_skip,
            case.buffer_size,
        )?;
        assert_eq!(total, counted.lines_count);
        let all = count_lines(case.data.as_slice())?;
        assert_eq!(all, split_lines(&case.data, b'\n').len() as u64);
    }
    Ok(())
}
