//! Pre-built inputs for common partitioning scenarios.

/// A CSV document with a header line and `rows` data rows of varying width.
///
/// # Example
///
/// ```
/// use flatfile_partitioner::testing::csv_with_header;
///
/// let data = csv_with_header(3);
/// assert!(data.starts_with(b"id,name,amount\n"));
/// assert_eq!(data.iter().filter(|&&b| b == b'\n').count(), 4);
/// ```
#[must_use]
pub fn csv_with_header(rows: usize) -> Vec<u8> {
    let mut out = b"id,name,amount\n".to_vec();
    for i in 0..rows {
        let name = "x".repeat(1 + i % 7);
        out.extend_from_slice(format!("{i},{name},{}\n", i * 37 % 1000).as_bytes());
    }
    out
}

/// `count` lines `line-0`, `line-1`, ... each terminated by `\n`.
#[must_use]
pub fn numbered_lines(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..count {
        out.extend_from_slice(format!("line-{i}\n").as_bytes());
    }
    out
}

/// Like [`numbered_lines`] but with Windows line endings.
#[must_use]
pub fn crlf_lines(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..count {
        out.extend_from_slice(format!("line-{i}\r\n").as_bytes());
    }
    out
}

/// `count` lines where the last one has no trailing separator.
#[must_use]
pub fn unterminated_lines(count: usize) -> Vec<u8> {
    let mut out = numbered_lines(count);
    if out.last() == Some(&b'\n') {
        out.pop();
    }
    out
}

/// Lines whose lengths vary wildly, including empty lines.
#[must_use]
pub fn ragged_lines() -> Vec<u8> {
    let mut out = Vec::new();
    for len in [0usize, 1, 120, 3, 0, 0, 45, 7, 300, 2, 0, 64, 5] {
        out.extend(std::iter::repeat_n(b'r', len));
        out.push(b'\n');
    }
    out
}
