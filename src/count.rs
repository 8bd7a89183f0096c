//! Line counting.
//!
//! Used by the partitioner when the input is too small to give every
//! partition at least one byte, and exposed as [`count_lines`] for callers that
//! only need the number of lines in a stream.

use crate::config::{DEFAULT_BUFFER_SIZE, DEFAULT_LINE_SEPARATOR};
use crate::cursor::{ByteStreamCursor, LinesCount};
use std::io::{self, BufReader, ErrorKind, Read};

/// Read `reader` to the end through a `buffer_size` buffer, handing each
/// filled slice to `f`.
pub(crate) fn for_each_chunk<R, F>(reader: R, buffer_size: usize, mut f: F) -> io::Result<()>
where
    R: Read,
    F: FnMut(&[u8]),
{
    let mut reader = BufReader::with_capacity(buffer_size, reader);
    let mut buf = vec![0u8; buffer_size];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        f(&buf[..read]);
    }
}

/// Count the lines left after skipping `lines_to_skip` header lines, and the
/// number of bytes the header occupies.
///
/// An unterminated trailing line counts as one line.
///
/// # Errors
/// Returns any error raised by `reader`.
pub fn count_lines_after_skip<R: Read>(
    reader: R,
    separator: u8,
    lines_to_skip: u64,
    buffer_size: usize,
) -> io::Result<LinesCount> {
    let mut cursor = ByteStreamCursor::new(separator, lines_to_skip);
    for_each_chunk(reader, buffer_size.max(1), |chunk| {
        for &byte in chunk {
            cursor.observe(byte);
        }
    })?;
    cursor.finish();
    Ok(cursor.lines_count())
}

/// Number of `\n`-separated lines in `reader`, counting an unterminated last
/// line.
///
/// # Example
/// ```
/// use flatfile_partitioner::count_lines;
///
/// assert_eq!(count_lines(&b"a\nb\nc"[..]).unwrap(), 3);
/// assert_eq!(count_lines(&b"a\nb\n"[..]).unwrap(), 2);
/// assert_eq!(count_lines(&b""[..]).unwrap(), 0);
/// ```
///
/// # Errors
/// Returns any error raised by `reader`.
pub fn count_lines<R: Read>(reader: R) -> io::Result<u64> {
    Ok(count_lines_after_skip(reader, DEFAULT_LINE_SEPARATOR, 0, DEFAULT_BUFFER_SIZE)?.lines_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_with_header() {
        let lc = count_lines_after_skip(&b"#hdr\na\nb\n"[..], b'\n', 1, 3).unwrap();
        assert_eq!(lc, LinesCount { bytes_to_skip: 5, lines_count: 2 });
    }

    #[test]
    fn test_count_header_longer_than_file() {
        let lc = count_lines_after_skip(&b"a\nb\n"[..], b'\n', 5, 16).unwrap();
        assert_eq!(lc, LinesCount { bytes_to_skip: 4, lines_count: 0 });
    }

    #[test]
    fn test_tiny_buffer_matches_large_buffer() {
        let data = b"one\ntwo\nthree\nfour";
        let small = count_lines_after_skip(&data[..], b'\n', 1, 1).unwrap();
        let large = count_lines_after_skip(&data[..], b'\n', 1, 4096).unwrap();
        assert_eq!(small, large);
        assert_eq!(small.lines_count, 3);
    }

    #[test]
    fn test_for_each_chunk_retries_interrupted_reads() {
        struct Flaky {
            interrupted: bool,
            data: &'static [u8],
        }
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::new(ErrorKind::Interrupted, "again"));
                }
                self.data.read(buf)
            }
        }
        let reader = Flaky {
            interrupted: false,
            data: b"a\nb\n",
        };
        let mut total = 0;
        for_each_chunk(reader, 2, |chunk| total += chunk.len()).unwrap();
        assert_eq!(total, 4);
    }
}
