//! Per-byte scan state.
//!
//! `ByteStreamCursor` tracks the current position in the byte stream, the
//! number of lines counted since the last partition was cut and since the
//! beginning of the stream, and the header lines still to be skipped. It
//! decides when a line separator has been crossed; the border logic lives in
//! the `border` module.

use serde::{Deserialize, Serialize};

/// Start offset and line count of one partition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesCount {
    /// Byte offset at which the partition begins.
    pub bytes_to_skip: u64,
    /// Number of lines belonging to the partition.
    pub lines_count: u64,
}

#[derive(Debug)]
pub(crate) struct ByteStreamCursor {
    separator: u8,
    current_byte_ind: u64,
    total_line_count: u64,
    line_count: u64,
    skip_line_count: u64,
    skip_bytes_count: u64,
    last_seen: Option<u8>,
    start_at: u64,
}

impl ByteStreamCursor {
    pub(crate) fn new(separator: u8, lines_to_skip: u64) -> Self {
        Self {
            separator,
            current_byte_ind: 0,
            total_line_count: 0,
            line_count: 0,
            skip_line_count: lines_to_skip,
            skip_bytes_count: 0,
            last_seen: None,
            start_at: 0,
        }
    }

    /// Feed one byte. Returns `true` when the byte ended a line.
    #[inline]
    pub(crate) fn observe(&mut self, byte: u8) -> bool {
        self.last_seen = Some(byte);
        self.current_byte_ind += 1;
        if self.skip_line_count > 0 {
            self.skip_bytes_count += 1;
        }
        if byte == self.separator {
            self.start_new_line();
            return true;
        }
        false
    }

    pub(crate) fn start_new_line(&mut self) {
        if self.skip_line_count > 0 {
            self.skip_line_count -= 1;
        } else {
            self.line_count += 1;
        }
        self.total_line_count += 1;
    }

    /// Header skipping is never re-armed here; it only happens at the start
    /// of the stream.
    pub(crate) fn start_new_partition(&mut self) {
        self.start_at = self.current_byte_ind;
        self.line_count = 0;
    }

    /// The first partition still has `start_at == 0`, so the header length
    /// must win over it or worker 0 would re-read the header as data.
    pub(crate) fn lines_count(&self) -> LinesCount {
        LinesCount {
            bytes_to_skip: self.start_at.max(self.skip_bytes_count),
            lines_count: self.line_count,
        }
    }

    /// Header lines remain to be skipped.
    #[inline]
    pub(crate) fn in_header(&self) -> bool {
        self.skip_line_count > 0
    }

    pub(crate) fn current_byte_ind(&self) -> u64 {
        self.current_byte_ind
    }

    pub(crate) fn total_line_count(&self) -> u64 {
        self.total_line_count
    }

    /// Bytes were seen and the last one was not a separator.
    pub(crate) fn last_line_unterminated(&self) -> bool {
        matches!(self.last_seen, Some(b) if b != self.separator)
    }

    /// At least one byte lies past the last partition boundary.
    pub(crate) fn outstanding_data(&self) -> bool {
        self.current_byte_ind > 0 && self.start_at != self.current_byte_ind
    }

    /// Count an unterminated trailing line, if any.
    pub(crate) fn finish(&mut self) {
        if self.last_line_unterminated() {
            self.start_new_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(cursor: &mut ByteStreamCursor, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&b| cursor.observe(b)).count()
    }

    #[test]
    fn test_observe_reports_separators() {
        let mut c = ByteStreamCursor::new(b'\n', 0);
        assert!(!c.observe(b'a'));
        assert!(c.observe(b'\n'));
        assert_eq!(c.current_byte_ind(), 2);
        assert_eq!(c.lines_count(), LinesCount { bytes_to_skip: 0, lines_count: 1 });
    }

    #[test]
    fn test_header_bytes_are_skipped() {
        let mut c = ByteStreamCursor::new(b'\n', 2);
        assert_eq!(feed(&mut c, b"h1\nh2\nrow\n"), 3);
        let lc = c.lines_count();
        assert_eq!(lc.bytes_to_skip, 6);
        assert_eq!(lc.lines_count, 1);
        assert_eq!(c.total_line_count(), 3);
    }

    #[test]
    fn test_in_header_clears_on_last_header_separator() {
        let mut c = ByteStreamCursor::new(b'\n', 1);
        assert!(c.in_header());
        feed(&mut c, b"hdr");
        assert!(c.in_header());
        assert!(c.observe(b'\n'));
        assert!(!c.in_header());
    }

    #[test]
    fn test_start_new_partition_resets_line_count() {
        let mut c = ByteStreamCursor::new(b'\n', 1);
        feed(&mut c, b"hdr\na\nb\n");
        c.start_new_partition();
        assert_eq!(c.lines_count(), LinesCount { bytes_to_skip: 8, lines_count: 0 });
        assert!(!c.outstanding_data());

        feed(&mut c, b"c\n");
        assert_eq!(c.lines_count(), LinesCount { bytes_to_skip: 8, lines_count: 1 });
        assert!(c.outstanding_data());
    }

    #[test]
    fn test_unterminated_last_line() {
        let mut c = ByteStreamCursor::new(b'\n', 0);
        assert!(!c.last_line_unterminated());
        feed(&mut c, b"x\ny");
        assert!(c.last_line_unterminated());
        c.finish();
        assert_eq!(c.lines_count().lines_count, 2);

        let mut single = ByteStreamCursor::new(b'\n', 0);
        feed(&mut single, b"only");
        assert!(single.last_line_unterminated());
        single.finish();
        assert_eq!(single.total_line_count(), 1);

        let mut terminated = ByteStreamCursor::new(b'\n', 0);
        feed(&mut terminated, b"a\n");
        terminated.finish();
        assert_eq!(terminated.total_line_count(), 1);
    }

    #[test]
    fn test_custom_separator() {
        let mut c = ByteStreamCursor::new(b';', 0);
        assert_eq!(feed(&mut c, b"a;b;c"), 2);
        c.finish();
        assert_eq!(c.lines_count().lines_count, 3);
    }

    #[test]
    fn test_crlf_counts_only_line_feed() {
        let mut c = ByteStreamCursor::new(b'\n', 0);
        assert_eq!(feed(&mut c, b"a\r\nb\r\n"), 2);
        assert_eq!(c.current_byte_ind(), 6);
    }

    #[test]
    fn test_empty_stream_has_no_outstanding_data() {
        let c = ByteStreamCursor::new(b'\n', 0);
        assert!(!c.outstanding_data());
        assert!(!c.last_line_unterminated());
    }
}
