//! Mock I/O helpers for testing without hand-managed files.
//!
//! [`TempFilePath`] and [`lines_file`] put bytes on disk for a
//! [`FileResource`](crate::FileResource); [`MemoryResource`] serves bytes from
//! memory and can simulate missing, unreadable, pathless or failing inputs.

use crate::io::resource::Resource;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{NamedTempFile, TempDir};

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new, empty temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Get the path to the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A [`FileResource`](crate::FileResource) pointing at this file.
    #[must_use]
    pub fn resource(&self) -> crate::FileResource {
        crate::FileResource::new(&self.path)
    }
}

/// A temporary directory that is automatically deleted when dropped.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// Create a new temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file path within this directory.
    #[must_use]
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }
}

/// Write `content` to a fresh temporary file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// # Example
///
/// ```
/// use flatfile_partitioner::testing::lines_file;
/// use flatfile_partitioner::FlatFilePartitioner;
///
/// let file = lines_file(b"a\nb\nc\nd\n").unwrap();
/// let partitions = FlatFilePartitioner::new(file.resource()).partition(2).unwrap();
/// assert_eq!(partitions.len(), 2);
/// ```
pub fn lines_file(content: &[u8]) -> io::Result<TempFilePath> {
    let temp = TempFilePath::with_extension("txt")?;
    fs::write(temp.path(), content)?;
    Ok(temp)
}

/// An in-memory [`Resource`].
///
/// Every `open` is counted, so tests can check how often the partitioner
/// touched the input.
#[derive(Clone, Debug)]
pub struct MemoryResource {
    data: Arc<[u8]>,
    path: Option<PathBuf>,
    exists: bool,
    readable: bool,
    fail_after: Option<usize>,
    opens: Arc<AtomicUsize>,
}

impl MemoryResource {
    /// Bytes with no filesystem path. Partitioning non-empty data fails with
    /// [`PartitionError::PathUnavailable`](crate::PartitionError::PathUnavailable).
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            data: Arc::from(data),
            path: None,
            exists: true,
            readable: true,
            fail_after: None,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Report `path` as the resource's location.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn missing(mut self) -> Self {
        self.exists = false;
        self
    }

    #[must_use]
    pub fn unreadable(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Streams fail with an I/O error once `bytes` bytes were delivered.
    #[must_use]
    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    /// How many streams were opened so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Resource for MemoryResource {
    fn exists(&self) -> bool {
        self.exists
    }

    fn is_readable(&self) -> bool {
        self.exists && self.readable
    }

    fn content_length(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FailingReader {
            inner: Cursor::new(self.data.to_vec()),
            remaining: self.fail_after,
        }))
    }

    fn file_path(&self) -> io::Result<PathBuf> {
        self.path.clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                "in-memory resource has no filesystem path",
            )
        })
    }

    fn description(&self) -> String {
        format!("in-memory resource ({} bytes)", self.data.len())
    }
}

/// Delivers at most `remaining` bytes, then fails.
struct FailingReader {
    inner: Cursor<Vec<u8>>,
    remaining: Option<usize>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.remaining {
            None => self.inner.read(buf),
            Some(0) => Err(io::Error::other("simulated read failure")),
            Some(remaining) => {
                let limit = remaining.min(buf.len());
                let n = self.inner.read(&mut buf[..limit])?;
                self.remaining = Some(remaining - n);
                Ok(n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_reader_stops_after_limit() {
        let resource = MemoryResource::new(b"abcdef".to_vec()).failing_after(4);
        let mut stream = resource.open().unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(stream.read(&mut buf).unwrap(), 4);
        assert!(stream.read(&mut buf).is_err());
        assert_eq!(resource.open_count(), 1);
    }

    #[test]
    fn test_pathless_resource() {
        let resource = MemoryResource::new(b"x\n".to_vec());
        assert!(resource.file_path().is_err());
        let with_path = resource.with_path("/data/x.txt");
        assert_eq!(with_path.file_path().unwrap(), PathBuf::from("/data/x.txt"));
    }
}
