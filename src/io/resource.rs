//! The byte-source abstraction the partitioner reads from.
//!
//! A [`Resource`] is a re-openable handle to a byte sequence. The partitioner
//! measures it, opens it once to scan (twice when it falls back to counting
//! lines), and embeds its filesystem path in every descriptor so that workers
//! can open the same bytes independently.
//!
//! [`FileResource`] is the local filesystem implementation. Test doubles live
//! in [`crate::testing`].

use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A re-openable, measurable byte source.
pub trait Resource: Debug + Send + Sync {
    /// Whether the underlying bytes exist at all.
    fn exists(&self) -> bool;

    /// Whether the bytes can be opened for reading.
    fn is_readable(&self) -> bool;

    /// Total length in bytes.
    ///
    /// # Errors
    /// Returns an error if the length cannot be determined.
    fn content_length(&self) -> io::Result<u64>;

    /// Open a fresh stream positioned at the first byte.
    ///
    /// # Errors
    /// Returns an error if the resource cannot be opened.
    fn open(&self) -> io::Result<Box<dyn Read + Send>>;

    /// Absolute filesystem path of the resource.
    ///
    /// # Errors
    /// Returns an error if the resource is not backed by a file.
    fn file_path(&self) -> io::Result<PathBuf>;

    /// Human readable description used in logs and error messages.
    fn description(&self) -> String;
}

impl<R: Resource + ?Sized> Resource for Arc<R> {
    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn is_readable(&self) -> bool {
        (**self).is_readable()
    }

    fn content_length(&self) -> io::Result<u64> {
        (**self).content_length()
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        (**self).open()
    }

    fn file_path(&self) -> io::Result<PathBuf> {
        (**self).file_path()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// A file on the local filesystem.
///
/// # Example
/// ```no_run
/// use flatfile_partitioner::{FileResource, Resource};
///
/// let resource = FileResource::new("data/input.csv");
/// assert!(resource.description().contains("input.csv"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path as given at construction.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn is_readable(&self) -> bool {
        // Directories exist but cannot be streamed as lines.
        self.path.is_file() && File::open(&self.path).is_ok()
    }

    fn content_length(&self) -> io::Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn file_path(&self) -> io::Result<PathBuf> {
        std::path::absolute(&self.path)
    }

    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }
}

impl From<PathBuf> for FileResource {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FileResource {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_resource_properties() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("lines.txt");
        fs::write(&file, "a\nb\n").unwrap();

        let resource = FileResource::new(&file);
        assert!(resource.exists());
        assert!(resource.is_readable());
        assert_eq!(resource.content_length().unwrap(), 4);
        assert!(resource.file_path().unwrap().is_absolute());

        let mut content = String::new();
        resource.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "a\nb\n");
    }

    #[test]
    fn test_directory_is_not_readable() {
        let dir = TempDir::new().unwrap();
        let resource = FileResource::new(dir.path());
        assert!(resource.exists());
        assert!(!resource.is_readable());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let resource = FileResource::new(dir.path().join("nope.txt"));
        assert!(!resource.exists());
        assert!(!resource.is_readable());
        assert!(resource.content_length().is_err());
    }

    #[test]
    fn test_relative_path_is_made_absolute() {
        let resource = FileResource::new("relative/input.txt");
        let path = resource.file_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("relative/input.txt"));
    }
}
