//! Partition descriptors and the insertion-ordered result mapping.
//!
//! A [`PartitionDescriptor`] is the per-partition record handed to a worker:
//! the byte offset to start at, the number of lines to read, the number of
//! lines owned by earlier partitions, and the `file:` URI of the input. Key
//! names are configurable through [`DescriptorKeys`].
//!
//! [`Partitions`] keeps descriptors in emission order; callers rely on that
//! order, so it is backed by a vector rather than a hash map.

use crate::cursor::LinesCount;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default key for the number of bytes a worker skips before reading.
pub const DEFAULT_START_AT_KEY: &str = "startAt";
/// Default key for the number of lines a worker reads.
pub const DEFAULT_ITEMS_COUNT_KEY: &str = "itemsCount";
/// Default key for the number of lines owned by earlier partitions.
pub const DEFAULT_PREVIOUS_ITEMS_COUNT_KEY: &str = "previousItemsCount";
/// Default key for the `file:` URI of the partitioned input.
pub const DEFAULT_RESOURCE_KEY: &str = "resource";

/// Key names written into each descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescriptorKeys {
    pub start_at: String,
    pub items_count: String,
    pub previous_items_count: String,
    pub resource: String,
}

impl Default for DescriptorKeys {
    fn default() -> Self {
        Self {
            start_at: DEFAULT_START_AT_KEY.to_string(),
            items_count: DEFAULT_ITEMS_COUNT_KEY.to_string(),
            previous_items_count: DEFAULT_PREVIOUS_ITEMS_COUNT_KEY.to_string(),
            resource: DEFAULT_RESOURCE_KEY.to_string(),
        }
    }
}

impl DescriptorKeys {
    /// All four key names in descriptor order.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [
            &self.start_at,
            &self.items_count,
            &self.previous_items_count,
            &self.resource,
        ]
    }
}

/// A typed descriptor value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Long(u64),
    String(String),
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Long(v) => write!(f, "{v}"),
            ContextValue::String(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        ContextValue::Long(value)
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

/// Ordered key/value record describing one partition.
///
/// # Example
/// ```
/// use flatfile_partitioner::{DescriptorKeys, PartitionDescriptor};
///
/// let keys = DescriptorKeys::default();
/// let mut d = PartitionDescriptor::new();
/// d.put_long("startAt", 5);
/// d.put_long("itemsCount", 2);
/// assert_eq!(d.start_at(&keys), Some(5));
/// assert_eq!(d.items_count(&keys), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionDescriptor {
    entries: Vec<(String, ContextValue)>,
}

impl PartitionDescriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same key while
    /// keeping its position.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn put_long(&mut self, key: impl Into<String>, value: u64) {
        self.put(key, ContextValue::Long(value));
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, ContextValue::String(value.into()));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn get_long(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            ContextValue::Long(v) => Some(*v),
            ContextValue::String(_) => None,
        }
    }

    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ContextValue::String(s) => Some(s.as_str()),
            ContextValue::Long(_) => None,
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn start_at(&self, keys: &DescriptorKeys) -> Option<u64> {
        self.get_long(&keys.start_at)
    }

    #[must_use]
    pub fn items_count(&self, keys: &DescriptorKeys) -> Option<u64> {
        self.get_long(&keys.items_count)
    }

    #[must_use]
    pub fn previous_items_count(&self, keys: &DescriptorKeys) -> Option<u64> {
        self.get_long(&keys.previous_items_count)
    }

    #[must_use]
    pub fn resource_uri<'a>(&'a self, keys: &DescriptorKeys) -> Option<&'a str> {
        self.get_string(&keys.resource)
    }
}

impl fmt::Display for PartitionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for PartitionDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Partition name to descriptor, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partitions {
    entries: Vec<(String, PartitionDescriptor)>,
}

impl Partitions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor. An existing name keeps its position and the
    /// previous descriptor is returned.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        descriptor: PartitionDescriptor,
    ) -> Option<PartitionDescriptor> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, descriptor)),
            None => {
                self.entries.push((name, descriptor));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PartitionDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartitionDescriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PartitionDescriptor> {
        self.entries.iter().map(|(_, d)| d)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<(String, PartitionDescriptor)> {
        self.entries
    }

    /// Render as a JSON object keyed by partition name, preserving order.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for Partitions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (n, d) in &self.entries {
            map.serialize_entry(n, d)?;
        }
        map.end()
    }
}

impl IntoIterator for Partitions {
    type Item = (String, PartitionDescriptor);
    type IntoIter = std::vec::IntoIter<(String, PartitionDescriptor)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Partitions {
    type Item = &'a (String, PartitionDescriptor);
    type IntoIter = std::slice::Iter<'a, (String, PartitionDescriptor)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// `prefix` followed by `index` zero-padded to the digit count of `grid_size`.
///
/// ```
/// use flatfile_partitioner::partition_name;
///
/// assert_eq!(partition_name("partition-", 10, 3), "partition-03");
/// assert_eq!(partition_name("partition-", 4, 0), "partition-0");
/// ```
#[must_use]
pub fn partition_name(prefix: &str, grid_size: usize, index: usize) -> String {
    let width = grid_size.to_string().len();
    format!("{prefix}{index:0width$}")
}

/// The `file:` URI workers use to open the partitioned input.
#[must_use]
pub fn file_uri(path: &Path) -> String {
    format!("file:{}", path.display())
}

/// Assembles descriptors for one `partition` call.
///
/// The resource URI is resolved once up front; every descriptor of the run
/// shares it.
#[derive(Debug)]
pub(crate) struct DescriptorBuilder<'a> {
    keys: &'a DescriptorKeys,
    prefix: &'a str,
    grid_size: usize,
    resource_uri: String,
}

impl<'a> DescriptorBuilder<'a> {
    pub(crate) fn new(
        keys: &'a DescriptorKeys,
        prefix: &'a str,
        grid_size: usize,
        resource_uri: String,
    ) -> Self {
        Self {
            keys,
            prefix,
            grid_size,
            resource_uri,
        }
    }

    pub(crate) fn name(&self, index: usize) -> String {
        partition_name(self.prefix, self.grid_size, index)
    }

    pub(crate) fn build(&self, lines: LinesCount, previous_items_count: u64) -> PartitionDescriptor {
        let mut descriptor = PartitionDescriptor::new();
        descriptor.put_long(self.keys.start_at.as_str(), lines.bytes_to_skip);
        descriptor.put_long(self.keys.items_count.as_str(), lines.lines_count);
        descriptor.put_long(
            self.keys.previous_items_count.as_str(),
            previous_items_count,
        );
        descriptor.put_string(self.keys.resource.as_str(), self.resource_uri.as_str());
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_width_follows_grid_size() {
        assert_eq!(partition_name("partition-", 1, 0), "partition-0");
        assert_eq!(partition_name("partition-", 9, 8), "partition-8");
        assert_eq!(partition_name("partition-", 10, 0), "partition-00");
        assert_eq!(partition_name("p", 100, 7), "p007");
        assert_eq!(partition_name("", 1000, 999), "0999");
    }

    #[test]
    fn test_names_sort_in_emission_order() {
        let names: Vec<String> = (0..12).map(|i| partition_name("part-", 12, i)).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut d = PartitionDescriptor::new();
        d.put_long("a", 1);
        d.put_string("b", "x");
        d.put_long("a", 2);
        let keys: Vec<&str> = d.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(d.get_long("a"), Some(2));
        assert_eq!(d.get_long("b"), None);
        assert_eq!(d.get_string("b"), Some("x"));
    }

    #[test]
    fn test_descriptor_display() {
        let mut d = PartitionDescriptor::new();
        d.put_long("startAt", 4);
        d.put_string("resource", "file:/tmp/x");
        assert_eq!(d.to_string(), "{startAt=4, resource=file:/tmp/x}");
    }

    #[test]
    fn test_partitions_preserve_insertion_order() {
        let mut p = Partitions::new();
        p.insert("z", PartitionDescriptor::new());
        p.insert("a", PartitionDescriptor::new());
        p.insert("m", PartitionDescriptor::new());
        assert_eq!(p.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);

        let mut replacement = PartitionDescriptor::new();
        replacement.put_long("k", 1);
        assert!(p.insert("a", replacement).is_some());
        assert_eq!(p.len(), 3);
        assert_eq!(p.names().nth(1), Some("a"));
        assert_eq!(p.get("a").and_then(|d| d.get_long("k")), Some(1));
    }

    #[test]
    fn test_builder_uses_configured_keys() {
        let keys = DescriptorKeys {
            start_at: "offset".into(),
            ..Default::default()
        };
        let builder = DescriptorBuilder::new(&keys, "chunk-", 3, "file:/data/in.txt".into());
        let d = builder.build(
            LinesCount {
                bytes_to_skip: 12,
                lines_count: 3,
            },
            7,
        );
        assert_eq!(builder.name(2), "chunk-2");
        assert_eq!(d.get_long("offset"), Some(12));
        assert_eq!(d.items_count(&keys), Some(3));
        assert_eq!(d.previous_items_count(&keys), Some(7));
        assert_eq!(d.resource_uri(&keys), Some("file:/data/in.txt"));
        assert!(!d.contains_key(DEFAULT_START_AT_KEY));
    }
}
