//! Storage backend trait definition.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::path::Path;
use percent_encoding::percent_decode_str;

use crate::Result;

/// An object returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full key of the object
    pub key: String,
    /// Last modified timestamp reported by the backend
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

/// Trait for storage backends
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to a key
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Read data from a key.
    ///
    /// A missing key is reported as `StorageError::NotFound`.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// List objects under a prefix, treating the prefix as whole path segments.
    ///
    /// Keys are returned exactly as they were given to `put`.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Delete a key. Deleting a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Turn an object_store location back into the key it was created from.
///
/// `Path::from` percent-encodes characters it does not allow in a segment
/// (such as `[`, `%` or a `.` segment), so listed locations must be
/// decoded segment by segment before they can be compared with raw keys.
pub(super) fn object_key(location: &Path) -> String {
    location
        .parts()
        .map(|part| percent_decode_str(part.as_ref()).decode_utf8_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
