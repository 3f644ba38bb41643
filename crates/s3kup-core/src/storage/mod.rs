//! Storage backend abstraction and implementations.
//!
//! The backup engine only talks to [`StorageBackend`]. Available backends:
//!
//! - **S3**: AWS S3 and S3-compatible services (MinIO, Ceph RGW, etc.)
//! - **Filesystem**: Local filesystem storage
//! - **Memory**: In-memory storage (for testing)

mod backend;
mod config;
mod filesystem;
mod memory;
mod s3;

pub use backend::{ObjectEntry, StorageBackend};
pub use config::{resolve_endpoint, StorageBackendConfig};
pub use filesystem::FilesystemBackend;
pub use memory::MemoryBackend;
pub use s3::{S3Backend, S3Config};

use crate::Result;
use std::sync::Arc;

/// Create a storage backend from configuration.
///
/// # Example
///
/// ```rust,ignore
/// use s3kup_core::storage::{create_backend, StorageBackendConfig};
///
/// let backend = create_backend(&StorageBackendConfig::Memory)?;
/// ```
pub fn create_backend(config: &StorageBackendConfig) -> Result<Arc<dyn StorageBackend>> {
    match config {
        StorageBackendConfig::S3 {
            bucket,
            region,
            endpoint,
            access_key,
            secret_key,
            prefix,
            allow_http,
        } => {
            let s3_config = S3Config {
                bucket: bucket.clone(),
                region: region.clone().or_else(|| S3Config::default().region),
                endpoint: endpoint.clone(),
                access_key_id: access_key.clone(),
                secret_access_key: secret_key.clone(),
                prefix: prefix.clone(),
                allow_http: *allow_http,
            };
            Ok(Arc::new(S3Backend::new(s3_config)?))
        }

        StorageBackendConfig::Filesystem { path } => {
            Ok(Arc::new(FilesystemBackend::new(path.clone())))
        }

        StorageBackendConfig::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}
