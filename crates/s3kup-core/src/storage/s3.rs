//! S3-compatible storage backend using object_store.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use tracing::{debug, info};

use super::backend::object_key;
use super::{ObjectEntry, StorageBackend};
use crate::error::StorageError;
use crate::{Error, Result};

/// S3 storage backend configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: Option<String>,
    /// Custom endpoint (for S3-compatible services like MinIO)
    pub endpoint: Option<String>,
    /// Access key ID
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Key prefix for all operations
    pub prefix: Option<String>,
    /// Allow HTTP (insecure) connections
    pub allow_http: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: Some("us-east-1".to_string()),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            prefix: None,
            allow_http: false,
        }
    }
}

/// S3 storage backend
pub struct S3Backend {
    store: Arc<dyn ObjectStore>,
    prefix: Option<String>,
}

impl S3Backend {
    /// Create a new S3 backend
    pub fn new(config: S3Config) -> Result<Self> {
        let mut builder = AmazonS3Builder::new().with_bucket_name(&config.bucket);

        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
            // Custom endpoints are addressed path-style
            builder = builder.with_virtual_hosted_style_request(false);
        }

        if let Some(access_key) = &config.access_key_id {
            builder = builder.with_access_key_id(access_key);
        }

        if let Some(secret_key) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|e| {
            Error::Storage(StorageError::Backend(format!(
                "Failed to create S3 client: {}",
                e
            )))
        })?;

        info!(
            "Created S3 backend for bucket: {}, endpoint: {:?}, prefix: {:?}",
            config.bucket, config.endpoint, config.prefix
        );

        Ok(Self {
            store: Arc::new(store),
            prefix: config.prefix,
        })
    }

    /// Build the full path for a key
    fn full_path(&self, key: &str) -> Path {
        match &self.prefix {
            Some(prefix) => Path::from(format!("{}/{}", prefix.trim_end_matches('/'), key)),
            None => Path::from(key),
        }
    }

    /// Remove the configured prefix from a listed location
    fn strip_prefix(&self, location: String) -> String {
        match &self.prefix {
            Some(p) => location
                .strip_prefix(&format!("{}/", p.trim_end_matches('/')))
                .map(str::to_string)
                .unwrap_or(location),
            None => location,
        }
    }
}

fn map_error(op: &str, key: &str, err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { .. } => {
            Error::Storage(StorageError::NotFound(key.to_string()))
        }
        object_store::Error::PermissionDenied { .. } | object_store::Error::Unauthenticated { .. } => {
            Error::Storage(StorageError::PermissionDenied(format!("S3 {} {}: {}", op, key, err)))
        }
        _ => Error::Storage(StorageError::Backend(format!("S3 {} failed: {}", op, err))),
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = self.full_path(key);
        debug!("S3 PUT: {} ({} bytes)", path, data.len());

        self.store
            .put(&path, PutPayload::from_bytes(data))
            .await
            .map_err(|e| map_error("PUT", key, e))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let path = self.full_path(key);
        debug!("S3 GET: {}", path);

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| map_error("GET", key, e))?;

        let bytes = result.bytes().await.map_err(|e| {
            Error::Storage(StorageError::Backend(format!(
                "Failed to read S3 response: {}",
                e
            )))
        })?;

        Ok(bytes)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let full_prefix = self.full_path(prefix);
        debug!("S3 LIST: {}", full_prefix);

        let mut entries = Vec::new();
        let mut stream = self.store.list(Some(&full_prefix));

        while let Some(result) = stream.next().await {
            let meta = result.map_err(|e| map_error("LIST", prefix, e))?;
            entries.push(ObjectEntry {
                key: self.strip_prefix(object_key(&meta.location)),
                last_modified: meta.last_modified,
                size: meta.size as u64,
            });
        }

        Ok(entries)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.full_path(key);
        debug!("S3 DELETE: {}", path);

        match self.store.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(map_error("DELETE", key, e)),
        }
    }
}
