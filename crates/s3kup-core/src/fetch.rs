//! Retrieving stored versions.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, StorageError};
use crate::list::Lister;
use crate::storage::StorageBackend;
use crate::version::{Version, VersionToken};
use crate::Result;

/// Fetches the content of the latest or a specific version.
#[derive(Clone)]
pub struct Fetcher {
    storage: Arc<dyn StorageBackend>,
    lister: Lister,
}

impl Fetcher {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            lister: Lister::new(storage.clone()),
            storage,
        }
    }

    /// Use `lister` to resolve the latest version
    pub fn with_lister(mut self, lister: Lister) -> Self {
        self.lister = lister;
        self
    }

    /// Fetch the newest version of `backup_name`.
    pub async fn fetch_latest(&self, backup_name: &str) -> Result<(Version, Bytes)> {
        let versions = self.lister.list(backup_name).await?;
        let latest = versions
            .last()
            .cloned()
            .ok_or_else(|| Error::BackupNotFound(backup_name.to_string()))?;

        info!("Fetching latest version {} of {}", latest.token, backup_name);
        let content = self.storage.get(&latest.path).await.map_err(|e| match e {
            Error::Storage(StorageError::NotFound(_)) => Error::VersionNotFound {
                backup: backup_name.to_string(),
                version: latest.token.to_string(),
            },
            other => other,
        })?;

        Ok((latest, content))
    }

    /// Fetch one exact version, without listing.
    pub async fn fetch_version(&self, backup_name: &str, version: VersionToken) -> Result<Bytes> {
        let key = version.key_for(backup_name);
        debug!("Fetching {}", key);

        self.storage.get(&key).await.map_err(|e| match e {
            Error::Storage(StorageError::NotFound(_)) => Error::VersionNotFound {
                backup: backup_name.to_string(),
                version: version.to_string(),
            },
            other => other,
        })
    }
}
