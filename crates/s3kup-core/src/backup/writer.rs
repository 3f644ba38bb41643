//! Writing new versions.

use bytes::Bytes;
use std::sync::Arc;
use tracing::info;

use super::pruner::Pruner;
use crate::config::{validate_backup_name, BackupOptions};
use crate::list::Lister;
use crate::storage::StorageBackend;
use crate::version::{TokenGenerator, Version, VersionToken};
use crate::Result;

/// Outcome of a successful push
#[derive(Debug, Clone)]
pub struct PushReport {
    /// Token of the newly stored version
    pub version: VersionToken,
    /// Storage key of the newly stored version
    pub key: String,
    /// Old versions deleted by retention, oldest first
    pub pruned: Vec<Version>,
}

/// Stores new versions of a backup and applies retention.
pub struct BackupWriter {
    storage: Arc<dyn StorageBackend>,
    lister: Lister,
    pruner: Pruner,
    tokens: TokenGenerator,
    versions_to_keep: usize,
}

impl BackupWriter {
    pub fn new(storage: Arc<dyn StorageBackend>, options: &BackupOptions) -> Result<Self> {
        Self::with_tokens(storage, options, TokenGenerator::system())
    }

    /// Create a writer that takes version tokens from `tokens`
    pub fn with_tokens(
        storage: Arc<dyn StorageBackend>,
        options: &BackupOptions,
        tokens: TokenGenerator,
    ) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            lister: Lister::new(storage.clone()).with_strict_tokens(options.strict_tokens),
            pruner: Pruner::new(storage.clone()),
            storage,
            tokens,
            versions_to_keep: options.versions_to_keep,
        })
    }

    /// Store `content` as a new version of `backup_name`, then prune.
    ///
    /// The new version is written before anything is listed or deleted. If
    /// listing or pruning fails afterwards the error is returned but the new
    /// version stays in place.
    pub async fn store(&self, backup_name: &str, content: Bytes) -> Result<PushReport> {
        validate_backup_name(backup_name)?;

        info!("Started backup of {}", backup_name);
        let version = self.tokens.next_token();
        let key = version.key_for(backup_name);
        info!("File version: {} ({} bytes)", version, content.len());

        self.storage.put(&key, content).await?;

        info!(
            "Looking for old versions to delete, keeping {}",
            self.versions_to_keep
        );
        let stored = self.lister.list(backup_name).await?;
        let pruned = self.pruner.prune(&stored, self.versions_to_keep).await?;

        Ok(PushReport {
            version,
            key,
            pruned,
        })
    }
}
