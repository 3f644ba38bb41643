//! Retention pruning of old versions.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Error;
use crate::storage::StorageBackend;
use crate::version::Version;
use crate::Result;

/// Number of versions to delete so that at most `keep` remain
pub fn surplus(count: usize, keep: usize) -> usize {
    count.saturating_sub(keep)
}

/// Deletes the oldest versions beyond a retention count.
#[derive(Clone)]
pub struct Pruner {
    storage: Arc<dyn StorageBackend>,
}

impl Pruner {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Delete the surplus oldest entries of `versions`, which must be sorted
    /// oldest first.
    ///
    /// Deletes run one at a time, oldest first, and stop at the first
    /// failure. Versions deleted before the failure stay deleted. Returns the
    /// deleted versions.
    pub async fn prune(&self, versions: &[Version], keep: usize) -> Result<Vec<Version>> {
        let extra = surplus(versions.len(), keep);
        if extra == 0 {
            debug!(
                "{} versions stored, keeping up to {}: nothing to prune",
                versions.len(),
                keep
            );
            return Ok(Vec::new());
        }

        info!("{} old versions will be deleted", extra);

        let mut deleted = Vec::with_capacity(extra);
        for version in &versions[..extra] {
            self.storage
                .delete(&version.path)
                .await
                .map_err(|e| match e {
                    Error::Storage(source) => Error::Deletion {
                        key: version.path.clone(),
                        deleted: deleted.len(),
                        source,
                    },
                    other => other,
                })?;
            info!("Deleted version {}", version.token);
            deleted.push(version.clone());
        }

        Ok(deleted)
    }
}
