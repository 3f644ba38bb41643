//! Listing the stored versions of a backup.

use std::sync::Arc;
use tracing::debug;

use crate::error::Error;
use crate::storage::StorageBackend;
use crate::version::{sort_versions, Version};
use crate::Result;

/// Lists the versions stored under a backup name, oldest first.
#[derive(Clone)]
pub struct Lister {
    storage: Arc<dyn StorageBackend>,
    strict_tokens: bool,
}

impl Lister {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            strict_tokens: false,
        }
    }

    /// Only accept full-width version tokens
    pub fn with_strict_tokens(mut self, strict: bool) -> Self {
        self.strict_tokens = strict;
        self
    }

    /// List all versions of `backup_name` in ascending token order.
    ///
    /// An unknown backup name yields an empty list. Keys that sit deeper
    /// below the name (`<name>/<child>/<token>`) belong to another backup and
    /// are skipped; any other key that does not parse fails the listing.
    pub async fn list(&self, backup_name: &str) -> Result<Vec<Version>> {
        let prefix = format!("{}/", backup_name);
        let entries = self
            .storage
            .list(backup_name)
            .await
            .map_err(|e| match e {
                Error::Storage(source) => Error::Listing {
                    backup: backup_name.to_string(),
                    source,
                },
                other => other,
            })?;

        let mut versions = Vec::with_capacity(entries.len());
        for entry in &entries {
            let Some(rest) = entry.key.strip_prefix(&prefix) else {
                debug!("Skipping {}: outside of {}", entry.key, prefix);
                continue;
            };
            if rest.contains('/') {
                debug!("Skipping {}: belongs to a nested backup", entry.key);
                continue;
            }
            versions.push(Version::parse(entry, self.strict_tokens)?);
        }

        sort_versions(&mut versions);
        debug!("Found {} versions of {}", versions.len(), backup_name);
        Ok(versions)
    }
}
