//! Configuration structures for backup operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::StorageBackendConfig;
use crate::{Error, Result};

/// Settings file contents.
///
/// Every field is optional so that command-line flags can fill in or
/// override whatever the file leaves out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Storage configuration
    #[serde(default)]
    pub storage: Option<StorageBackendConfig>,

    /// Logical backup name (the key prefix versions are stored under)
    #[serde(default)]
    pub backup_name: Option<String>,

    /// Backup options
    #[serde(default)]
    pub backup: Option<BackupOptions>,
}

impl Settings {
    /// Load settings from a YAML file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Options controlling how backups are written and listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupOptions {
    /// Number of versions to keep after each push
    #[serde(default = "default_versions_to_keep")]
    pub versions_to_keep: usize,

    /// Only accept full-width (19 digit) version tokens when listing
    #[serde(default)]
    pub strict_tokens: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            versions_to_keep: default_versions_to_keep(),
            strict_tokens: false,
        }
    }
}

fn default_versions_to_keep() -> usize {
    5
}

impl BackupOptions {
    pub fn validate(&self) -> Result<()> {
        if self.versions_to_keep == 0 {
            return Err(Error::Config(
                "invalid versions to keep. Must be 1 or greater".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check a backup name before it is used as a key prefix
pub fn validate_backup_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config("file name is required".to_string()));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::Config(format!(
            "file name '{}' must not start or end with '/'",
            name
        )));
    }
    if name.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(Error::Config(format!("file name '{}' is not a valid key", name)));
    }
    Ok(())
}
