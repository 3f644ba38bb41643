//! Error types for the s3kup core library.

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the s3kup library.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameters, caught before any backend call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A listed key does not have the `<backup name>/<version>` shape
    #[error("Remote version '{key}' can't be parsed")]
    MalformedKey { key: String },

    /// Listing the versions of a backup failed
    #[error("Failed to list versions of '{backup}': {source}")]
    Listing {
        backup: String,
        #[source]
        source: StorageError,
    },

    /// Pruning stopped at the first failed delete
    #[error("Failed to delete old version '{key}' after deleting {deleted}: {source}")]
    Deletion {
        key: String,
        deleted: usize,
        #[source]
        source: StorageError,
    },

    /// No version exists under the backup name
    #[error("There's no backup named '{0}' on this bucket")]
    BackupNotFound(String),

    /// The requested version does not exist
    #[error("Could not find version '{version}' of backup '{backup}'")]
    VersionNotFound { backup: String, version: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the requested backup or version is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::BackupNotFound(_)
                | Error::VersionNotFound { .. }
                | Error::Storage(StorageError::NotFound(_))
        )
    }
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Storage backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
