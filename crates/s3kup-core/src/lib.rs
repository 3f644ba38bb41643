//! s3kup Core Library
//!
//! Versioned single-file backups on object storage. Each push stores the
//! content under `<backup name>/<version token>`, where the token is the
//! write time in nanoseconds, and then deletes the oldest versions beyond
//! the configured retention count.

pub mod backup;
pub mod config;
pub mod error;
pub mod fetch;
pub mod list;
pub mod storage;
pub mod version;

pub use backup::{BackupWriter, Pruner, PushReport};
pub use config::{BackupOptions, Settings};
pub use error::{Error, Result, StorageError};
pub use fetch::Fetcher;
pub use list::Lister;
pub use version::{Clock, SystemClock, TokenGenerator, Version, VersionToken};
