//! Version tokens and the records built from listed storage keys.
//!
//! Every stored object lives at `<backup name>/<version token>`, where the
//! token is the write time in nanoseconds since the Unix epoch. That key
//! scheme is the only index: there is no manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::storage::ObjectEntry;
use crate::{Error, Result};

/// Number of digits in a nanosecond timestamp token (valid until the year 2286).
pub const TOKEN_WIDTH: usize = 19;

/// Identifier of one stored version, ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionToken(u64);

impl VersionToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Storage key of this version under `backup_name`
    pub fn key_for(&self, backup_name: &str) -> String {
        format!("{}/{}", backup_name, self.0)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Config(
                "Invalid version format. It can only contain numbers".to_string(),
            ));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| Error::Config(format!("Version '{}' is out of range", s)))
    }
}

/// One stored snapshot of a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Full storage key, `<backup_name>/<token>`
    pub path: String,
    pub backup_name: String,
    pub token: VersionToken,
    /// As reported by the backend when listed; informational only
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

impl Version {
    /// Build a version from a listed object.
    ///
    /// The key must end in `/<digits>`. With `strict`, the token must also be
    /// exactly [`TOKEN_WIDTH`] digits long.
    pub fn parse(entry: &ObjectEntry, strict: bool) -> Result<Self> {
        let malformed = || Error::MalformedKey {
            key: entry.key.clone(),
        };

        let (backup_name, raw_token) = entry.key.rsplit_once('/').ok_or_else(malformed)?;

        if backup_name.is_empty()
            || raw_token.is_empty()
            || !raw_token.bytes().all(|b| b.is_ascii_digit())
            || (strict && raw_token.len() != TOKEN_WIDTH)
        {
            return Err(malformed());
        }

        let token = raw_token.parse::<u64>().map_err(|_| malformed())?;

        Ok(Self {
            path: entry.key.clone(),
            backup_name: backup_name.to_string(),
            token: VersionToken(token),
            last_modified: entry.last_modified,
            size: entry.size,
        })
    }
}

/// Sort versions oldest first by token.
///
/// The sort is stable, so versions with equal tokens keep their listing order.
pub fn sort_versions(versions: &mut [Version]) {
    versions.sort_by_key(|v| v.token);
}

/// Source of wall-clock time for version tokens
pub trait Clock: Send + Sync {
    /// Nanoseconds since the Unix epoch
    fn now_nanos(&self) -> u64;
}

/// The system wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(now.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Issues version tokens from a clock.
///
/// Tokens from one generator are strictly increasing even when the clock
/// stalls or steps backwards: the next token is never below the previous
/// one plus one.
pub struct TokenGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl TokenGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn next_token(&self) -> VersionToken {
        let now = self.clock.now_nanos();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        VersionToken(now.max(previous.saturating_add(1)))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::system()
    }
}
