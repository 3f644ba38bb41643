//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage backend configuration using tagged enum for type-safe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend")]
pub enum StorageBackendConfig {
    /// AWS S3 or S3-compatible storage (MinIO, Ceph RGW, DigitalOcean Spaces, etc.)
    #[serde(rename = "s3")]
    S3 {
        /// S3 bucket name
        bucket: String,
        /// AWS region (e.g., "us-east-1")
        #[serde(default)]
        region: Option<String>,
        /// Custom endpoint URL (for S3-compatible services like MinIO)
        #[serde(default)]
        endpoint: Option<String>,
        /// Access key ID
        #[serde(default)]
        access_key: Option<String>,
        /// Secret access key
        #[serde(default)]
        secret_key: Option<String>,
        /// Key prefix for all operations
        #[serde(default)]
        prefix: Option<String>,
        /// Allow HTTP (insecure) connections
        #[serde(default)]
        allow_http: bool,
    },

    /// Local filesystem storage
    #[serde(rename = "filesystem")]
    Filesystem {
        /// Base path for storage
        path: PathBuf,
    },

    /// In-memory storage (for testing)
    #[serde(rename = "memory")]
    Memory,
}

impl StorageBackendConfig {
    /// Parse configuration from a URL string
    ///
    /// Supported URL formats:
    /// - `s3://bucket-name?region=us-east-1&endpoint=http://localhost:9000`
    /// - `file:///path/to/data`
    /// - `memory://`
    pub fn from_url(url: &str) -> crate::Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| crate::Error::Config(format!("Invalid storage URL: {}", e)))?;

        let query = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.to_string())
        };

        match parsed.scheme() {
            "s3" | "s3a" => {
                let bucket = parsed.host_str().unwrap_or_default().to_string();
                if bucket.is_empty() {
                    return Err(crate::Error::Config(
                        "S3 storage URL is missing the bucket name".to_string(),
                    ));
                }
                let endpoint = query("endpoint");
                let allow_http = endpoint
                    .as_deref()
                    .is_some_and(|e| e.starts_with("http://"));
                let prefix = Some(parsed.path().trim_matches('/').to_string())
                    .filter(|p| !p.is_empty());

                Ok(Self::S3 {
                    bucket,
                    region: query("region"),
                    endpoint,
                    access_key: None,
                    secret_key: None,
                    prefix,
                    allow_http,
                })
            }
            "file" => Ok(Self::Filesystem {
                path: PathBuf::from(parsed.path()),
            }),
            "memory" => Ok(Self::Memory),
            scheme => Err(crate::Error::Config(format!(
                "Unknown storage scheme: {}",
                scheme
            ))),
        }
    }

    /// Fill in S3 credentials that were not part of the configuration
    pub fn with_credentials(self, access: Option<String>, secret: Option<String>) -> Self {
        match self {
            Self::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
                prefix,
                allow_http,
            } => Self::S3 {
                bucket,
                region,
                endpoint,
                access_key: access_key.or(access),
                secret_key: secret_key.or(secret),
                prefix,
                allow_http,
            },
            other => other,
        }
    }
}

/// Resolve the endpoint URL for an S3 endpoint given as a bare host.
///
/// A value that already carries a scheme is used as-is; otherwise `https://`
/// is prepended, or `http://` when `ssl` is false.
pub fn resolve_endpoint(endpoint: &str, ssl: bool) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else if ssl {
        format!("https://{}", endpoint)
    } else {
        format!("http://{}", endpoint)
    }
}
