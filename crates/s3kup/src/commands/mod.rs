pub mod list;
pub mod pull;
pub mod push;

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use s3kup_core::config::validate_backup_name;
use s3kup_core::storage::{create_backend, resolve_endpoint, StorageBackend, StorageBackendConfig};
use s3kup_core::{BackupOptions, Settings};

/// Host used when `--no-ssl` is given without `--endpoint-url`
const DEFAULT_ENDPOINT: &str = "s3.amazonaws.com";

/// Flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// AWS Access Key ID
    #[arg(short = 'i', long, env = "S3KUP_ACCESS_KEY", hide_env_values = true, global = true)]
    pub access_key: Option<String>,

    /// AWS Secret Access Key
    #[arg(short = 's', long, env = "S3KUP_SECRET_KEY", hide_env_values = true, global = true)]
    pub secret_key: Option<String>,

    /// Target S3 bucket
    #[arg(short = 'b', long, env = "S3KUP_BUCKET_NAME", global = true)]
    pub bucket_name: Option<String>,

    /// How the file will be called on the bucket
    #[arg(short = 'n', long, env = "S3KUP_FILE_NAME", global = true)]
    pub file_name: Option<String>,

    /// S3 endpoint, as a host or URL [default: the AWS endpoint for the region]
    #[arg(short = 'e', long, env = "S3KUP_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,

    /// AWS region
    #[arg(long, env = "S3KUP_REGION", global = true)]
    pub region: Option<String>,

    /// Use plain HTTP for an endpoint given without a scheme
    #[arg(long, global = true)]
    pub no_ssl: bool,

    /// Storage URL used instead of the S3 flags (s3://, file://, memory://)
    #[arg(long, env = "S3KUP_STORAGE_URL", global = true)]
    pub storage_url: Option<String>,

    /// Path to a YAML settings file
    #[arg(short = 'c', long, env = "S3KUP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Number of versions to keep when pushing [default: 5]
    #[arg(short = 'k', long, env = "S3KUP_VERSIONS_TO_KEEP", global = true)]
    pub versions_to_keep: Option<usize>,

    /// Only accept 19 digit version tokens when reading versions
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Everything a command needs, resolved from flags and the settings file
pub struct Context {
    pub storage: Arc<dyn StorageBackend>,
    pub backup_name: String,
    pub options: BackupOptions,
}

impl Context {
    pub async fn resolve(args: &GlobalArgs) -> Result<Self> {
        let settings = match &args.config {
            Some(path) => Settings::load(path).await?,
            None => Settings::default(),
        };

        let backup_name = args
            .file_name
            .clone()
            .or(settings.backup_name.clone())
            .unwrap_or_default();
        validate_backup_name(&backup_name)?;

        let mut options = settings.backup.clone().unwrap_or_default();
        if let Some(keep) = args.versions_to_keep {
            options.versions_to_keep = keep;
        }
        options.strict_tokens |= args.strict;

        let storage_config = storage_config(args, settings.storage)?;
        debug!("Using storage {:?}", redacted(&storage_config));
        let storage = create_backend(&storage_config)?;

        Ok(Self {
            storage,
            backup_name,
            options,
        })
    }
}

/// Pick the storage configuration: `--storage-url`, then the S3 flags, then
/// the settings file.
fn storage_config(
    args: &GlobalArgs,
    from_settings: Option<StorageBackendConfig>,
) -> Result<StorageBackendConfig> {
    let config = if let Some(url) = &args.storage_url {
        StorageBackendConfig::from_url(url)?
    } else if let Some(bucket) = &args.bucket_name {
        let endpoint = match (args.endpoint_url.as_deref(), args.no_ssl) {
            (Some(endpoint), no_ssl) => Some(resolve_endpoint(endpoint, !no_ssl)),
            (None, true) => Some(resolve_endpoint(DEFAULT_ENDPOINT, false)),
            (None, false) => None,
        };
        StorageBackendConfig::S3 {
            bucket: bucket.clone(),
            region: None,
            allow_http: endpoint.as_deref().is_some_and(|e| e.starts_with("http://")),
            endpoint,
            access_key: None,
            secret_key: None,
            prefix: None,
        }
    } else if let Some(config) = from_settings {
        config
    } else {
        bail!("bucket name is required");
    };

    let config = with_region(
        config.with_credentials(args.access_key.clone(), args.secret_key.clone()),
        args.region.clone(),
    );

    if let StorageBackendConfig::S3 {
        access_key,
        secret_key,
        ..
    } = &config
    {
        if access_key.is_none() {
            bail!("access key is required");
        }
        if secret_key.is_none() {
            bail!("secret key is required");
        }
    }

    Ok(config)
}

fn with_region(config: StorageBackendConfig, region: Option<String>) -> StorageBackendConfig {
    match (config, region) {
        (StorageBackendConfig::S3 {
            bucket,
            endpoint,
            access_key,
            secret_key,
            prefix,
            allow_http,
            ..
        }, Some(region)) => StorageBackendConfig::S3 {
            bucket,
            region: Some(region),
            endpoint,
            access_key,
            secret_key,
            prefix,
            allow_http,
        },
        (config, _) => config,
    }
}

fn redacted(config: &StorageBackendConfig) -> StorageBackendConfig {
    match config.clone() {
        StorageBackendConfig::S3 {
            bucket,
            region,
            endpoint,
            access_key,
            secret_key,
            prefix,
            allow_http,
        } => StorageBackendConfig::S3 {
            bucket,
            region,
            endpoint,
            access_key: access_key.map(|_| "***".to_string()),
            secret_key: secret_key.map(|_| "***".to_string()),
            prefix,
            allow_http,
        },
        other => other,
    }
}
