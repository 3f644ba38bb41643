use anyhow::Result;
use tokio::io::AsyncWriteExt;

use s3kup_core::{Fetcher, Lister, VersionToken};

use super::Context;

pub async fn run(ctx: &Context, version: Option<&str>) -> Result<()> {
    let content = fetch(ctx, version).await?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&content).await?;
    stdout.flush().await?;
    Ok(())
}

/// Fetch the requested version, or the latest one when none is given
pub async fn fetch(ctx: &Context, version: Option<&str>) -> Result<bytes::Bytes> {
    let lister = Lister::new(ctx.storage.clone()).with_strict_tokens(ctx.options.strict_tokens);
    let fetcher = Fetcher::new(ctx.storage.clone()).with_lister(lister);

    let content = match version {
        Some(raw) => {
            let token: VersionToken = raw.parse()?;
            fetcher.fetch_version(&ctx.backup_name, token).await?
        }
        None => fetcher.fetch_latest(&ctx.backup_name).await?.1,
    };
    Ok(content)
}
