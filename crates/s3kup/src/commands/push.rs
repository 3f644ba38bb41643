use anyhow::{bail, Context as _, Result};
use bytes::Bytes;
use std::io::IsTerminal;
use tokio::io::AsyncReadExt;
use tracing::info;

use s3kup_core::{BackupWriter, PushReport};

use super::Context;

pub async fn run(ctx: &Context) -> Result<()> {
    // Checked before stdin is drained
    ctx.options.validate()?;
    let content = read_input().await?;
    let report = push(ctx, content).await?;

    info!(
        "Stored {} ({} old versions deleted)",
        report.key,
        report.pruned.len()
    );
    Ok(())
}

pub async fn push(ctx: &Context, content: Bytes) -> Result<PushReport> {
    let writer = BackupWriter::new(ctx.storage.clone(), &ctx.options)?;
    let report = writer.store(&ctx.backup_name, content).await?;
    Ok(report)
}

/// Read the whole of standard input, which must not be a terminal
async fn read_input() -> Result<Bytes> {
    if std::io::stdin().is_terminal() {
        bail!("not using pipeline: pipe the content to back up into s3kup");
    }

    let mut buf = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut buf)
        .await
        .context("Failed to read standard input")?;
    Ok(Bytes::from(buf))
}
