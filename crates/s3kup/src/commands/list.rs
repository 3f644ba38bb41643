use anyhow::Result;
use chrono::{DateTime, Utc};

use s3kup_core::{Lister, Version};

use super::Context;

pub async fn run(ctx: &Context) -> Result<()> {
    let lister = Lister::new(ctx.storage.clone()).with_strict_tokens(ctx.options.strict_tokens);
    let versions = lister.list(&ctx.backup_name).await?;

    for line in render(&versions) {
        println!("{}", line);
    }
    Ok(())
}

fn render(versions: &[Version]) -> Vec<String> {
    if versions.is_empty() {
        return vec!["No versions found".to_string()];
    }
    versions.iter().map(format_version).collect()
}

fn format_version(version: &Version) -> String {
    format!(
        "* {}\t{:>10}\t{}",
        version.token,
        format_bytes(version.size),
        format_time(&version.last_modified)
    )
}

/// ANSI C `asctime` layout, e.g. `Mon Jan  2 15:04:05 2006`
fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
