use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Context, GlobalArgs};

#[derive(Parser)]
#[command(name = "s3kup")]
#[command(about = "Simple single file S3 backup tool")]
#[command(
    long_about = "An easy way to back up any file or command output to an S3 bucket.\n\nContent piped into s3kup is stored as a new timestamped version; the oldest versions beyond --versions-to-keep are deleted."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the piped input as a new version (the default command)
    Push,

    /// List remote stored versions
    List,

    /// Print the contents of the latest, or the given, version to STDOUT
    Pull {
        /// Version to fetch (defaults to the latest)
        version: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // STDOUT carries pulled content, so logs go to STDERR
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = Context::resolve(&cli.global).await?;

    match cli.command.unwrap_or(Commands::Push) {
        Commands::Push => commands::push::run(&ctx).await?,
        Commands::List => commands::list::run(&ctx).await?,
        Commands::Pull { version } => commands::pull::run(&ctx, version.as_deref()).await?,
    }

    Ok(())
}
