//! blobdrop entry point.

mod commands;
mod config;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use blobdrop_blob_storage::Client;
use blobdrop_upload::UploadCoordinator;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "blobdrop", version, about = "Upload files to Azure Blob Storage")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, env = "BLOBDROP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload files in parallel, then show the container's objects.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the container's objects.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so progress output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,blobdrop=debug")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref())?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        configured = cfg.storage.is_configured(),
        container = %cfg.storage.container,
        "starting blobdrop"
    );

    let client = Client::new(cfg.storage).context("building storage client")?;
    let coord = Arc::new(UploadCoordinator::new(Arc::new(client)));

    let ok = match cli.command {
        Command::Upload { files } => commands::upload(coord, &files).await?,
        Command::List { json } => commands::list(coord, json).await?,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
