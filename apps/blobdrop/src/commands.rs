//! CLI command handlers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use blobdrop_transfer::select_paths;
use blobdrop_upload::{UploadCoordinator, UploadEvent};
use tokio::sync::broadcast::error::RecvError;

use crate::view;

const NOT_CONFIGURED: &str = "Storage is not configured.";

/// Uploads `paths` as one batch, rendering progress as it arrives.
///
/// Returns `true` if every file was uploaded.
pub async fn upload(coord: Arc<UploadCoordinator>, paths: &[PathBuf]) -> anyhow::Result<bool> {
    if !coord.is_configured() {
        println!("{NOT_CONFIGURED}");
        return Ok(false);
    }

    let files = select_paths(paths).context("reading selected files")?;
    if let Err(e) = coord.select_files(files) {
        if e.is_input_error() {
            println!("{e}");
            return Ok(false);
        }
        return Err(e.into());
    }

    let mut events = coord.subscribe();
    let renderer = tokio::spawn(async move {
        // Last percent printed per file, to print one line per step.
        let mut shown: HashMap<String, u8> = HashMap::new();
        loop {
            match events.recv().await {
                Ok(UploadEvent::TaskUpdated(task)) => {
                    let percent = task.progress_percent();
                    if shown.insert(task.name().to_string(), percent) != Some(percent) {
                        println!("{}", view::render_task(&task));
                    }
                }
                Ok(UploadEvent::TaskCompleted(task)) => {
                    println!("{}", view::render_task(&task));
                }
                Ok(UploadEvent::BatchFinished(_)) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "renderer lagged behind progress events");
                }
            }
        }
    });

    let summary = coord.start_upload().await?;
    let _ = renderer.await;

    // Failed files are listed from the summary, not from events.
    for line in view::render_report(&summary) {
        println!("{line}");
    }

    print_gallery(&coord);
    Ok(summary.all_succeeded())
}

/// Lists the container's objects.
pub async fn list(coord: Arc<UploadCoordinator>, json: bool) -> anyhow::Result<bool> {
    if !coord.is_configured() {
        println!("{NOT_CONFIGURED}");
        return Ok(false);
    }

    let items = coord.refresh_gallery().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_gallery(&coord);
    }
    Ok(true)
}

fn print_gallery(coord: &UploadCoordinator) {
    let items = coord.gallery();
    if items.is_empty() {
        return;
    }
    println!();
    for line in view::render_gallery(&items) {
        println!("{line}");
    }
}
