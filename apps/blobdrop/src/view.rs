//! Terminal rendering for upload progress and the container gallery.

use blobdrop_blob_storage::BlobItem;
use blobdrop_transfer::{TaskStatus, UploadTask};
use blobdrop_upload::BatchSummary;

/// Width of the progress bar in cells.
const BAR_WIDTH: usize = 30;

/// Formats a transfer rate as MB/s with two decimals.
pub fn format_speed(bytes_per_sec: f64) -> String {
    format!("{:.2} MB/s", bytes_per_sec / 1024.0 / 1024.0)
}

/// Formats an ETA as whole seconds.
pub fn format_eta(seconds: f64) -> String {
    format!("{} sec", seconds.round() as u64)
}

/// Renders a proportional bar for `percent` (clamped to 100).
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One status line for a task.
///
/// Speed and ETA only appear once a non-zero speed has been measured.
pub fn render_task(task: &UploadTask) -> String {
    let percent = task.progress_percent();
    let mut line = format!("{} - {}% {}", task.name(), percent, progress_bar(percent));

    match task.status() {
        TaskStatus::Failed { error } => {
            line.push_str(&format!(" FAILED: {error}"));
        }
        TaskStatus::Completed => line.push_str(" done"),
        TaskStatus::Pending | TaskStatus::Transferring => {
            if task.speed_bytes_per_sec() > 0.0 {
                line.push_str(&format!(
                    " | Speed: {} | ETA: {}",
                    format_speed(task.speed_bytes_per_sec()),
                    format_eta(task.eta_seconds())
                ));
            }
        }
    }

    line
}

/// End-of-batch report: a count line, then one line per failed file.
pub fn render_report(summary: &BatchSummary) -> Vec<String> {
    let failed: Vec<&UploadTask> = summary.failed().collect();
    let mut lines = vec![format!(
        "Uploaded {} of {} file(s) in {:.1}s",
        summary.tasks.len() - failed.len(),
        summary.tasks.len(),
        summary.elapsed.as_secs_f64()
    )];
    lines.extend(failed.into_iter().map(render_task));
    lines
}

/// Gallery lines: one `name  url` row per object.
pub fn render_gallery(items: &[BlobItem]) -> Vec<String> {
    let width = items.iter().map(|i| i.name.len()).max().unwrap_or(0);
    items
        .iter()
        .map(|i| format!("{:<width$}  {}", i.name, i.url))
        .collect()
}
