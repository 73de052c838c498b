//! Turning local paths into upload selections.
//!
//! The object name is the file's base name; its content type is inferred
//! from the extension.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::TransferError;
use crate::types::SelectedFile;
use crate::validation::validate_object_name;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Builds a [`SelectedFile`] for every path, in order.
///
/// Fails on the first path that is missing, is not a regular file, or whose
/// base name is not a valid object name.
pub fn select_paths(paths: &[PathBuf]) -> Result<Vec<SelectedFile>, TransferError> {
    paths.iter().map(|p| select_file(p)).collect()
}

/// Builds a [`SelectedFile`] from a single local path.
pub fn select_file(path: &Path) -> Result<SelectedFile, TransferError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(TransferError::NotAFile(path.display().to_string()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TransferError::InvalidName(path.display().to_string()))?;
    validate_object_name(&name)?;

    let content_type = detect_content_type(&name).to_string();
    debug!(file = %name, size = metadata.len(), content_type = %content_type, "file selected");

    Ok(SelectedFile {
        name,
        size: metadata.len(),
        content_type,
        path: path.to_path_buf(),
    })
}

/// Infers a MIME type from a file name's extension.
pub fn detect_content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        Some("txt") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
