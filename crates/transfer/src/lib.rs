//! Upload task model, instantaneous progress estimation and file selection.
//!
//! Everything here is transport-agnostic: the coordinator in
//! `blobdrop-upload` owns the tasks, the storage client only ever sees
//! byte counts.

mod progress;
mod selection;
mod types;
mod validation;

pub use progress::{ProgressEstimate, Sample, estimate};
pub use selection::{DEFAULT_CONTENT_TYPE, detect_content_type, select_file, select_paths};
pub use types::{SelectedFile, TaskStatus, UploadTask};
pub use validation::{MAX_OBJECT_NAME_LEN, validate_object_name};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("invalid object name: {0}")]
    InvalidName(String),
}
