//! Upload error types.

use blobdrop_blob_storage::StorageError;

/// Errors produced by the upload coordinator.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("storage is not configured")]
    NotConfigured,

    #[error("no files selected")]
    NoFiles,

    #[error("an upload is already in progress")]
    AlreadyUploading,

    #[error("duplicate file name in selection: {0}")]
    DuplicateName(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("backend error: {0}")]
    Backend(String),
}

impl UploadError {
    /// Returns `true` for errors rejected locally, before any network call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            UploadError::NoFiles | UploadError::AlreadyUploading | UploadError::DuplicateName(_)
        )
    }
}
