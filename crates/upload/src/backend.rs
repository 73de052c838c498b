//! Storage backend trait.
//!
//! `StorageBackend` is what the coordinator uploads through. The blob
//! client implements it below; tests substitute in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use blobdrop_blob_storage::{BlobItem, Client, ProgressFn};
use blobdrop_transfer::SelectedFile;

use crate::error::UploadError;

/// Abstract object-storage service.
pub trait StorageBackend: Send + Sync {
    /// Returns `true` iff an account identifier and a credential are present.
    fn is_configured(&self) -> bool;

    /// Enumerates every object currently in the container.
    fn list_objects(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<BlobItem>, UploadError>> + Send + '_>>;

    /// Transfers one file's full content.
    ///
    /// `on_progress` is called zero or more times with non-decreasing
    /// cumulative byte counts. Resolves once the service acknowledges the
    /// object.
    fn upload_object(
        &self,
        file: SelectedFile,
        on_progress: ProgressFn,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>>;

    /// Readable URL of an object.
    fn object_url(&self, name: &str) -> String;
}

impl StorageBackend for Client {
    fn is_configured(&self) -> bool {
        Client::is_configured(self)
    }

    fn list_objects(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<BlobItem>, UploadError>> + Send + '_>> {
        Box::pin(async move { Ok(self.list_blobs().await?) })
    }

    fn upload_object(
        &self,
        file: SelectedFile,
        on_progress: ProgressFn,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.upload_file(&file.path, &file.name, &file.content_type, on_progress)
                .await?;
            Ok(())
        })
    }

    fn object_url(&self, name: &str) -> String {
        self.blob_url(name)
    }
}
