//! Data types for the upload flow.

use std::time::Duration;

use blobdrop_blob_storage::BlobItem;
use blobdrop_transfer::{TaskStatus, UploadTask};

/// Event emitted while a batch runs, for the presentation layer.
///
/// Task events carry a full snapshot of the task record.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A batch was launched with these file names.
    BatchStarted { files: Vec<String> },
    /// A task began transferring or reported progress.
    TaskUpdated(UploadTask),
    /// The service acknowledged a task's object.
    TaskCompleted(UploadTask),
    /// A task's upload was rejected.
    TaskFailed(UploadTask),
    /// Every task settled; the selection has been reset.
    BatchFinished(BatchSummary),
    /// The container listing was refreshed.
    GalleryRefreshed(Vec<BlobItem>),
}

/// Final state of every task in a settled batch, in selection order.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub tasks: Vec<UploadTask>,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Returns the task for `name`, if it was part of the batch.
    pub fn task(&self, name: &str) -> Option<&UploadTask> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    pub fn completed(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks
            .iter()
            .filter(|t| *t.status() == TaskStatus::Completed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter().filter(|t| t.error().is_some())
    }

    /// Returns `true` if every task completed.
    pub fn all_succeeded(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn total_bytes(&self) -> u64 {
        self.completed().map(|t| t.file().size).sum()
    }
}
