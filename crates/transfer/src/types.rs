use std::path::PathBuf;

use tokio::time::Instant;

use crate::progress::{Sample, estimate};

/// A file chosen for upload: where its bytes live and how it will be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Object name in the container. Unique within a batch.
    pub name: String,
    /// Size in bytes at selection time.
    pub size: u64,
    /// MIME type sent as the object's `Content-Type`.
    pub content_type: String,
    /// Local source of the file bytes.
    pub path: PathBuf,
}

/// Lifecycle of a single upload task within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Transferring,
    Completed,
    Failed { error: String },
}

/// Progress record for one file's transfer.
///
/// Records are replaced wholesale: [`with_progress`](Self::with_progress)
/// returns the next record instead of mutating, so readers never observe a
/// half-applied update.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    file: SelectedFile,
    status: TaskStatus,
    bytes_transferred: u64,
    speed_bytes_per_sec: f64,
    eta_seconds: f64,
    started_at: Option<Instant>,
    last_sample: Option<Sample>,
}

impl UploadTask {
    /// Creates a pending task with zeroed progress and no timestamps.
    pub fn new(file: SelectedFile) -> Self {
        Self {
            file,
            status: TaskStatus::Pending,
            bytes_transferred: 0,
            speed_bytes_per_sec: 0.0,
            eta_seconds: 0.0,
            started_at: None,
            last_sample: None,
        }
    }

    /// Moves the task to `Transferring` and seeds the first sample at `now`.
    pub fn begin(&mut self, now: Instant) {
        self.status = TaskStatus::Transferring;
        self.bytes_transferred = 0;
        self.speed_bytes_per_sec = 0.0;
        self.eta_seconds = 0.0;
        self.started_at = Some(now);
        self.last_sample = Some(Sample::new(0, now));
    }

    /// Returns the record that results from a cumulative `bytes` reading at `now`.
    ///
    /// Returns `None` unless the task is transferring. The reading is clamped
    /// to the file size and never moves `bytes_transferred` backwards.
    pub fn with_progress(&self, bytes: u64, now: Instant) -> Option<UploadTask> {
        if self.status != TaskStatus::Transferring {
            return None;
        }

        let bytes = bytes.min(self.file.size).max(self.bytes_transferred);
        let previous = self.last_sample.unwrap_or_else(|| {
            Sample::new(self.bytes_transferred, self.started_at.unwrap_or(now))
        });
        let current = Sample::new(bytes, now);
        let est = estimate(previous, current, self.file.size);

        Some(UploadTask {
            file: self.file.clone(),
            status: TaskStatus::Transferring,
            bytes_transferred: bytes,
            speed_bytes_per_sec: est.speed_bytes_per_sec,
            eta_seconds: est.eta_seconds,
            started_at: self.started_at,
            last_sample: Some(current),
        })
    }

    /// Marks the transfer as acknowledged complete.
    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
        self.bytes_transferred = self.file.size;
        self.eta_seconds = 0.0;
    }

    /// Marks the transfer as failed, keeping the last reported progress.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed {
            error: error.into(),
        };
        self.speed_bytes_per_sec = 0.0;
        self.eta_seconds = 0.0;
    }

    /// Percentage of the file transferred, `round(bytes / size * 100)`.
    ///
    /// Empty files report 0 until completed, then 100.
    pub fn progress_percent(&self) -> u8 {
        if self.file.size == 0 {
            return if self.status == TaskStatus::Completed {
                100
            } else {
                0
            };
        }
        let pct = (self.bytes_transferred as f64 / self.file.size as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    pub fn speed_bytes_per_sec(&self) -> f64 {
        self.speed_bytes_per_sec
    }

    pub fn eta_seconds(&self) -> f64 {
        self.eta_seconds
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    /// Returns `true` once the task has completed or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TaskStatus::Completed | TaskStatus::Failed { .. })
    }

    /// Returns the failure message, if the task failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}
