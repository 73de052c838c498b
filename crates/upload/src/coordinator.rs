//! Upload coordinator for parallel multi-file batches.
//!
//! Owns the pending task list, launches every upload at once, and keeps one
//! live record per file that readers can snapshot at any time.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use blobdrop_blob_storage::{BlobItem, ProgressFn};
use blobdrop_transfer::{SelectedFile, UploadTask};
use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::backend::StorageBackend;
use crate::error::UploadError;
use crate::types::{BatchSummary, UploadEvent};

/// Capacity of the event channel. Slow subscribers skip ahead.
const EVENT_CAPACITY: usize = 1024;

/// Task records keyed by file name, in selection order.
///
/// Every mutation replaces one whole record under the write lock, so
/// concurrent callbacks never see or clobber a sibling's partial update.
#[derive(Default)]
struct TaskTable {
    tasks: RwLock<Vec<UploadTask>>,
}

impl TaskTable {
    fn snapshot(&self) -> Vec<UploadTask> {
        self.tasks.read().unwrap().clone()
    }

    /// Replaces the record for `name` with whatever `next` returns.
    fn replace(
        &self,
        name: &str,
        next: impl FnOnce(&UploadTask) -> Option<UploadTask>,
    ) -> Option<UploadTask> {
        let mut tasks = self.tasks.write().unwrap();
        let slot = tasks.iter_mut().find(|t| t.name() == name)?;
        let updated = next(slot)?;
        *slot = updated.clone();
        Some(updated)
    }

    fn apply_progress(&self, name: &str, bytes: u64, now: Instant) -> Option<UploadTask> {
        self.replace(name, |task| task.with_progress(bytes, now))
    }
}

/// Coordinates one upload batch at a time against a storage backend.
pub struct UploadCoordinator {
    backend: Arc<dyn StorageBackend>,
    table: Arc<TaskTable>,
    uploading: AtomicBool,
    input_key: RwLock<String>,
    gallery: RwLock<Vec<BlobItem>>,
    events_tx: broadcast::Sender<UploadEvent>,
}

impl UploadCoordinator {
    /// Creates a coordinator around an already-configured backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            table: Arc::new(TaskTable::default()),
            uploading: AtomicBool::new(false),
            input_key: RwLock::new(new_input_key()),
            gallery: RwLock::new(Vec::new()),
            events_tx,
        }
    }

    /// Subscribes to batch events.
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events_tx.subscribe()
    }

    /// Returns `true` if the backend has credentials to work with.
    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Returns `true` while a batch is in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Identity of the file-selection input; changes after every batch so
    /// the same files can be chosen again.
    pub fn input_key(&self) -> String {
        self.input_key.read().unwrap().clone()
    }

    /// Snapshot of the current task records, in selection order.
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.table.snapshot()
    }

    /// Last container listing.
    pub fn gallery(&self) -> Vec<BlobItem> {
        self.gallery.read().unwrap().clone()
    }

    /// Replaces the pending task list with one fresh task per file.
    ///
    /// An empty selection leaves the current list untouched.
    pub fn select_files(&self, files: Vec<SelectedFile>) -> Result<(), UploadError> {
        if files.is_empty() {
            debug!("empty selection ignored");
            return Ok(());
        }

        let mut seen = HashSet::new();
        for file in &files {
            if !seen.insert(file.name.as_str()) {
                return Err(UploadError::DuplicateName(file.name.clone()));
            }
        }

        // The flag is checked under the table lock so a batch cannot start
        // between the check and the replacement.
        let mut tasks = self.table.tasks.write().unwrap();
        if self.is_uploading() {
            return Err(UploadError::AlreadyUploading);
        }
        *tasks = files.into_iter().map(UploadTask::new).collect();
        info!(files = tasks.len(), "files selected");
        Ok(())
    }

    /// Applies a cumulative progress reading to the task named `name`.
    ///
    /// Returns the new record, or `None` if no transferring task has that name.
    pub fn apply_progress(&self, name: &str, bytes: u64, now: Instant) -> Option<UploadTask> {
        self.table.apply_progress(name, bytes, now)
    }

    /// Uploads every pending file concurrently and waits for all of them.
    ///
    /// Each file runs independently: a failure is recorded on that file's
    /// task and never cancels its siblings. Once everything has settled the
    /// flag, the input key and the task list are reset, and the gallery is
    /// refreshed.
    pub async fn start_upload(&self) -> Result<BatchSummary, UploadError> {
        if !self.backend.is_configured() {
            return Err(UploadError::NotConfigured);
        }

        let files: Vec<SelectedFile> = {
            let tasks = self.table.tasks.read().unwrap();
            if tasks.is_empty() {
                return Err(UploadError::NoFiles);
            }
            if self
                .uploading
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                warn!("upload requested while a batch is in flight");
                return Err(UploadError::AlreadyUploading);
            }
            tasks.iter().map(|t| t.file().clone()).collect()
        };

        let started = Instant::now();
        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        info!(files = names.len(), "upload batch started");
        let _ = self.events_tx.send(UploadEvent::BatchStarted {
            files: names.clone(),
        });

        let handles: Vec<_> = files
            .into_iter()
            .map(|file| {
                tokio::spawn(run_task(
                    Arc::clone(&self.backend),
                    Arc::clone(&self.table),
                    self.events_tx.clone(),
                    file,
                ))
            })
            .collect();

        // All-settle: a panicked upload is recorded as a failure.
        for (name, outcome) in names.iter().zip(join_all(handles).await) {
            if let Err(e) = outcome {
                error!(file = %name, error = %e, "upload task aborted");
                self.table.replace(name, |task| {
                    if task.is_terminal() {
                        return None;
                    }
                    let mut next = task.clone();
                    next.fail(format!("upload task aborted: {e}"));
                    Some(next)
                });
            }
        }

        let summary = BatchSummary {
            tasks: self.table.snapshot(),
            elapsed: started.elapsed(),
        };

        {
            let mut tasks = self.table.tasks.write().unwrap();
            tasks.clear();
            *self.input_key.write().unwrap() = new_input_key();
            self.uploading.store(false, Ordering::Release);
        }

        let failed = summary.failed().count();
        info!(
            files = summary.tasks.len(),
            failed,
            bytes = summary.total_bytes(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "upload batch finished"
        );
        let _ = self.events_tx.send(UploadEvent::BatchFinished(summary.clone()));

        if let Err(e) = self.refresh_gallery().await {
            warn!(error = %e, "gallery refresh after batch failed");
        }

        Ok(summary)
    }

    /// Lists the container and stores the result as the current gallery.
    pub async fn refresh_gallery(&self) -> Result<Vec<BlobItem>, UploadError> {
        if !self.backend.is_configured() {
            return Err(UploadError::NotConfigured);
        }

        let items = self.backend.list_objects().await?;
        debug!(objects = items.len(), "gallery refreshed");
        *self.gallery.write().unwrap() = items.clone();
        let _ = self
            .events_tx
            .send(UploadEvent::GalleryRefreshed(items.clone()));
        Ok(items)
    }
}

/// Runs one file's upload to completion and returns its final record.
async fn run_task(
    backend: Arc<dyn StorageBackend>,
    table: Arc<TaskTable>,
    events_tx: broadcast::Sender<UploadEvent>,
    file: SelectedFile,
) -> Option<UploadTask> {
    let name = file.name.clone();

    let begun = table.replace(&name, |task| {
        let mut next = task.clone();
        next.begin(Instant::now());
        Some(next)
    });
    if let Some(task) = begun {
        let _ = events_tx.send(UploadEvent::TaskUpdated(task));
    }

    let on_progress: ProgressFn = {
        let table = Arc::clone(&table);
        let events_tx = events_tx.clone();
        let name = name.clone();
        Arc::new(move |bytes| {
            if let Some(task) = table.apply_progress(&name, bytes, Instant::now()) {
                debug!(
                    file = %name,
                    bytes,
                    percent = task.progress_percent(),
                    speed = task.speed_bytes_per_sec(),
                    "upload progress"
                );
                let _ = events_tx.send(UploadEvent::TaskUpdated(task));
            }
        })
    };

    let result = backend.upload_object(file, on_progress).await;

    let finished = table.replace(&name, |task| {
        let mut next = task.clone();
        match &result {
            Ok(()) => next.complete(),
            Err(e) => next.fail(e.to_string()),
        }
        Some(next)
    })?;

    match &result {
        Ok(()) => {
            info!(file = %name, bytes = finished.file().size, "upload completed");
            let _ = events_tx.send(UploadEvent::TaskCompleted(finished.clone()));
        }
        Err(e) => {
            error!(file = %name, error = %e, "upload failed");
            let _ = events_tx.send(UploadEvent::TaskFailed(finished.clone()));
        }
    }

    Some(finished)
}

fn new_input_key() -> String {
    format!("{:016x}", rand::random::<u64>())
}
