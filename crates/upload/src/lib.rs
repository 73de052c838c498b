//! Parallel multi-file upload coordinator.
//!
//! This crate implements the **business logic** of an upload batch. It has
//! no UI or HTTP dependencies of its own: the application hands it a
//! [`StorageBackend`] (normally the blob client) and renders from the
//! [`UploadEvent`] stream.
//!
//! # Batch lifecycle
//!
//! 1. **Select**: one pending task per chosen file
//! 2. **Start**: every file is uploaded concurrently, no throttling
//! 3. **Progress**: each callback replaces its task's record by name
//! 4. **Settle**: wait for every task, success or failure
//! 5. **Reset**: clear the flag, the selection and the input key; refresh the gallery

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod types;

// Re-export primary types for convenience.
pub use backend::StorageBackend;
pub use coordinator::UploadCoordinator;
pub use error::UploadError;
pub use types::{BatchSummary, UploadEvent};
