//! Azure Blob Storage client for blobdrop.
//!
//! Provides an async client for the Blob service REST API, authenticated
//! with a pre-issued SAS token: container listing, single-request streaming
//! uploads with byte-level progress, and readable object URLs.

pub mod client;
pub mod config;
pub mod types;

pub use client::{Client, ProgressFn, StorageError};
pub use config::{DEFAULT_CONTAINER, StorageConfig};
pub use types::BlobItem;
