//! Blob service client.
//!
//! Async HTTP client using `reqwest`, authenticated by appending the SAS
//! token to every request URL.

use std::path::Path;
use std::sync::Arc;

use futures_util::TryStreamExt;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::config::StorageConfig;
use crate::types::{BlobItem, parse_listing};

/// REST API version sent with every request.
pub const API_VERSION: &str = "2021-08-06";

/// Read buffer size for streamed uploads; also the progress granularity.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

const MS_VERSION: &str = "x-ms-version";
const MS_BLOB_TYPE: &str = "x-ms-blob-type";

/// Characters escaped inside an object name path segment (`/` is kept).
const NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Callback invoked with the cumulative number of bytes sent.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Errors from the blob client.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage is not configured")]
    NotConfigured,
}

/// Blob container client.
pub struct Client {
    http: reqwest::Client,
    config: StorageConfig,
}

impl Client {
    /// Creates a client for the container described by `config`.
    ///
    /// An unconfigured `config` is accepted; every request then fails with
    /// [`StorageError::NotConfigured`] without touching the network.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(MS_VERSION),
            HeaderValue::from_static(API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Returns `true` iff an account name and SAS token are both present.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Readable URL of an object. Never contains the SAS token.
    pub fn blob_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.config.container_url(),
            utf8_percent_encode(name, NAME_ENCODE_SET)
        )
    }

    /// Lists every object in the container, following continuation markers.
    pub async fn list_blobs(&self) -> Result<Vec<BlobItem>, StorageError> {
        self.ensure_configured()?;

        let mut items = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut url = format!(
                "{}?restype=container&comp=list",
                self.config.container_url()
            );
            if let Some(m) = &marker {
                url.push_str("&marker=");
                url.push_str(&utf8_percent_encode(m, NON_ALPHANUMERIC).to_string());
            }
            let url = self.sign(url);

            let resp = self.http.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(StorageError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page = parse_listing(&resp.text().await?)?;
            let next = page.continuation().map(str::to_string);
            items.extend(page.blobs.blob.into_iter().map(|entry| BlobItem {
                url: self.blob_url(&entry.name),
                name: entry.name,
                size: entry.properties.content_length,
                content_type: entry.properties.content_type.filter(|c| !c.is_empty()),
            }));

            debug!(objects = items.len(), more = next.is_some(), "listed blob page");
            match next {
                Some(m) => marker = Some(m),
                None => break,
            }
        }

        Ok(items)
    }

    /// Uploads a local file as a block blob in a single `Put Blob` request.
    ///
    /// The body is streamed from disk; `on_progress` receives the cumulative
    /// byte count each time a chunk is handed to the transport.
    pub async fn upload_file(
        &self,
        path: &Path,
        name: &str,
        content_type: &str,
        on_progress: ProgressFn,
    ) -> Result<(), StorageError> {
        self.ensure_configured()?;

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let mut sent: u64 = 0;
        let body = ReaderStream::with_capacity(file, UPLOAD_CHUNK_SIZE).inspect_ok(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(sent);
        });

        let url = self.sign(self.blob_url(name));
        debug!(blob = %name, size, content_type = %content_type, "put blob");

        let resp = self
            .http
            .put(&url)
            .header(MS_BLOB_TYPE, "BlockBlob")
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), StorageError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(StorageError::NotConfigured)
        }
    }

    /// Appends the SAS token to `url`.
    fn sign(&self, url: String) -> String {
        let sas = self.config.sas_query();
        if sas.is_empty() {
            return url;
        }
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}{sas}")
    }
}
