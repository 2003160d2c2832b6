//! Sequential chunk uploader
//!
//! Chunks are uploaded one at a time, in order, keeping memory bounded to a
//! single chunk and preserving chunk ordering on the server. A failed chunk
//! is retried with linear backoff up to a fixed attempt budget; exhausting
//! the budget aborts the whole upload. Cancellation is cooperative and stops
//! the in-flight request by dropping its future.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::Notify;
use uuid::Uuid;

use super::progress::ProgressTracker;
use super::session::UploadSession;

/// Total attempts per chunk before the upload aborts.
pub const MAX_CHUNK_RETRIES: u32 = 3;
/// Base backoff; the delay after attempt `n` is `n * CHUNK_RETRY_DELAY`.
pub const CHUNK_RETRY_DELAY: Duration = Duration::from_millis(1000);
/// Per-chunk request timeout.
pub const CHUNK_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport-level failure of a single chunk request. Every variant is
/// retried until the attempt budget runs out.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChunkTransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Terminal failures of an upload run.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("lesson has no saved module id yet; save the lesson first")]
    MissingModuleId,
    #[error("file is empty, nothing to upload")]
    EmptyFile,
    #[error("upload cancelled")]
    Cancelled,
    #[error("chunk {index} failed after {attempts} attempts: {source}")]
    ChunkExhausted {
        index: u32,
        attempts: u32,
        source: ChunkTransportError,
    },
    #[error("failed to read source file")]
    Io(#[from] std::io::Error),
    #[error("failed to persist upload session")]
    Persist(#[source] anyhow::Error),
}

/// One chunk request as it goes on the wire.
#[derive(Debug, Clone)]
pub struct ChunkRequest {
    pub module_id: String,
    pub upload_id: Uuid,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub bytes: Vec<u8>,
}

/// Seam between the upload loop and HTTP, so tests can inject failures.
#[async_trait]
pub trait ChunkTransport: Send + Sync {
    async fn send_chunk(&self, request: ChunkRequest) -> Result<(), ChunkTransportError>;
}

/// Durable store for resumable sessions. The uploader saves after every
/// confirmed chunk and clears the session once the file is fully uploaded.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &UploadSession) -> anyhow::Result<()>;
    async fn delete(&self, module_id: &str) -> anyhow::Result<()>;
}

/// In-memory no-op store, for tests and one-shot uploads.
pub struct NullSessionStore;

#[async_trait]
impl SessionStore for NullSessionStore {
    async fn save(&self, _session: &UploadSession) -> anyhow::Result<()> {
        Ok(())
    }

    async fn delete(&self, _module_id: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Cloneable cooperative cancellation handle.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the upload. The in-flight chunk request is dropped; chunks the
    /// server already accepted are not rolled back.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        loop {
            // Register for the wakeup before re-checking the flag, so a
            // cancel between the check and the await is not lost.
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Drives one upload session chunk by chunk.
pub struct VideoUploader<T: ChunkTransport, S: SessionStore> {
    transport: T,
    store: S,
}

impl<T: ChunkTransport, S: SessionStore> VideoUploader<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self { transport, store }
    }

    /// Upload every pending chunk of `session` from the file at `path`.
    ///
    /// Resumes from the session's first missing chunk; a fresh session
    /// uploads everything. `tracker` receives the client-side progress
    /// signal as chunks land.
    pub async fn run(
        &self,
        path: &Path,
        session: &mut UploadSession,
        tracker: &mut ProgressTracker,
        cancel: &CancelHandle,
    ) -> Result<(), UploadError> {
        if session.module_id.is_empty() {
            return Err(UploadError::MissingModuleId);
        }
        if session.file_size == 0 {
            return Err(UploadError::EmptyFile);
        }

        let total = session.total_chunks();
        let mut file = tokio::fs::File::open(path).await?;
        info!(
            "Uploading {} ({} bytes, {} chunks, {} already confirmed) as session {}",
            session.file_name,
            session.file_size,
            total,
            session.uploaded_count(),
            session.upload_id
        );

        for chunk in session.pending_chunks() {
            if cancel.is_cancelled() {
                tracker.cancelled();
                return Err(UploadError::Cancelled);
            }

            file.seek(SeekFrom::Start(chunk.start_size)).await?;
            let mut bytes = vec![0u8; chunk.len() as usize];
            file.read_exact(&mut bytes).await?;

            self.send_with_retry(session, chunk.index_number, total, bytes, tracker, cancel)
                .await?;

            session.mark_uploaded(chunk.index_number);
            tracker.chunk_uploaded(session.uploaded_count(), total);
            self.store
                .save(session)
                .await
                .map_err(UploadError::Persist)?;
            debug!("Chunk {}/{} confirmed", chunk.index_number, total);
        }

        self.store
            .delete(&session.module_id)
            .await
            .map_err(UploadError::Persist)?;
        info!("Upload of {} complete", session.file_name);
        Ok(())
    }

    async fn send_with_retry(
        &self,
        session: &UploadSession,
        chunk_index: u32,
        total_chunks: u32,
        bytes: Vec<u8>,
        tracker: &mut ProgressTracker,
        cancel: &CancelHandle,
    ) -> Result<(), UploadError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let request = ChunkRequest {
                module_id: session.module_id.clone(),
                upload_id: session.upload_id,
                chunk_index,
                total_chunks,
                bytes: bytes.clone(),
            };

            let outcome = tokio::select! {
                _ = cancel.wait() => {
                    tracker.cancelled();
                    return Err(UploadError::Cancelled);
                }
                outcome = self.transport.send_chunk(request) => outcome,
            };

            match outcome {
                Ok(()) => return Ok(()),
                Err(error) => {
                    if attempt >= MAX_CHUNK_RETRIES {
                        tracker.failed(format!(
                            "chunk {chunk_index} failed after {attempt} attempts"
                        ));
                        return Err(UploadError::ChunkExhausted {
                            index: chunk_index,
                            attempts: attempt,
                            source: error,
                        });
                    }
                    let delay = CHUNK_RETRY_DELAY * attempt;
                    warn!(
                        "Chunk {chunk_index} attempt {attempt}/{MAX_CHUNK_RETRIES} failed ({error}), retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Real transport: authenticated multipart PUT per chunk against the
/// chunk-upload endpoint, with the fixed per-request timeout.
pub struct HttpChunkTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpChunkTransport {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl ChunkTransport for HttpChunkTransport {
    async fn send_chunk(&self, request: ChunkRequest) -> Result<(), ChunkTransportError> {
        let url = crate::api::endpoints::chunk_upload(&self.base_url, &request.module_id);
        let part = reqwest::multipart::Part::bytes(request.bytes)
            .file_name(format!("chunk-{}", request.chunk_index));
        let form = reqwest::multipart::Form::new()
            .text("chunk_index", request.chunk_index.to_string())
            .text("total_chunks", request.total_chunks.to_string())
            .text("upload_id", request.upload_id.to_string())
            .part("file", part);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .timeout(CHUNK_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ChunkTransportError::Timeout
                } else {
                    ChunkTransportError::Network(error.to_string())
                }
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChunkTransportError::Status(response.status().as_u16()))
        }
    }
}
