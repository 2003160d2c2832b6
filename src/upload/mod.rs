//! Chunked video upload pipeline
//!
//! A file is sliced into fixed-size byte ranges and PUT sequentially to the
//! per-module chunk-upload endpoint. Session state survives interruption in
//! the local database, progress is one state machine fed by both the client
//! chunk counter and the server push channel.

pub mod chunker;
pub mod progress;
pub mod session;
pub mod uploader;

pub use chunker::{plan_chunks, ChunkSpec, DEFAULT_CHUNK_SIZE};
pub use progress::{status_topic, ProgressTracker, UploadPhase, VideoUploadStatus};
pub use session::UploadSession;
pub use uploader::{
    CancelHandle, ChunkRequest, ChunkTransport, ChunkTransportError, HttpChunkTransport,
    NullSessionStore, SessionStore, UploadError, VideoUploader, CHUNK_RETRY_DELAY, CHUNK_TIMEOUT,
    MAX_CHUNK_RETRIES,
};
