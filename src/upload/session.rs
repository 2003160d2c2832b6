//! Upload session state
//!
//! One session correlates every chunk request of a single file upload via
//! its `upload_id`. The session is persisted after each confirmed chunk so
//! an interrupted upload resumes from the first missing chunk instead of
//! restarting at zero.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::chunker::{plan_chunks, ChunkSpec};

/// Durable record of one in-flight or interrupted upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub upload_id: Uuid,
    pub module_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub chunk_size: u64,
    /// Uploaded flag per chunk, indexed by `index_number - 1`.
    pub uploaded: Vec<bool>,
    pub created_at: DateTime<Utc>,
}

impl UploadSession {
    /// Start a fresh session with a newly generated `upload_id`.
    pub fn new(
        module_id: impl Into<String>,
        file_name: impl Into<String>,
        file_size: u64,
        chunk_size: u64,
    ) -> Self {
        let total = plan_chunks(file_size, chunk_size).len();
        Self {
            upload_id: Uuid::new_v4(),
            module_id: module_id.into(),
            file_name: file_name.into(),
            file_size,
            chunk_size,
            uploaded: vec![false; total],
            created_at: Utc::now(),
        }
    }

    pub fn total_chunks(&self) -> u32 {
        self.uploaded.len() as u32
    }

    pub fn uploaded_count(&self) -> u32 {
        self.uploaded.iter().filter(|done| **done).count() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.uploaded.iter().all(|done| *done)
    }

    /// Record a confirmed chunk. Out-of-range indices are ignored.
    pub fn mark_uploaded(&mut self, index_number: u32) {
        if index_number >= 1 {
            if let Some(flag) = self.uploaded.get_mut(index_number as usize - 1) {
                *flag = true;
            }
        }
    }

    /// The chunk plan for this session's file.
    pub fn chunks(&self) -> Vec<ChunkSpec> {
        plan_chunks(self.file_size, self.chunk_size)
    }

    /// Chunks still waiting to be uploaded, in order.
    pub fn pending_chunks(&self) -> Vec<ChunkSpec> {
        self.chunks()
            .into_iter()
            .filter(|chunk| {
                !self
                    .uploaded
                    .get(chunk.index_number as usize - 1)
                    .copied()
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Whether a persisted session still matches the file on disk. A changed
    /// size invalidates the session; the upload must restart.
    pub fn matches_file(&self, file_name: &str, file_size: u64) -> bool {
        self.file_name == file_name && self.file_size == file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_has_all_chunks_pending() {
        let session = UploadSession::new("mod-1", "lecture.mp4", 25, 10);
        assert_eq!(session.total_chunks(), 3);
        assert_eq!(session.uploaded_count(), 0);
        assert_eq!(session.pending_chunks().len(), 3);
        assert!(!session.is_complete());
    }

    #[test]
    fn marking_chunks_shrinks_pending_set() {
        let mut session = UploadSession::new("mod-1", "lecture.mp4", 25, 10);
        session.mark_uploaded(1);
        session.mark_uploaded(3);
        let pending: Vec<u32> = session.pending_chunks().iter().map(|c| c.index_number).collect();
        assert_eq!(pending, vec![2]);
        session.mark_uploaded(2);
        assert!(session.is_complete());
    }

    #[test]
    fn out_of_range_marks_ignored() {
        let mut session = UploadSession::new("mod-1", "lecture.mp4", 25, 10);
        session.mark_uploaded(0);
        session.mark_uploaded(99);
        assert_eq!(session.uploaded_count(), 0);
    }

    #[test]
    fn session_detects_changed_file() {
        let session = UploadSession::new("mod-1", "lecture.mp4", 25, 10);
        assert!(session.matches_file("lecture.mp4", 25));
        assert!(!session.matches_file("lecture.mp4", 26));
        assert!(!session.matches_file("other.mp4", 25));
    }

    #[test]
    fn upload_ids_are_unique_per_session() {
        let a = UploadSession::new("mod-1", "a.mp4", 10, 10);
        let b = UploadSession::new("mod-1", "a.mp4", 10, 10);
        assert_ne!(a.upload_id, b.upload_id);
    }
}
