//! Single upload-progress state machine
//!
//! Two signals drive one machine: the client-side chunk counter while bytes
//! are leaving this process, and the server push events once the backend
//! takes over with processing/transcoding. Phases only move forward; a late
//! or duplicated push event can never drag the machine backwards.

use serde::{Deserialize, Serialize};

/// Named phases of one video upload, start to finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UploadPhase {
    /// Chunks are being PUT from this client. `percent` is chunk-based.
    Uploading { percent: u8 },
    /// All chunks accepted; the backend is assembling/validating the file.
    Processing { percent: u8 },
    /// The backend is transcoding the assembled video.
    Transcoding { percent: u8 },
    Completed,
    Failed { message: String },
    Cancelled,
}

impl UploadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadPhase::Completed | UploadPhase::Failed { .. } | UploadPhase::Cancelled
        )
    }

    fn rank(&self) -> u8 {
        match self {
            UploadPhase::Uploading { .. } => 0,
            UploadPhase::Processing { .. } => 1,
            UploadPhase::Transcoding { .. } => 2,
            UploadPhase::Completed => 3,
            UploadPhase::Failed { .. } => 3,
            UploadPhase::Cancelled => 3,
        }
    }
}

/// Push-channel payload for `video_upload_status.{module_id}` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploadStatus {
    pub status: String,
    #[serde(default)]
    pub progress: u8,
}

/// Event topic the backend publishes upload status on, keyed by module.
pub fn status_topic(module_id: &str) -> String {
    format!("video_upload_status.{module_id}")
}

/// Folds both progress signals into one [`UploadPhase`].
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    phase: UploadPhase,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Uploading { percent: 0 },
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Client signal: `uploaded` of `total` chunks confirmed.
    ///
    /// Completing the final chunk forces 100 %; the move to `Processing`
    /// comes from the server signal once the backend takes over.
    pub fn chunk_uploaded(&mut self, uploaded: u32, total: u32) {
        if self.phase.is_terminal() {
            return;
        }
        if total > 0 && uploaded >= total {
            self.advance(UploadPhase::Uploading { percent: 100 });
            return;
        }
        let percent = if total == 0 {
            0
        } else {
            ((uploaded as u64 * 100) / total as u64) as u8
        };
        if let UploadPhase::Uploading { percent: current } = self.phase {
            if percent > current {
                self.phase = UploadPhase::Uploading { percent };
            }
        }
    }

    /// Server signal: a push event for this module arrived.
    pub fn server_event(&mut self, event: &VideoUploadStatus) {
        let candidate = match event.status.to_ascii_lowercase().as_str() {
            "uploading" => UploadPhase::Uploading { percent: event.progress.min(100) },
            "processing" | "pending" => UploadPhase::Processing { percent: event.progress.min(100) },
            "transcoding" => UploadPhase::Transcoding { percent: event.progress.min(100) },
            "completed" | "done" => UploadPhase::Completed,
            "failed" | "error" => UploadPhase::Failed {
                message: format!("server reported upload failure for status '{}'", event.status),
            },
            other => {
                log::debug!("Ignoring unknown upload status '{other}'");
                return;
            }
        };
        self.advance(candidate);
    }

    /// Client-initiated cancellation wins over everything but completion.
    pub fn cancelled(&mut self) {
        if !matches!(self.phase, UploadPhase::Completed) {
            self.phase = UploadPhase::Cancelled;
        }
    }

    /// Terminal failure from the chunk loop.
    pub fn failed(&mut self, message: impl Into<String>) {
        if !self.phase.is_terminal() {
            self.phase = UploadPhase::Failed { message: message.into() };
        }
    }

    /// Move forward only. Within the same phase, percent is monotonic.
    fn advance(&mut self, candidate: UploadPhase) {
        if self.phase.is_terminal() {
            return;
        }
        match candidate.rank().cmp(&self.phase.rank()) {
            std::cmp::Ordering::Greater => self.phase = candidate,
            std::cmp::Ordering::Equal => {
                let current = match &self.phase {
                    UploadPhase::Uploading { percent }
                    | UploadPhase::Processing { percent }
                    | UploadPhase::Transcoding { percent } => *percent,
                    _ => return,
                };
                if let UploadPhase::Uploading { percent }
                | UploadPhase::Processing { percent }
                | UploadPhase::Transcoding { percent } = candidate
                {
                    if percent > current {
                        self.phase = candidate;
                    }
                }
            }
            std::cmp::Ordering::Less => {
                log::debug!("Dropping stale progress event behind {:?}", self.phase);
            }
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(status: &str, progress: u8) -> VideoUploadStatus {
        VideoUploadStatus { status: status.to_string(), progress }
    }

    #[test]
    fn topic_is_keyed_by_module() {
        assert_eq!(status_topic("mod-42"), "video_upload_status.mod-42");
    }

    #[test]
    fn chunk_progress_is_monotonic() {
        let mut tracker = ProgressTracker::new();
        tracker.chunk_uploaded(1, 4);
        assert_eq!(*tracker.phase(), UploadPhase::Uploading { percent: 25 });
        tracker.chunk_uploaded(1, 4); // duplicate confirmation
        assert_eq!(*tracker.phase(), UploadPhase::Uploading { percent: 25 });
        tracker.chunk_uploaded(3, 4);
        assert_eq!(*tracker.phase(), UploadPhase::Uploading { percent: 75 });
    }

    #[test]
    fn final_chunk_forces_full_upload_percent() {
        let mut tracker = ProgressTracker::new();
        tracker.chunk_uploaded(3, 4);
        tracker.chunk_uploaded(4, 4);
        assert_eq!(*tracker.phase(), UploadPhase::Uploading { percent: 100 });
    }

    #[test]
    fn server_events_walk_the_phases() {
        let mut tracker = ProgressTracker::new();
        tracker.chunk_uploaded(4, 4);
        tracker.server_event(&event("processing", 40));
        assert_eq!(*tracker.phase(), UploadPhase::Processing { percent: 40 });
        tracker.server_event(&event("transcoding", 10));
        assert_eq!(*tracker.phase(), UploadPhase::Transcoding { percent: 10 });
        tracker.server_event(&event("completed", 100));
        assert_eq!(*tracker.phase(), UploadPhase::Completed);
    }

    #[test]
    fn stale_server_event_is_dropped() {
        let mut tracker = ProgressTracker::new();
        tracker.chunk_uploaded(4, 4);
        tracker.server_event(&event("transcoding", 50));
        tracker.server_event(&event("processing", 90));
        assert_eq!(*tracker.phase(), UploadPhase::Transcoding { percent: 50 });
        tracker.server_event(&event("transcoding", 20));
        assert_eq!(*tracker.phase(), UploadPhase::Transcoding { percent: 50 });
    }

    #[test]
    fn unknown_status_is_ignored() {
        let mut tracker = ProgressTracker::new();
        tracker.server_event(&event("mystery", 10));
        assert_eq!(*tracker.phase(), UploadPhase::Uploading { percent: 0 });
    }

    #[test]
    fn cancel_is_terminal_except_after_completion() {
        let mut tracker = ProgressTracker::new();
        tracker.cancelled();
        assert_eq!(*tracker.phase(), UploadPhase::Cancelled);
        tracker.server_event(&event("completed", 100));
        assert_eq!(*tracker.phase(), UploadPhase::Cancelled);

        let mut tracker = ProgressTracker::new();
        tracker.server_event(&event("completed", 100));
        tracker.cancelled();
        assert_eq!(*tracker.phase(), UploadPhase::Completed);
    }

    #[test]
    fn failure_sticks() {
        let mut tracker = ProgressTracker::new();
        tracker.failed("chunk 3 exhausted retries");
        assert!(matches!(tracker.phase(), UploadPhase::Failed { .. }));
        tracker.server_event(&event("processing", 10));
        assert!(matches!(tracker.phase(), UploadPhase::Failed { .. }));
    }
}
