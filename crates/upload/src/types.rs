//! Data types for the upload flow.

use docusearch_protocol::BadgeEarned;
use docusearch_transfer::{BatchFailure, DEFAULT_CHUNK_SIZE};

/// Settings shared by every upload in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Category form field sent with every chunk.
    pub category: String,
    /// Bytes per chunk (2 MiB unless overridden).
    pub chunk_size: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            category: "General".into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Result of a file that uploaded successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub file_name: String,
    /// Upload id used for every chunk (empty for direct uploads).
    pub upload_id: String,
    /// Server-assigned document id from the final chunk, when provided.
    pub document_id: Option<String>,
    pub badges_earned: Vec<BadgeEarned>,
    pub chunks_sent: u32,
}

/// Progress and lifecycle event emitted by an [`UploadBatch`](crate::UploadBatch).
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A file's upload has begun.
    SessionStarted { file: String, total_chunks: u32 },
    /// One chunk of `file` was accepted by the server.
    ChunkUploaded {
        file: String,
        /// 1-based count of chunks done.
        chunk: u32,
        total_chunks: u32,
        file_percent: f64,
        batch_percent: f64,
    },
    /// A file finished successfully.
    SessionCompleted {
        file: String,
        document_id: Option<String>,
        badges_earned: Vec<BadgeEarned>,
    },
    /// A file failed; its siblings keep going.
    SessionFailed { file: String, error: String },
    /// Every file has completed or failed.
    BatchFinished {
        completed: usize,
        failed: usize,
        total: usize,
    },
}

/// How a finished batch should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every file succeeded; the caller may navigate away.
    FullSuccess,
    /// At least one file failed.
    Partial { completed: usize, failed: usize },
}

/// Final report of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub total: usize,
    pub outcomes: Vec<UploadOutcome>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn completed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// `true` only when no file failed.
    pub fn is_full_success(&self) -> bool {
        self.failures.is_empty() && self.completed() == self.total
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.is_full_success() {
            BatchOutcome::FullSuccess
        } else {
            BatchOutcome::Partial {
                completed: self.completed(),
                failed: self.failed(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str) -> UploadOutcome {
        UploadOutcome {
            file_name: name.into(),
            upload_id: "u".into(),
            document_id: None,
            badges_earned: Vec::new(),
            chunks_sent: 1,
        }
    }

    #[test]
    fn default_options_use_two_mib_chunks() {
        let opts = UploadOptions::default();
        assert_eq!(opts.chunk_size, 2_097_152);
    }

    #[test]
    fn partial_when_any_failed() {
        let result = BatchResult {
            total: 3,
            outcomes: vec![outcome("a"), outcome("b")],
            failures: vec![BatchFailure {
                file_name: "c".into(),
                message: "boom".into(),
            }],
        };
        assert!(!result.is_full_success());
        assert_eq!(
            result.outcome(),
            BatchOutcome::Partial {
                completed: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn full_success_when_all_completed() {
        let result = BatchResult {
            total: 1,
            outcomes: vec![outcome("a")],
            failures: Vec::new(),
        };
        assert_eq!(result.outcome(), BatchOutcome::FullSuccess);
    }
}
