//! Chunked file transfer primitives for DocuSearch uploads.
//!
//! - [`split_ranges`] partitions a file into fixed-size byte ranges.
//! - [`ChunkReader`] yields those ranges as owned buffers, one at a time.
//! - [`UploadSession`] tracks one file's `Idle -> Uploading -> Completed | Failed` lifecycle.
//! - [`validation`] applies the client-side type and size rules before any request.
//! - [`ProgressAggregator`] and [`BatchState`] fold chunk and session outcomes into batch totals.

mod chunked;
mod progress;
mod types;
pub mod validation;

pub use chunked::{ChunkRange, ChunkReader, split_ranges, total_chunks};
pub use progress::{BatchFailure, BatchState, FileProgress, ProgressAggregator};
pub use types::{Chunk, FileSource, SessionState, UploadFile, UploadSession, generate_upload_id};
pub use validation::{FormKind, SelectionPlan, UploadRoute, ValidationError};

/// Fixed chunk size for `/chunked_upload`: 2 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("invalid session transition: cannot {action} from {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
