//! Chunked document upload flow.
//!
//! This crate holds the upload **business logic**: it knows nothing about
//! HTTP beyond the [`ChunkTransport`] trait, which [`ApiClient`] implements
//! and tests replace with mocks.
//!
//! # Flow
//!
//! 1. **Validate**: `docusearch_transfer::validation` sorts a selection into
//!    direct and chunked files before any request.
//! 2. **Upload**: [`SequentialUploader`] drives one file's chunks strictly in
//!    order, one request in flight.
//! 3. **Aggregate**: [`UploadBatch`] runs every file of a selection
//!    concurrently and reports combined progress through [`UploadEvent`]s.
//!
//! [`ApiClient`]: docusearch_api_client::ApiClient

pub mod batch;
pub mod error;
pub mod transport;
pub mod types;
pub mod uploader;

#[cfg(test)]
mod testing;

pub use batch::UploadBatch;
pub use error::UploadError;
pub use transport::ChunkTransport;
pub use types::{BatchOutcome, BatchResult, UploadEvent, UploadOptions, UploadOutcome};
pub use uploader::{ProgressFn, SequentialUploader};
