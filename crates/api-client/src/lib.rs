//! Async client for the DocuSearch web API.
//!
//! One [`ApiClient`] covers every endpoint the client toolkit talks to:
//! chunked and direct uploads, search progress, document topics, the
//! onboarding tour and thumbnail administration.

pub mod client;
pub mod upload;

#[cfg(test)]
mod mock;

pub use client::{ApiClient, Error};
pub use upload::{ChunkForm, ThumbnailAction};
