//! Thumbnail administration for DocuSearch documents.
//!
//! A custom image can be uploaded, or the server asked to generate or reset
//! the thumbnail. Requests can take a while, so [`ThumbnailManager`] streams
//! a human-readable status that changes with elapsed time.

pub mod error;
pub mod manager;
pub mod status;

pub use docusearch_api_client::ThumbnailAction;
pub use error::ThumbnailError;
pub use manager::{ThumbnailApi, ThumbnailManager, ThumbnailStatus, image_content_type};
pub use status::{StatusTicker, failure_fallback, status_text, success_text};
