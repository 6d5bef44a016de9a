//! Endpoint paths and multipart field names.

/// Chunked upload endpoint (multipart, one request per chunk).
pub const CHUNKED_UPLOAD_PATH: &str = "/chunked_upload";

/// Single-request upload endpoint used for files below the chunk threshold.
pub const DIRECT_UPLOAD_PATH: &str = "/upload";

/// Search progress endpoint, polled with `?query_id=<id>`.
pub const SEARCH_PROGRESS_PATH: &str = "/api/search/progress";

/// Topic list used to seed example searches.
pub const DOCUMENT_TOPICS_PATH: &str = "/api/document-topics";

/// Onboarding tour configuration.
pub const TOUR_CONFIG_PATH: &str = "/api/tour/config";

/// Onboarding tour reset.
pub const TOUR_RESET_PATH: &str = "/api/tour/reset";

/// Returns the path that marks a tour step as completed.
pub fn tour_step_path(step_id: &str) -> String {
    format!("/api/tour/step/{step_id}")
}

/// Returns the admin path for a thumbnail action on a document.
///
/// `action` is one of `upload-thumbnail`, `generate-thumbnail`, `reset-thumbnail`.
pub fn thumbnail_path(document_id: &str, action: &str) -> String {
    format!("/admin/document/{document_id}/{action}")
}

/// Multipart field names for `POST /chunked_upload`.
pub mod chunk_fields {
    pub const CHUNK: &str = "chunk";
    pub const CHUNK_NUMBER: &str = "chunk_number";
    pub const TOTAL_CHUNKS: &str = "total_chunks";
    pub const FILENAME: &str = "filename";
    pub const UPLOAD_ID: &str = "upload_id";
    pub const CATEGORY: &str = "category";
}

/// Multipart field names for `POST /upload`.
pub mod direct_fields {
    pub const FILE: &str = "file";
    pub const CATEGORY: &str = "category";
}

/// Multipart field name for thumbnail uploads.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// MIME type accepted by document uploads.
pub const PDF_MIME: &str = "application/pdf";
