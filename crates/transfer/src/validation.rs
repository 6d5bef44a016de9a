//! Client-side upload validation.
//!
//! Every check here runs before any network call. A rejected file never
//! reaches the uploader.

use std::path::Path;

use docusearch_protocol::constants::PDF_MIME;

use crate::types::UploadFile;

const MIB: u64 = 1024 * 1024;

/// Size limit of the basic single-file form: 16 MiB.
pub const BASIC_FORM_LIMIT: u64 = 16 * MIB;

/// Size limit of the chunk-capable form: 100 MiB.
pub const CHUNKED_FORM_LIMIT: u64 = 100 * MIB;

/// Files strictly larger than this go through `/chunked_upload`.
pub const CHUNK_THRESHOLD: u64 = 16 * MIB;

/// Which upload form a file was selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Plain form posting the whole file in one request.
    Basic,
    /// Form that can fall back to chunked upload for large files.
    ChunkCapable,
}

impl FormKind {
    /// Maximum accepted file size in bytes.
    pub fn limit(self) -> u64 {
        match self {
            FormKind::Basic => BASIC_FORM_LIMIT,
            FormKind::ChunkCapable => CHUNKED_FORM_LIMIT,
        }
    }
}

/// Reasons a selected file is rejected before upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Only PDF files are allowed")]
    NotPdf { name: String, mime: String },

    #[error("File size must be less than {limit_mb}MB")]
    TooLarge { name: String, size: u64, limit_mb: u64 },

    #[error("Please select a file to upload")]
    NoFile,
}

impl ValidationError {
    /// Name of the offending file, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ValidationError::NotPdf { name, .. } | ValidationError::TooLarge { name, .. } => {
                Some(name)
            }
            ValidationError::NoFile => None,
        }
    }
}

/// How an accepted file will be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRoute {
    /// Single `POST /upload`.
    Direct,
    /// Sequential `POST /chunked_upload` requests.
    Chunked,
}

/// Route for a file of `size` bytes.
pub fn route_for(size: u64) -> UploadRoute {
    if size > CHUNK_THRESHOLD {
        UploadRoute::Chunked
    } else {
        UploadRoute::Direct
    }
}

/// Returns `true` if `mime` names a PDF (parameters such as `; charset` are ignored).
pub fn is_pdf_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|m| m.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

/// Maps a file name to a MIME type by extension.
pub fn detect_content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Validates a file picked from a single-file input.
pub fn validate_single(file: &UploadFile, form: FormKind) -> Result<(), ValidationError> {
    if !is_pdf_mime(&file.mime) {
        return Err(ValidationError::NotPdf {
            name: file.name.clone(),
            mime: file.mime.clone(),
        });
    }
    let limit = form.limit();
    if file.size > limit {
        return Err(ValidationError::TooLarge {
            name: file.name.clone(),
            size: file.size,
            limit_mb: limit / MIB,
        });
    }
    Ok(())
}

/// Result of validating a multi-file selection.
#[derive(Debug, Default)]
pub struct SelectionPlan {
    /// Accepted files at or below the chunk threshold.
    pub direct: Vec<UploadFile>,
    /// Accepted files above the chunk threshold.
    pub chunked: Vec<UploadFile>,
    /// Rejected files with the reason.
    pub rejected: Vec<ValidationError>,
}

impl SelectionPlan {
    /// Returns `true` if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.chunked.is_empty()
    }

    /// Number of accepted files.
    pub fn accepted(&self) -> usize {
        self.direct.len() + self.chunked.len()
    }
}

/// Validates every file of a multi-file selection against the chunk-capable
/// limits and sorts accepted files by [`UploadRoute`].
pub fn classify_selection(files: Vec<UploadFile>) -> SelectionPlan {
    let mut plan = SelectionPlan::default();
    for file in files {
        match validate_single(&file, FormKind::ChunkCapable) {
            Ok(()) => match route_for(file.size) {
                UploadRoute::Direct => plan.direct.push(file),
                UploadRoute::Chunked => plan.chunked.push(file),
            },
            Err(e) => {
                tracing::debug!(file = %file.name, error = %e, "file rejected");
                plan.rejected.push(e);
            }
        }
    }
    plan
}
