use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;

use crate::TransferError;
use crate::chunked::{ChunkRange, total_chunks};
use crate::validation::detect_content_type;

/// Where an upload's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<Vec<u8>>),
}

/// A file selected for upload: metadata plus a handle to its bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub size: u64,
    /// Declared MIME type (e.g. `application/pdf`).
    pub mime: String,
    pub source: FileSource,
}

impl UploadFile {
    /// Describes a file on disk. The MIME type is derived from the extension.
    pub fn from_path(path: &Path) -> Result<Self, TransferError> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self {
            mime: detect_content_type(&name).to_string(),
            name,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wraps an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime: mime.into(),
            source: FileSource::Memory(Arc::new(data)),
        }
    }

    /// Reads the whole file into memory (used for single-request uploads).
    pub async fn read_all(&self) -> Result<Vec<u8>, TransferError> {
        match &self.source {
            FileSource::Path(path) => Ok(tokio::fs::read(path).await?),
            FileSource::Memory(data) => Ok(data.as_ref().clone()),
        }
    }
}

/// One chunk read from a file, ready to send.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0-based chunk index.
    pub index: u32,
    /// Total chunks in the session.
    pub total: u32,
    pub range: ChunkRange,
    pub data: Vec<u8>,
}

/// Generates an upload id from the current timestamp and a random suffix.
///
/// Format: `<unix millis>_<9 base-36 chars>`.
pub fn generate_upload_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}

// ---------------------------------------------------------------------------
// UploadSession
// ---------------------------------------------------------------------------

/// Lifecycle state of one file's chunked upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Uploading { chunk_index: u32 },
    Completed,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Uploading { chunk_index } => write!(f, "uploading({chunk_index})"),
            SessionState::Completed => f.write_str("completed"),
            SessionState::Failed => f.write_str("failed"),
        }
    }
}

/// Client-side state for one file's chunked upload.
///
/// The upload id is fixed at construction and never changes. Chunk indices
/// only move forward one step at a time.
#[derive(Debug, Clone)]
pub struct UploadSession {
    upload_id: String,
    file_name: String,
    file_size: u64,
    mime: String,
    chunk_size: usize,
    total_chunks: u32,
    state: SessionState,
    error: Option<String>,
}

impl UploadSession {
    /// Creates an idle session for `file`.
    ///
    /// `total_chunks` is `ceil(size / chunk_size)`, with a floor of 1 so an
    /// empty file is still sent as one request.
    pub fn new(upload_id: String, file: &UploadFile, chunk_size: usize) -> Result<Self, TransferError> {
        let total = total_chunks(file.size, chunk_size)?.max(1);
        Ok(Self {
            upload_id,
            file_name: file.name.clone(),
            file_size: file.size,
            mime: file.mime.clone(),
            chunk_size,
            total_chunks: total,
            state: SessionState::Idle,
            error: None,
        })
    }

    /// `Idle -> Uploading(0)`.
    pub fn begin(&mut self) -> Result<(), TransferError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Uploading { chunk_index: 0 };
                Ok(())
            }
            other => Err(self.invalid(other, "begin")),
        }
    }

    /// `Uploading(i) -> Uploading(i + 1)`, only while chunks remain.
    pub fn advance(&mut self) -> Result<(), TransferError> {
        match self.state {
            SessionState::Uploading { chunk_index } if chunk_index + 1 < self.total_chunks => {
                self.state = SessionState::Uploading {
                    chunk_index: chunk_index + 1,
                };
                Ok(())
            }
            other => Err(self.invalid(other, "advance")),
        }
    }

    /// `Uploading(last) -> Completed`.
    pub fn complete(&mut self) -> Result<(), TransferError> {
        match self.state {
            SessionState::Uploading { chunk_index } if chunk_index + 1 == self.total_chunks => {
                self.state = SessionState::Completed;
                Ok(())
            }
            other => Err(self.invalid(other, "complete")),
        }
    }

    /// `Uploading(i) -> Failed`, recording the error message.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransferError> {
        match self.state {
            SessionState::Uploading { .. } => {
                self.state = SessionState::Failed;
                self.error = Some(message.into());
                Ok(())
            }
            other => Err(self.invalid(other, "fail")),
        }
    }

    fn invalid(&self, from: SessionState, action: &'static str) -> TransferError {
        TransferError::InvalidTransition {
            from: from.to_string(),
            action,
        }
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The chunk currently in flight, if uploading.
    pub fn current_chunk_index(&self) -> Option<u32> {
        match self.state {
            SessionState::Uploading { chunk_index } => Some(chunk_index),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `true` once the session has completed or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Failed)
    }
}
