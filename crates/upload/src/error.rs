//! Upload error types.

use docusearch_transfer::TransferError;

/// Message shown when the server gives no reason for a failed chunk.
pub const GENERIC_FAILURE: &str = "Upload failed";

/// Errors produced while uploading a file.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The server rejected a request (non-2xx) or answered with something
    /// other than JSON. `message` is what the user sees.
    #[error("{message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl UploadError {
    /// Text suitable for a per-file failure banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<docusearch_api_client::Error> for UploadError {
    fn from(err: docusearch_api_client::Error) -> Self {
        use docusearch_api_client::Error as ApiError;
        match err {
            ApiError::Api { status, message } => UploadError::Server {
                status: Some(status),
                message: message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            ApiError::Json(e) => UploadError::Server {
                status: None,
                message: format!("{GENERIC_FAILURE}: invalid server response ({e})"),
            },
            ApiError::Http(e) => UploadError::Network(e.to_string()),
            other => UploadError::Server {
                status: None,
                message: other.to_string(),
            },
        }
    }
}
