use std::path::PathBuf;

/// Errors produced by thumbnail operations.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    /// No image was given for an upload.
    #[error("Please select an image file to upload")]
    NoFile,

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server refused or failed the operation. The message is ready to
    /// show to the user.
    #[error("{0}")]
    Failed(String),
}
