use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{error, info};

use docusearch_api_client::{ApiClient, Error as ApiError, ThumbnailAction};
use docusearch_protocol::ActionResponse;

use crate::error::ThumbnailError;
use crate::status::{StatusTicker, failure_fallback, success_text};

pub type ThumbnailFuture<'a> = Pin<Box<dyn Future<Output = Result<ActionResponse, ApiError>> + Send + 'a>>;

/// Server calls behind thumbnail administration.
pub trait ThumbnailApi: Send + Sync {
    fn upload<'a>(
        &'a self,
        document_id: &'a str,
        file_name: &'a str,
        mime: &'a str,
        data: Vec<u8>,
    ) -> ThumbnailFuture<'a>;

    /// Runs `Generate` or `Reset`.
    fn action<'a>(&'a self, document_id: &'a str, action: ThumbnailAction) -> ThumbnailFuture<'a>;
}

impl ThumbnailApi for ApiClient {
    fn upload<'a>(
        &'a self,
        document_id: &'a str,
        file_name: &'a str,
        mime: &'a str,
        data: Vec<u8>,
    ) -> ThumbnailFuture<'a> {
        Box::pin(self.upload_thumbnail(document_id, file_name, mime, data))
    }

    fn action<'a>(&'a self, document_id: &'a str, action: ThumbnailAction) -> ThumbnailFuture<'a> {
        Box::pin(self.thumbnail_action(document_id, action))
    }
}

/// Status line for a running or finished thumbnail operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailStatus {
    pub action: ThumbnailAction,
    /// Whole seconds since the request started.
    pub elapsed: u64,
    pub text: String,
}

/// Returns the MIME type of an image file from its extension.
pub fn image_content_type(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Runs thumbnail operations for one document.
pub struct ThumbnailManager<'a> {
    api: &'a dyn ThumbnailApi,
    document_id: String,
    tick: Duration,
    status_tx: mpsc::UnboundedSender<ThumbnailStatus>,
    status_rx: Option<mpsc::UnboundedReceiver<ThumbnailStatus>>,
}

impl<'a> ThumbnailManager<'a> {
    pub fn new(api: &'a dyn ThumbnailApi, document_id: impl Into<String>) -> Self {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        Self {
            api,
            document_id: document_id.into(),
            tick: Duration::from_secs(1),
            status_tx,
            status_rx: Some(status_rx),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Takes the status receiver. Can only be called once.
    pub fn take_status(&mut self) -> Option<mpsc::UnboundedReceiver<ThumbnailStatus>> {
        self.status_rx.take()
    }

    /// Uploads a custom thumbnail image. Nothing is sent if the file is
    /// missing or unreadable.
    pub async fn upload(&self, path: Option<&Path>) -> Result<String, ThumbnailError> {
        let path = path.ok_or(ThumbnailError::NoFile)?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ThumbnailError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());
        let mime = image_content_type(&file_name);

        info!(
            document = %self.document_id,
            file = %file_name,
            bytes = data.len(),
            "uploading thumbnail"
        );
        let request = self.api.upload(&self.document_id, &file_name, mime, data);
        self.run(ThumbnailAction::Upload, request).await
    }

    /// Asks the server to regenerate the thumbnail from the document.
    pub async fn generate(&self) -> Result<String, ThumbnailError> {
        info!(document = %self.document_id, "generating thumbnail");
        let request = self.api.action(&self.document_id, ThumbnailAction::Generate);
        self.run(ThumbnailAction::Generate, request).await
    }

    /// Replaces a custom thumbnail with the default one.
    pub async fn reset(&self) -> Result<String, ThumbnailError> {
        info!(document = %self.document_id, "resetting thumbnail");
        let request = self.api.action(&self.document_id, ThumbnailAction::Reset);
        self.run(ThumbnailAction::Reset, request).await
    }

    /// Awaits `request` while publishing elapsed-time status updates.
    ///
    /// Returns the server's message on success.
    async fn run(
        &self,
        action: ThumbnailAction,
        mut request: ThumbnailFuture<'_>,
    ) -> Result<String, ThumbnailError> {
        let mut ticker = StatusTicker::new(action);
        self.emit(action, ticker.elapsed(), ticker.current());

        let mut clock = interval_at(Instant::now() + self.tick, self.tick);
        let result = loop {
            tokio::select! {
                result = &mut request => break result,
                _ = clock.tick() => {
                    if let Some(text) = ticker.tick() {
                        self.emit(action, ticker.elapsed(), text);
                    }
                }
            }
        };

        let fallback = failure_fallback(action);
        let message = match result {
            Ok(resp) if resp.success => {
                self.emit(action, ticker.elapsed(), success_text(action));
                info!(document = %self.document_id, ?action, "thumbnail operation succeeded");
                return Ok(resp.message);
            }
            Ok(resp) if !resp.message.trim().is_empty() => resp.message,
            Ok(_) => fallback.to_string(),
            Err(e) => {
                error!(document = %self.document_id, ?action, error = %e, "thumbnail request failed");
                e.user_message(fallback)
            }
        };
        error!(document = %self.document_id, ?action, message = %message, "thumbnail operation failed");
        Err(ThumbnailError::Failed(message))
    }

    fn emit(&self, action: ThumbnailAction, elapsed: u64, text: &str) {
        let _ = self.status_tx.send(ThumbnailStatus {
            action,
            elapsed,
            text: text.to_string(),
        });
    }
}
