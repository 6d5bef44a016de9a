//! Sequential chunked upload of a single file.

use tracing::{debug, info};

use docusearch_api_client::ChunkForm;
use docusearch_protocol::ChunkUploadResponse;
use docusearch_transfer::{ChunkReader, UploadFile, UploadSession, generate_upload_id};

use crate::error::UploadError;
use crate::transport::ChunkTransport;
use crate::types::{UploadOptions, UploadOutcome};

/// Callback invoked after each accepted chunk with `(chunks_done, total_chunks)`.
pub type ProgressFn<'f> = dyn FnMut(u32, u32) + Send + 'f;

/// Uploads one file's chunks strictly in order.
///
/// Chunk `i + 1` is never sent before the server has answered chunk `i`,
/// and the first failed chunk ends the session. There is no retry.
pub struct SequentialUploader<'a> {
    transport: &'a dyn ChunkTransport,
    options: &'a UploadOptions,
}

impl<'a> SequentialUploader<'a> {
    pub fn new(transport: &'a dyn ChunkTransport, options: &'a UploadOptions) -> Self {
        Self { transport, options }
    }

    /// Creates an idle session for `file` with a freshly generated upload id.
    pub fn start_session(&self, file: &UploadFile) -> Result<UploadSession, UploadError> {
        Ok(UploadSession::new(
            generate_upload_id(),
            file,
            self.options.chunk_size,
        )?)
    }

    /// Starts a session for `file` and drives it to completion or failure.
    pub async fn upload(
        &self,
        file: &UploadFile,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<UploadOutcome, UploadError> {
        let mut session = self.start_session(file)?;
        self.run(&mut session, file, on_progress).await
    }

    /// Drives an idle `session` through every chunk of `file`.
    ///
    /// On return the session is `Completed` (on `Ok`) or `Failed` (on `Err`),
    /// unless it was not idle to begin with.
    pub async fn run(
        &self,
        session: &mut UploadSession,
        file: &UploadFile,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<UploadOutcome, UploadError> {
        session.begin()?;
        info!(
            file = %file.name,
            upload_id = %session.upload_id(),
            total_chunks = session.total_chunks(),
            "starting chunked upload"
        );

        match self.send_chunks(session, file, on_progress).await {
            Ok(last) => {
                session.complete()?;
                info!(
                    file = %file.name,
                    document_id = ?last.document_id,
                    "chunked upload completed"
                );
                Ok(UploadOutcome {
                    file_name: file.name.clone(),
                    upload_id: session.upload_id().to_string(),
                    document_id: last.document_id,
                    badges_earned: last.badges_earned,
                    chunks_sent: session.total_chunks(),
                })
            }
            Err(e) => {
                // Already-terminal sessions keep their first error.
                let _ = session.fail(e.user_message());
                Err(e)
            }
        }
    }

    async fn send_chunks(
        &self,
        session: &mut UploadSession,
        file: &UploadFile,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<ChunkUploadResponse, UploadError> {
        let mut reader = ChunkReader::open(file, session.chunk_size()).await?;
        let total = session.total_chunks();
        let mut last = ChunkUploadResponse::default();

        while let Some(chunk) = reader.next_chunk().await? {
            let form = ChunkForm {
                chunk_number: chunk.index,
                total_chunks: total,
                filename: file.name.clone(),
                upload_id: session.upload_id().to_string(),
                category: self.options.category.clone(),
            };
            debug!(
                file = %file.name,
                chunk = chunk.index,
                total,
                bytes = chunk.data.len(),
                "sending chunk"
            );

            last = self.transport.send_chunk(&form, chunk.data).await?;
            on_progress(chunk.index + 1, total);

            if chunk.index + 1 < total {
                session.advance()?;
            }
        }

        Ok(last)
    }

    /// Uploads a file at or below the chunk threshold in a single request.
    ///
    /// Progress is reported as one chunk of one.
    pub async fn upload_direct(
        &self,
        file: &UploadFile,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<UploadOutcome, UploadError> {
        info!(file = %file.name, size = file.size, "starting direct upload");
        let data = file.read_all().await?;
        self.transport
            .send_direct(&file.name, &file.mime, data, &self.options.category)
            .await?;
        on_progress(1, 1);
        info!(file = %file.name, "direct upload completed");

        Ok(UploadOutcome {
            file_name: file.name.clone(),
            upload_id: String::new(),
            document_id: None,
            badges_earned: Vec::new(),
            chunks_sent: 1,
        })
    }
}
