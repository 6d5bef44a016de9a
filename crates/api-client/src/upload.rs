//! Multipart endpoints: chunked and direct document uploads, thumbnails.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use docusearch_protocol::constants::{
    CHUNKED_UPLOAD_PATH, DIRECT_UPLOAD_PATH, THUMBNAIL_FIELD, chunk_fields, direct_fields,
    thumbnail_path,
};
use docusearch_protocol::{ActionResponse, ChunkUploadResponse, ErrorBody};

use crate::client::{ApiClient, Error, decode_json};

/// Text fields sent alongside each chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkForm {
    /// 0-based chunk index.
    pub chunk_number: u32,
    pub total_chunks: u32,
    /// Original file name.
    pub filename: String,
    /// Stable id shared by every chunk of one file.
    pub upload_id: String,
    pub category: String,
}

/// Thumbnail administration actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailAction {
    Upload,
    Generate,
    Reset,
}

impl ThumbnailAction {
    /// Path segment under `/admin/document/<id>/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            ThumbnailAction::Upload => "upload-thumbnail",
            ThumbnailAction::Generate => "generate-thumbnail",
            ThumbnailAction::Reset => "reset-thumbnail",
        }
    }
}

fn file_part(data: Vec<u8>, file_name: &str, mime: &str) -> Result<Part, Error> {
    Ok(Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str(mime)?)
}

impl ApiClient {
    /// Sends one chunk to `/chunked_upload` and waits for the server's answer.
    pub async fn upload_chunk(
        &self,
        form: &ChunkForm,
        data: Vec<u8>,
    ) -> Result<ChunkUploadResponse, Error> {
        let size = data.len();
        let multipart = Form::new()
            .part(
                chunk_fields::CHUNK,
                file_part(data, &form.filename, "application/octet-stream")?,
            )
            .text(chunk_fields::CHUNK_NUMBER, form.chunk_number.to_string())
            .text(chunk_fields::TOTAL_CHUNKS, form.total_chunks.to_string())
            .text(chunk_fields::FILENAME, form.filename.clone())
            .text(chunk_fields::UPLOAD_ID, form.upload_id.clone())
            .text(chunk_fields::CATEGORY, form.category.clone());

        debug!(
            upload_id = %form.upload_id,
            chunk = form.chunk_number,
            total = form.total_chunks,
            bytes = size,
            "posting chunk"
        );

        let resp = self
            .http
            .post(self.url(CHUNKED_UPLOAD_PATH))
            .multipart(multipart)
            .send()
            .await?;
        decode_json(resp).await
    }

    /// Sends a whole file to `/upload` in one request.
    ///
    /// The endpoint answers with a page or a redirect rather than JSON, so
    /// any 2xx after redirects counts as success.
    pub async fn upload_direct(
        &self,
        file_name: &str,
        mime: &str,
        data: Vec<u8>,
        category: &str,
    ) -> Result<(), Error> {
        let multipart = Form::new()
            .part(direct_fields::FILE, file_part(data, file_name, mime)?)
            .text(direct_fields::CATEGORY, category.to_string());

        let resp = self
            .http
            .post(self.url(DIRECT_UPLOAD_PATH))
            .multipart(multipart)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: ErrorBody::message_from(&body),
            });
        }
        Ok(())
    }

    /// Uploads a custom thumbnail image for a document.
    pub async fn upload_thumbnail(
        &self,
        document_id: &str,
        file_name: &str,
        mime: &str,
        data: Vec<u8>,
    ) -> Result<ActionResponse, Error> {
        let multipart = Form::new().part(THUMBNAIL_FIELD, file_part(data, file_name, mime)?);
        let path = thumbnail_path(document_id, ThumbnailAction::Upload.path_segment());
        let resp = self
            .http
            .post(self.url(&path))
            .multipart(multipart)
            .send()
            .await?;
        decode_json(resp).await
    }

    /// Triggers server-side generation or reset of a document's thumbnail.
    pub async fn thumbnail_action(
        &self,
        document_id: &str,
        action: ThumbnailAction,
    ) -> Result<ActionResponse, Error> {
        let path = thumbnail_path(document_id, action.path_segment());
        let resp = self.http.post(self.url(&path)).send().await?;
        decode_json(resp).await
    }
}
