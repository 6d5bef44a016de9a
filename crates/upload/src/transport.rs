//! Transport seam between upload logic and HTTP.

use std::future::Future;
use std::pin::Pin;

use docusearch_api_client::{ApiClient, ChunkForm};
use docusearch_protocol::ChunkUploadResponse;

use crate::error::UploadError;

/// Boxed future returned by [`ChunkTransport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// Sends upload requests to the server.
///
/// [`ApiClient`] is the production implementation. Keeping a trait here lets
/// the uploader and batch logic be tested against scripted mocks.
pub trait ChunkTransport: Send + Sync {
    /// Posts one chunk and resolves once the server has answered.
    fn send_chunk<'a>(
        &'a self,
        form: &'a ChunkForm,
        data: Vec<u8>,
    ) -> TransportFuture<'a, ChunkUploadResponse>;

    /// Posts a whole file in a single request.
    fn send_direct<'a>(
        &'a self,
        file_name: &'a str,
        mime: &'a str,
        data: Vec<u8>,
        category: &'a str,
    ) -> TransportFuture<'a, ()>;
}

impl ChunkTransport for ApiClient {
    fn send_chunk<'a>(
        &'a self,
        form: &'a ChunkForm,
        data: Vec<u8>,
    ) -> TransportFuture<'a, ChunkUploadResponse> {
        Box::pin(async move { Ok(self.upload_chunk(form, data).await?) })
    }

    fn send_direct<'a>(
        &'a self,
        file_name: &'a str,
        mime: &'a str,
        data: Vec<u8>,
        category: &'a str,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move { Ok(self.upload_direct(file_name, mime, data, category).await?) })
    }
}
