//! Scripted transport for upload tests.

use std::collections::HashMap;
use std::sync::Mutex;

use docusearch_api_client::ChunkForm;
use docusearch_protocol::{BadgeEarned, ChunkUploadResponse};
use docusearch_transfer::UploadFile;

use crate::error::UploadError;
use crate::transport::{ChunkTransport, TransportFuture};

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct SentChunk {
    pub form: ChunkForm,
    pub len: usize,
}

/// Records every request and fails the ones it was told to fail.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentChunk>>,
    direct: Mutex<Vec<String>>,
    failures: HashMap<(String, u32), String>,
    direct_failures: HashMap<String, String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes chunk `index` (0-based) of `file` fail with `message`.
    pub fn fail_chunk(mut self, file: &str, index: u32, message: &str) -> Self {
        self.failures
            .insert((file.to_string(), index), message.to_string());
        self
    }

    pub fn fail_direct(mut self, file: &str, message: &str) -> Self {
        self.direct_failures
            .insert(file.to_string(), message.to_string());
        self
    }

    pub fn sent(&self) -> Vec<SentChunk> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_for(&self, file: &str) -> Vec<SentChunk> {
        self.sent()
            .into_iter()
            .filter(|c| c.form.filename == file)
            .collect()
    }

    pub fn direct_sent(&self) -> Vec<String> {
        self.direct.lock().unwrap().clone()
    }
}

impl ChunkTransport for MockTransport {
    fn send_chunk<'a>(
        &'a self,
        form: &'a ChunkForm,
        data: Vec<u8>,
    ) -> TransportFuture<'a, ChunkUploadResponse> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(SentChunk {
                form: form.clone(),
                len: data.len(),
            });
            // Let sibling sessions run between chunks.
            tokio::task::yield_now().await;

            if let Some(msg) = self
                .failures
                .get(&(form.filename.clone(), form.chunk_number))
            {
                return Err(UploadError::Server {
                    status: Some(500),
                    message: msg.clone(),
                });
            }

            if form.chunk_number + 1 == form.total_chunks {
                Ok(ChunkUploadResponse {
                    document_id: Some(format!("doc-{}", form.filename)),
                    badges_earned: vec![BadgeEarned {
                        name: "Contributor".into(),
                        level: "1".into(),
                    }],
                    message: None,
                })
            } else {
                Ok(ChunkUploadResponse::default())
            }
        })
    }

    fn send_direct<'a>(
        &'a self,
        file_name: &'a str,
        _mime: &'a str,
        _data: Vec<u8>,
        _category: &'a str,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            self.direct.lock().unwrap().push(file_name.to_string());
            tokio::task::yield_now().await;
            match self.direct_failures.get(file_name) {
                Some(msg) => Err(UploadError::Server {
                    status: Some(400),
                    message: msg.clone(),
                }),
                None => Ok(()),
            }
        })
    }
}

/// An in-memory PDF of `size` bytes filled with `fill`.
pub fn pdf(name: &str, size: usize, fill: u8) -> UploadFile {
    UploadFile::from_bytes(name, "application/pdf", vec![fill; size])
}
