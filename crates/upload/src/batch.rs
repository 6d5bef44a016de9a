//! Concurrent upload of a multi-file selection.
//!
//! Every file gets its own session; sessions run concurrently and never
//! cancel each other. Progress is aggregated across the whole batch.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{error, info};

use docusearch_transfer::{
    BatchState, ProgressAggregator, SelectionPlan, UploadFile, UploadRoute, UploadSession,
};

use crate::error::UploadError;
use crate::transport::ChunkTransport;
use crate::types::{BatchResult, UploadEvent, UploadOptions, UploadOutcome};
use crate::uploader::SequentialUploader;

/// One file ready to start, with its slot in the progress aggregator.
struct Job {
    slot: usize,
    file: UploadFile,
    /// `None` for direct uploads.
    session: Option<UploadSession>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs upload batches and reports their progress as [`UploadEvent`]s.
pub struct UploadBatch {
    options: UploadOptions,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<UploadEvent>>,
}

impl UploadBatch {
    pub fn new(options: UploadOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            options,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.events_rx.take()
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Uploads every file in chunks, all files concurrently.
    pub async fn run(&self, transport: &dyn ChunkTransport, files: Vec<UploadFile>) -> BatchResult {
        let routed = files.into_iter().map(|f| (f, UploadRoute::Chunked)).collect();
        self.run_routed(transport, routed).await
    }

    /// Uploads a validated selection: small files directly, large files in
    /// chunks. Rejected files are not part of the batch.
    pub async fn run_plan(&self, transport: &dyn ChunkTransport, plan: SelectionPlan) -> BatchResult {
        let routed = plan
            .direct
            .into_iter()
            .map(|f| (f, UploadRoute::Direct))
            .chain(plan.chunked.into_iter().map(|f| (f, UploadRoute::Chunked)))
            .collect();
        self.run_routed(transport, routed).await
    }

    async fn run_routed(
        &self,
        transport: &dyn ChunkTransport,
        files: Vec<(UploadFile, UploadRoute)>,
    ) -> BatchResult {
        let total = files.len();
        let uploader = SequentialUploader::new(transport, &self.options);
        let progress = Mutex::new(ProgressAggregator::new());
        let state = Mutex::new(BatchState::new(total));

        info!(files = total, "starting upload batch");

        // Register every file before any starts so the batch percentage is
        // computed over the whole selection from the first chunk on.
        let mut jobs = Vec::with_capacity(total);
        for (file, route) in files {
            match route {
                UploadRoute::Direct => {
                    let slot = lock(&progress).register(file.name.clone(), 1);
                    jobs.push(Job {
                        slot,
                        file,
                        session: None,
                    });
                }
                UploadRoute::Chunked => match uploader.start_session(&file) {
                    Ok(session) => {
                        let slot = lock(&progress).register(file.name.clone(), session.total_chunks());
                        jobs.push(Job {
                            slot,
                            file,
                            session: Some(session),
                        });
                    }
                    Err(e) => self.record_failure(&state, &file.name, &e),
                },
            }
        }

        let results = join_all(
            jobs.into_iter()
                .map(|job| self.run_job(&uploader, job, &progress, &state)),
        )
        .await;
        let outcomes: Vec<UploadOutcome> = results.into_iter().flatten().collect();

        let state = state.into_inner().unwrap_or_else(PoisonError::into_inner);
        info!(
            completed = state.completed(),
            failed = state.failed(),
            total,
            "upload batch finished"
        );
        let _ = self.events_tx.send(UploadEvent::BatchFinished {
            completed: state.completed(),
            failed: state.failed(),
            total,
        });

        BatchResult {
            total,
            outcomes,
            failures: state.failures().to_vec(),
        }
    }

    async fn run_job(
        &self,
        uploader: &SequentialUploader<'_>,
        job: Job,
        progress: &Mutex<ProgressAggregator>,
        state: &Mutex<BatchState>,
    ) -> Option<UploadOutcome> {
        let Job {
            slot,
            file,
            session,
        } = job;
        let name = file.name.clone();

        let mut on_progress = |done: u32, total: u32| {
            let batch_percent = {
                let mut agg = lock(progress);
                agg.record(slot, done, total);
                agg.batch_percentage()
            };
            let _ = self.events_tx.send(UploadEvent::ChunkUploaded {
                file: name.clone(),
                chunk: done,
                total_chunks: total,
                file_percent: done as f64 / total as f64 * 100.0,
                batch_percent,
            });
        };

        let result = match session {
            Some(mut session) => {
                let _ = self.events_tx.send(UploadEvent::SessionStarted {
                    file: file.name.clone(),
                    total_chunks: session.total_chunks(),
                });
                uploader.run(&mut session, &file, &mut on_progress).await
            }
            None => {
                let _ = self.events_tx.send(UploadEvent::SessionStarted {
                    file: file.name.clone(),
                    total_chunks: 1,
                });
                uploader.upload_direct(&file, &mut on_progress).await
            }
        };

        match result {
            Ok(outcome) => {
                lock(state).record_completed();
                let _ = self.events_tx.send(UploadEvent::SessionCompleted {
                    file: file.name.clone(),
                    document_id: outcome.document_id.clone(),
                    badges_earned: outcome.badges_earned.clone(),
                });
                Some(outcome)
            }
            Err(e) => {
                self.record_failure(state, &file.name, &e);
                None
            }
        }
    }

    fn record_failure(&self, state: &Mutex<BatchState>, file: &str, err: &UploadError) {
        let message = err.user_message();
        error!(file = %file, error = %message, "upload failed");
        lock(state).record_failed(file, message.clone());
        let _ = self.events_tx.send(UploadEvent::SessionFailed {
            file: file.to_string(),
            error: message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, pdf};
    use crate::types::BatchOutcome;
    use docusearch_transfer::validation::classify_selection;

    fn batch(chunk_size: usize) -> UploadBatch {
        UploadBatch::new(UploadOptions {
            category: "General".into(),
            chunk_size,
        })
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_siblings() {
        let transport = MockTransport::new().fail_chunk("b.pdf", 1, "Server rejected chunk");
        let mut batch = batch(4);
        let mut rx = batch.take_events().unwrap();

        let files = vec![pdf("a.pdf", 10, 1), pdf("b.pdf", 10, 2), pdf("c.pdf", 10, 3)];
        let result = batch.run(&transport, files).await;

        assert_eq!(result.total, 3);
        assert_eq!(result.completed(), 2);
        assert_eq!(result.failed(), 1);
        assert!(!result.is_full_success());
        assert_eq!(
            result.outcome(),
            BatchOutcome::Partial {
                completed: 2,
                failed: 1
            }
        );
        assert_eq!(result.failures[0].file_name, "b.pdf");
        assert_eq!(result.failures[0].message, "Server rejected chunk");

        assert_eq!(transport.sent_for("a.pdf").len(), 3);
        assert_eq!(transport.sent_for("b.pdf").len(), 2);
        assert_eq!(transport.sent_for("c.pdf").len(), 3);

        let events = drain(&mut rx);
        assert!(events.contains(&UploadEvent::SessionFailed {
            file: "b.pdf".into(),
            error: "Server rejected chunk".into(),
        }));
        assert_eq!(
            events.last(),
            Some(&UploadEvent::BatchFinished {
                completed: 2,
                failed: 1,
                total: 3
            })
        );
    }

    #[tokio::test]
    async fn sessions_run_concurrently() {
        let transport = MockTransport::new();
        let batch = batch(4);

        batch
            .run(&transport, vec![pdf("a.pdf", 12, 0), pdf("b.pdf", 12, 0)])
            .await;

        let order: Vec<(String, u32)> = transport
            .sent()
            .into_iter()
            .map(|c| (c.form.filename, c.form.chunk_number))
            .collect();
        // b's first chunk goes out before a has finished.
        assert_eq!(order[0], ("a.pdf".to_string(), 0));
        assert_eq!(order[1], ("b.pdf".to_string(), 0));

        // Within each file, order is strictly sequential.
        for name in ["a.pdf", "b.pdf"] {
            let numbers: Vec<u32> = transport
                .sent_for(name)
                .iter()
                .map(|c| c.form.chunk_number)
                .collect();
            assert_eq!(numbers, vec![0, 1, 2]);
        }
    }

    #[tokio::test]
    async fn batch_percentage_covers_all_files() {
        let transport = MockTransport::new();
        let mut batch = batch(4);
        let mut rx = batch.take_events().unwrap();

        // 3 chunks + 1 chunk = 4 chunks in total.
        let result = batch
            .run(&transport, vec![pdf("big.pdf", 12, 0), pdf("small.pdf", 2, 0)])
            .await;
        assert!(result.is_full_success());
        assert_eq!(result.outcome(), BatchOutcome::FullSuccess);

        let percents: Vec<f64> = drain(&mut rx)
            .into_iter()
            .filter_map(|ev| match ev {
                UploadEvent::ChunkUploaded { batch_percent, .. } => Some(batch_percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents.len(), 4);
        assert_eq!(percents[0], 25.0);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*percents.last().unwrap(), 100.0);
    }

    #[tokio::test]
    async fn completed_event_carries_document_and_badges() {
        let transport = MockTransport::new();
        let mut batch = batch(4);
        let mut rx = batch.take_events().unwrap();

        batch.run(&transport, vec![pdf("doc.pdf", 5, 0)]).await;

        let events = drain(&mut rx);
        assert_eq!(
            events[0],
            UploadEvent::SessionStarted {
                file: "doc.pdf".into(),
                total_chunks: 2
            }
        );
        let completed = events
            .iter()
            .find_map(|ev| match ev {
                UploadEvent::SessionCompleted {
                    document_id,
                    badges_earned,
                    ..
                } => Some((document_id.clone(), badges_earned.len())),
                _ => None,
            })
            .unwrap();
        assert_eq!(completed, (Some("doc-doc.pdf".to_string()), 1));
    }

    #[tokio::test]
    async fn plan_mixes_direct_and_chunked_files() {
        const MIB: usize = 1024 * 1024;
        let transport = MockTransport::new();
        let batch = UploadBatch::new(UploadOptions::default());

        let plan = classify_selection(vec![
            pdf("small.pdf", 1024, 0),
            pdf("large.pdf", 17 * MIB, 0),
            docusearch_transfer::UploadFile::from_bytes("notes.txt", "text/plain", vec![0; 10]),
        ]);
        assert_eq!(plan.rejected.len(), 1);

        let result = batch.run_plan(&transport, plan).await;
        assert_eq!(result.total, 2);
        assert!(result.is_full_success());
        assert_eq!(transport.direct_sent(), vec!["small.pdf".to_string()]);
        // 17 MiB in 2 MiB chunks.
        assert_eq!(transport.sent_for("large.pdf").len(), 9);
    }

    #[tokio::test]
    async fn direct_failure_counts_against_batch() {
        let transport = MockTransport::new().fail_direct("small.pdf", "Invalid PDF");
        let batch = batch(4);
        let plan = SelectionPlan {
            direct: vec![pdf("small.pdf", 3, 0)],
            chunked: vec![pdf("big.pdf", 9, 0)],
            rejected: Vec::new(),
        };

        let result = batch.run_plan(&transport, plan).await;
        assert_eq!(result.completed(), 1);
        assert_eq!(result.failures[0].message, "Invalid PDF");
    }

    #[tokio::test]
    async fn invalid_chunk_size_fails_every_chunked_file() {
        let transport = MockTransport::new();
        let batch = batch(0);

        let result = batch.run(&transport, vec![pdf("a.pdf", 3, 0)]).await;
        assert_eq!(result.failed(), 1);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn empty_batch_finishes_immediately() {
        let transport = MockTransport::new();
        let mut batch = batch(4);
        let mut rx = batch.take_events().unwrap();

        let result = batch.run(&transport, Vec::new()).await;
        assert_eq!(result.total, 0);
        assert_eq!(
            drain(&mut rx),
            vec![UploadEvent::BatchFinished {
                completed: 0,
                failed: 0,
                total: 0
            }]
        );
    }

    #[test]
    fn events_can_only_be_taken_once() {
        let mut batch = batch(4);
        assert!(batch.take_events().is_some());
        assert!(batch.take_events().is_none());
    }
}
