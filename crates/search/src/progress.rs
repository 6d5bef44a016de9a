//! "Search in progress" monitor.
//!
//! While a search runs the server is polled once per interval. If polling
//! fails the monitor switches to a client-side timeline that walks through
//! fixed phases, one per tick, and never passes [`PROGRESS_CEILING`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Interval;
use tracing::{debug, info, warn};

use docusearch_api_client::ApiClient;
use docusearch_protocol::SearchProgressResponse;

use crate::error::SearchError;

/// Time between two progress polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling stops once the server reports at least this much progress.
/// The simulated timeline never goes past it.
pub const PROGRESS_CEILING: f64 = 95.0;

/// `(stage, detail, progress)` for each simulated phase, in order.
const SIMULATED_PHASES: &[(&str, &str, f64)] = &[
    ("searching", "Scanning document library...", 10.0),
    ("searching", "Finding relevant documents...", 25.0),
    ("analyzing", "Processing document content...", 40.0),
    ("generating", "Synthesizing key insights from relevant documents...", 60.0),
    ("generating", "Identifying patterns across documents...", 75.0),
    ("finalizing", "Preparing comprehensive response...", 85.0),
    ("finalizing", "Formatting final results...", PROGRESS_CEILING),
];

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SearchError>> + Send + 'a>>;

/// Something that can report a running search's progress.
pub trait ProgressSource: Send + Sync {
    fn fetch_progress<'a>(&'a self, query_id: &'a str) -> SourceFuture<'a, SearchProgressResponse>;
}

impl ProgressSource for ApiClient {
    fn fetch_progress<'a>(&'a self, query_id: &'a str) -> SourceFuture<'a, SearchProgressResponse> {
        Box::pin(async move { Ok(self.search_progress(query_id).await?) })
    }
}

/// One update shown by the progress overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub stage: String,
    pub detail: String,
    /// Percentage in `0..=100`.
    pub progress: f64,
    /// `true` when the update comes from the client-side timeline.
    pub simulated: bool,
}

/// Client-side progress timeline used when the server cannot be polled.
///
/// The timeline only moves when [`advance`](Self::advance) is called.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProgress {
    phase: usize,
}

impl SimulatedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts at the first phase beyond `progress`, so a timeline taking
    /// over from live updates never moves backwards.
    pub fn after(progress: f64) -> Self {
        let phase = SIMULATED_PHASES
            .iter()
            .position(|(_, _, p)| *p > progress)
            .unwrap_or(SIMULATED_PHASES.len() - 1);
        Self { phase }
    }

    pub fn current(&self) -> ProgressUpdate {
        let (stage, detail, progress) = SIMULATED_PHASES[self.phase];
        ProgressUpdate {
            stage: stage.to_string(),
            detail: detail.to_string(),
            progress,
            simulated: true,
        }
    }

    /// Moves to the next phase. Returns `None` once the last phase is reached.
    pub fn advance(&mut self) -> Option<ProgressUpdate> {
        if self.is_finished() {
            return None;
        }
        self.phase += 1;
        Some(self.current())
    }

    pub fn is_finished(&self) -> bool {
        self.phase + 1 >= SIMULATED_PHASES.len()
    }
}

/// How a monitoring run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The server reported progress at or above the ceiling.
    Live,
    /// Polling failed and the simulated timeline ran to its end.
    Simulated,
}

/// Polls search progress and streams [`ProgressUpdate`]s.
pub struct ProgressMonitor {
    interval: Duration,
    updates_tx: mpsc::UnboundedSender<ProgressUpdate>,
    updates_rx: Option<mpsc::UnboundedReceiver<ProgressUpdate>>,
}

impl Default for ProgressMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMonitor {
    pub fn new() -> Self {
        Self::with_interval(POLL_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            interval,
            updates_tx,
            updates_rx: Some(updates_rx),
        }
    }

    /// Takes the update receiver. Can only be called once.
    pub fn take_updates(&mut self) -> Option<mpsc::UnboundedReceiver<ProgressUpdate>> {
        self.updates_rx.take()
    }

    /// Polls until the search is nearly done or the server stops answering.
    ///
    /// Errors are logged and never returned; the caller only learns whether
    /// the run ended on live data or on the simulated timeline.
    pub async fn run(&self, source: &dyn ProgressSource, query_id: &str) -> MonitorOutcome {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last_progress = 0.0;

        loop {
            ticker.tick().await;

            let resp = match source.fetch_progress(query_id).await {
                Ok(resp) if resp.success => resp,
                Ok(_) => {
                    warn!(query_id, "progress endpoint reported failure, simulating");
                    return self.simulate(&mut ticker, last_progress).await;
                }
                Err(e) => {
                    warn!(query_id, error = %e, "failed to poll search progress, simulating");
                    return self.simulate(&mut ticker, last_progress).await;
                }
            };

            let progress = resp.progress.clamp(0.0, 100.0);
            debug!(query_id, stage = %resp.stage, progress, "search progress");
            last_progress = progress;
            self.emit(ProgressUpdate {
                stage: resp.stage,
                detail: resp.detail,
                progress,
                simulated: false,
            });

            if progress >= PROGRESS_CEILING {
                info!(query_id, "search progress complete");
                return MonitorOutcome::Live;
            }
        }
    }

    async fn simulate(&self, ticker: &mut Interval, from: f64) -> MonitorOutcome {
        let mut timeline = SimulatedProgress::after(from);
        self.emit(timeline.current());
        while !timeline.is_finished() {
            ticker.tick().await;
            if let Some(update) = timeline.advance() {
                self.emit(update);
            }
        }
        MonitorOutcome::Simulated
    }

    fn emit(&self, update: ProgressUpdate) {
        let _ = self.updates_tx.send(update);
    }
}
