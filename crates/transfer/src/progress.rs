/// Chunk progress for one file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FileProgress {
    pub name: String,
    pub chunks_done: u32,
    pub total_chunks: u32,
}

impl FileProgress {
    /// Percentage `(chunks_done / total_chunks) * 100`.
    pub fn percentage(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        self.chunks_done as f64 / self.total_chunks as f64 * 100.0
    }
}

/// Folds chunk completion events into per-file and whole-batch progress.
///
/// Files are addressed by the slot returned from [`register`](Self::register).
#[derive(Debug, Clone, Default)]
pub struct ProgressAggregator {
    files: Vec<FileProgress>,
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns its slot.
    pub fn register(&mut self, name: impl Into<String>, total_chunks: u32) -> usize {
        self.files.push(FileProgress {
            name: name.into(),
            chunks_done: 0,
            total_chunks,
        });
        self.files.len() - 1
    }

    /// Records that `chunks_done` of `total_chunks` are finished for `slot`.
    ///
    /// Counts never move backwards; a stale report is ignored.
    pub fn record(&mut self, slot: usize, chunks_done: u32, total_chunks: u32) {
        if let Some(file) = self.files.get_mut(slot) {
            file.total_chunks = total_chunks;
            file.chunks_done = file.chunks_done.max(chunks_done.min(total_chunks));
        }
    }

    pub fn file(&self, slot: usize) -> Option<&FileProgress> {
        self.files.get(slot)
    }

    pub fn files(&self) -> &[FileProgress] {
        &self.files
    }

    /// Whole-batch percentage: total chunks done over total chunks.
    pub fn batch_percentage(&self) -> f64 {
        let (done, total) = self.files.iter().fold((0u64, 0u64), |(d, t), f| {
            (d + f.chunks_done as u64, t + f.total_chunks as u64)
        });
        if total == 0 {
            return 0.0;
        }
        done as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// BatchState
// ---------------------------------------------------------------------------

/// Failure detail kept for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub file_name: String,
    pub message: String,
}

/// Completion counters for a batch of independent upload sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchState {
    total: usize,
    completed: usize,
    failures: Vec<BatchFailure>,
}

impl BatchState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_failed(&mut self, file_name: impl Into<String>, message: impl Into<String>) {
        self.failures.push(BatchFailure {
            file_name: file_name.into(),
            message: message.into(),
        });
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    /// Every session has either completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.completed + self.failed() == self.total
    }

    /// Terminal with no failures.
    pub fn is_full_success(&self) -> bool {
        self.is_terminal() && self.failures.is_empty()
    }
}
