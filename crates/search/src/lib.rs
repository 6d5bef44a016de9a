//! Search-side helpers for the DocuSearch client.
//!
//! - [`validate_query`]: rejects blank queries before any request.
//! - [`ProgressMonitor`]: polls the search progress endpoint and falls back
//!   to a [`SimulatedProgress`] timeline when the server cannot answer.
//! - [`load_topics`] / [`suggestions`]: example searches seeded from the
//!   document topics, never empty.
//! - [`PlaceholderRotator`]: rotating example questions for the search box.

pub mod error;
pub mod placeholder;
pub mod progress;
pub mod query;
pub mod topics;

pub use error::SearchError;
pub use placeholder::{FOCUS_PROMPT, PlaceholderRotator, ROTATION_INTERVAL, question_pool};
pub use progress::{
    MonitorOutcome, POLL_INTERVAL, PROGRESS_CEILING, ProgressMonitor, ProgressSource,
    ProgressUpdate, SimulatedProgress,
};
pub use query::validate_query;
pub use topics::{FALLBACK_TOPICS, TopicSource, load_topics, suggestions};
