//! Example searches seeded from the document topics endpoint.

use tracing::{debug, warn};

use docusearch_api_client::ApiClient;

use crate::error::SearchError;
use crate::progress::SourceFuture;

/// Topics used whenever the server has none to offer.
pub const FALLBACK_TOPICS: &[&str] = &[
    "Customer Service",
    "Digital Engagement",
    "Product Management",
    "Industry Insights",
    "Technology News",
    "Service Technology",
];

/// Something that can list document topics.
pub trait TopicSource: Send + Sync {
    fn fetch_topics(&self) -> SourceFuture<'_, Vec<String>>;
}

impl TopicSource for ApiClient {
    fn fetch_topics(&self) -> SourceFuture<'_, Vec<String>> {
        Box::pin(async move { Ok(self.document_topics().await?) })
    }
}

fn fallback() -> Vec<String> {
    FALLBACK_TOPICS.iter().map(|t| t.to_string()).collect()
}

/// Loads topics from `source`, falling back to [`FALLBACK_TOPICS`] on error
/// or when the server returns no usable topic. Never returns an empty list.
pub async fn load_topics(source: &dyn TopicSource) -> Vec<String> {
    match source.fetch_topics().await {
        Ok(topics) => {
            let topics: Vec<String> = topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if topics.is_empty() {
                debug!("no document topics, using fallback list");
                fallback()
            } else {
                topics
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to load document topics, using fallback list");
            fallback()
        }
    }
}

/// Picks up to `limit` distinct suggestions from `topics`, in order.
///
/// At least one suggestion is always returned: an empty `topics` falls back
/// to [`FALLBACK_TOPICS`], and a `limit` of zero is treated as one.
pub fn suggestions(topics: &[String], limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut picked: Vec<String> = Vec::with_capacity(limit);
    for topic in topics {
        if picked.len() == limit {
            break;
        }
        if !picked.iter().any(|p| p.eq_ignore_ascii_case(topic)) {
            picked.push(topic.clone());
        }
    }
    if picked.is_empty() {
        return fallback().into_iter().take(limit).collect();
    }
    picked
}
