//! Core HTTP plumbing and the JSON endpoints.

use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use docusearch_protocol::constants::{
    DOCUMENT_TOPICS_PATH, SEARCH_PROGRESS_PATH, TOUR_CONFIG_PATH, TOUR_RESET_PATH,
    tour_step_path,
};
use docusearch_protocol::{
    ErrorBody, SearchProgressResponse, StepUpdateRequest, TopicsResponse, TourConfig,
    TourResponse,
};

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid {0} header value")]
    InvalidHeader(String),
}

impl Error {
    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message if present, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// DocuSearch API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client rooted at `base_url` (e.g. `https://docs.example.com`).
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_session(base_url, None)
    }

    /// Creates a client that sends `session_cookie` (e.g. `session=abc`) with
    /// every request, for endpoints that need a logged-in user.
    pub fn with_session(base_url: &str, session_cookie: Option<&str>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if let Some(cookie) = session_cookie.filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| Error::InvalidHeader("cookie".into()))?;
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Self::with_http(base_url, http)
    }

    /// Creates a client over a preconfigured `reqwest::Client`.
    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Performs a GET and decodes the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let resp = self.http.get(self.url(path)).query(params).send().await?;
        decode_json(resp).await
    }

    /// Performs a POST with an optional JSON body and decodes the JSON response.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error> {
        let mut req = self.http.post(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        decode_json(req.send().await?).await
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Fetches the server-side progress of an in-flight AI search.
    pub async fn search_progress(&self, query_id: &str) -> Result<SearchProgressResponse, Error> {
        self.get_json(SEARCH_PROGRESS_PATH, &[("query_id", query_id)])
            .await
    }

    /// Fetches the topics used to seed example searches.
    pub async fn document_topics(&self) -> Result<Vec<String>, Error> {
        let resp: TopicsResponse = self.get_json(DOCUMENT_TOPICS_PATH, &[]).await?;
        debug!(count = resp.topics.len(), "document topics fetched");
        Ok(resp.topics)
    }

    // -----------------------------------------------------------------------
    // Tour
    // -----------------------------------------------------------------------

    /// Fetches the current user's onboarding tour configuration.
    pub async fn tour_config(&self) -> Result<TourConfig, Error> {
        self.get_json(TOUR_CONFIG_PATH, &[]).await
    }

    /// Marks a tour step as completed.
    pub async fn mark_tour_step(&self, step_id: &str) -> Result<TourResponse, Error> {
        let body = StepUpdateRequest { completed: true };
        self.post_json(&tour_step_path(step_id), Some(&body)).await
    }

    /// Resets the tour so it can be replayed from the start.
    pub async fn reset_tour(&self) -> Result<TourResponse, Error> {
        self.post_json::<(), _>(TOUR_RESET_PATH, None).await
    }
}

/// Decodes a response: non-2xx becomes [`Error::Api`] with the server's
/// `message` when the body carries one; 2xx must be valid JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        return Err(Error::Api {
            status: status.as_u16(),
            message: ErrorBody::message_from(&body),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
