//! Search error types.

/// Errors produced by the search helpers.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("api error: {0}")]
    Api(#[from] docusearch_api_client::Error),

    /// The progress endpoint answered but reported `success: false`.
    #[error("progress endpoint reported failure")]
    Unsuccessful,
}
