/// Errors produced by tour operations.
///
/// The controller logs these and carries on; they are only returned from
/// the [`TourApi`](crate::TourApi) seam.
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("api error: {0}")]
    Api(#[from] docusearch_api_client::Error),

    /// The server answered with `success: false`.
    #[error("tour update rejected by server")]
    Rejected,
}
