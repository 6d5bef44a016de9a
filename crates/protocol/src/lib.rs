//! Wire types for the DocuSearch HTTP API.
//!
//! Every request and response body the client exchanges with the server
//! lives here, together with endpoint paths and multipart field names.

pub mod constants;
pub mod features;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use features::{PageFeatures, TourTargets};
pub use messages::{
    ActionResponse, ChunkUploadResponse, SearchProgressResponse, StepUpdateRequest,
    TopicsResponse, TourResponse,
};
pub use types::{BadgeEarned, ErrorBody, TourConfig, TourStepContent};
