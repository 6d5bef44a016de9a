use std::future::Future;
use std::pin::Pin;

use docusearch_api_client::ApiClient;
use docusearch_protocol::{TourConfig, TourResponse};

use crate::error::TourError;

pub type TourFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TourError>> + Send + 'a>>;

/// Server calls the tour needs.
pub trait TourApi: Send + Sync {
    fn fetch_config(&self) -> TourFuture<'_, TourConfig>;

    fn mark_step<'a>(&'a self, step_id: &'a str) -> TourFuture<'a, TourResponse>;

    fn reset(&self) -> TourFuture<'_, TourResponse>;
}

impl TourApi for ApiClient {
    fn fetch_config(&self) -> TourFuture<'_, TourConfig> {
        Box::pin(async move { Ok(self.tour_config().await?) })
    }

    fn mark_step<'a>(&'a self, step_id: &'a str) -> TourFuture<'a, TourResponse> {
        Box::pin(async move { Ok(self.mark_tour_step(step_id).await?) })
    }

    fn reset(&self) -> TourFuture<'_, TourResponse> {
        Box::pin(async move { Ok(self.reset_tour().await?) })
    }
}
