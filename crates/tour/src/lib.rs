//! Onboarding tour for the DocuSearch client.
//!
//! The server owns tour progress; this crate decides which steps to show on
//! the current page ([`plan_steps`]) and walks a user through them
//! ([`TourController`]), recording each step on the server as it is shown.

pub mod api;
pub mod controller;
pub mod error;
pub mod plan;

pub use api::TourApi;
pub use controller::{TourController, TourState};
pub use error::TourError;
pub use plan::{STEP_ORDER, TourStep, plan_steps};
