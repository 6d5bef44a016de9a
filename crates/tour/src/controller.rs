//! Walks a user through the onboarding tour.

use tracing::{debug, error, info};

use docusearch_protocol::{PageFeatures, TourConfig, TourResponse};

use crate::api::TourApi;
use crate::error::TourError;
use crate::plan::{TourStep, plan_steps};

/// Step id recorded when the user finishes the tour.
const COMPLETE_STEP: &str = "complete";

/// Where the tour currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourState {
    Idle,
    Running { steps: Vec<TourStep>, index: usize },
}

/// Drives the onboarding tour for one page.
///
/// Every server error is logged and swallowed; a failing tour never gets in
/// the way of the page. Step completion is only recorded for authenticated
/// users, while anonymous users who finish or leave the tour are marked as
/// dismissed instead.
pub struct TourController<'a> {
    api: &'a dyn TourApi,
    features: PageFeatures,
    authenticated: bool,
    config: Option<TourConfig>,
    dismissed: bool,
    state: TourState,
}

impl<'a> TourController<'a> {
    pub fn new(api: &'a dyn TourApi, features: PageFeatures, authenticated: bool) -> Self {
        Self {
            api,
            features,
            authenticated,
            config: None,
            dismissed: false,
            state: TourState::Idle,
        }
    }

    /// Fetches the tour configuration. Returns `false` if it could not be loaded.
    pub async fn load(&mut self) -> bool {
        match self.api.fetch_config().await {
            Ok(config) => {
                debug!(
                    is_complete = config.is_complete,
                    steps = config.steps.len(),
                    "tour config loaded"
                );
                self.config = Some(config);
                true
            }
            Err(e) => {
                error!(error = %e, "failed to load tour configuration");
                false
            }
        }
    }

    pub fn config(&self) -> Option<&TourConfig> {
        self.config.as_ref()
    }

    pub fn state(&self) -> &TourState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TourState::Running { .. })
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Restores a dismissal remembered from an earlier visit.
    pub fn set_dismissed(&mut self, dismissed: bool) {
        self.dismissed = dismissed;
    }

    /// Whether the tour should open without being asked for.
    pub fn should_auto_show(&self) -> bool {
        self.features.tour
            && self.authenticated
            && self.config.as_ref().is_some_and(|c| !c.is_complete)
            && !self.dismissed
    }

    /// The step on screen, if the tour is running.
    pub fn current_step(&self) -> Option<&TourStep> {
        match &self.state {
            TourState::Running { steps, index } => steps.get(*index),
            TourState::Idle => None,
        }
    }

    /// `(1-based position, total steps)` of the step on screen.
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.state {
            TourState::Running { steps, index } => Some((index + 1, steps.len())),
            TourState::Idle => None,
        }
    }

    /// Opens the tour on its first step.
    ///
    /// Does nothing if the tour is already running, disabled on this page,
    /// or the configuration has not been loaded.
    pub async fn start(&mut self) -> Option<TourStep> {
        if self.is_running() || !self.features.tour {
            return None;
        }
        let steps = plan_steps(self.config.as_ref()?, &self.features.tour_targets);
        let first = steps.first()?.clone();

        info!(steps = steps.len(), "starting onboarding tour");
        self.state = TourState::Running { steps, index: 0 };
        self.enter(&first).await;
        Some(first)
    }

    /// Moves to the next step. Leaving the last step completes the tour.
    pub async fn next(&mut self) -> Option<TourStep> {
        let TourState::Running { steps, index } = &mut self.state else {
            return None;
        };
        *index += 1;
        match steps.get(*index).cloned() {
            Some(step) => {
                self.enter(&step).await;
                Some(step)
            }
            None => {
                self.complete().await;
                None
            }
        }
    }

    /// Moves back one step. Going back does not record anything.
    pub fn previous(&mut self) -> Option<&TourStep> {
        if let TourState::Running { index, .. } = &mut self.state {
            *index = index.saturating_sub(1);
        }
        self.current_step()
    }

    /// Finishes the tour.
    pub async fn complete(&mut self) {
        self.state = TourState::Idle;
        info!("onboarding tour finished");
        if self.authenticated {
            self.mark_step(COMPLETE_STEP).await;
        } else {
            self.dismissed = true;
        }
    }

    /// Closes the tour before its end.
    pub fn exit(&mut self) {
        self.state = TourState::Idle;
        debug!("onboarding tour exited");
        if !self.authenticated {
            self.dismissed = true;
        }
    }

    /// Clears tour progress on the server and, on success, restarts the tour.
    pub async fn reset(&mut self) -> Option<TourStep> {
        match self.api.reset().await.and_then(accepted) {
            Ok(config) => {
                info!("onboarding tour reset");
                if let Some(config) = config {
                    self.config = Some(config);
                }
                self.state = TourState::Idle;
                self.start().await
            }
            Err(e) => {
                error!(error = %e, "failed to reset tour");
                None
            }
        }
    }

    async fn enter(&mut self, step: &TourStep) {
        if self.authenticated {
            self.mark_step(&step.id).await;
        }
    }

    async fn mark_step(&mut self, step_id: &str) {
        match self.api.mark_step(step_id).await.and_then(accepted) {
            Ok(config) => {
                debug!(step = step_id, "tour step recorded");
                if let Some(config) = config {
                    self.config = Some(config);
                }
            }
            Err(e) => error!(step = step_id, error = %e, "failed to update tour progress"),
        }
    }
}

fn accepted(resp: TourResponse) -> Result<Option<TourConfig>, TourError> {
    if resp.success {
        Ok(resp.tour_config)
    } else {
        Err(TourError::Rejected)
    }
}
