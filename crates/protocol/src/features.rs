use serde::{Deserialize, Serialize};

/// Page elements a tour step can point at.
///
/// A step is only planned when its target is present on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourTargets {
    pub dashboard: bool,
    pub search: bool,
    pub library: bool,
    pub document_view: bool,
    /// Only shown to users allowed to upload.
    pub upload: bool,
    pub badges: bool,
}

impl Default for TourTargets {
    fn default() -> Self {
        Self {
            dashboard: true,
            search: true,
            library: true,
            document_view: false,
            upload: true,
            badges: true,
        }
    }
}

impl TourTargets {
    /// Returns whether the page exposes the target for a tour step id.
    ///
    /// `welcome` and `complete` have no page-specific target and are always
    /// present; unknown ids are not.
    pub fn has(&self, step_id: &str) -> bool {
        match step_id {
            "welcome" | "complete" => true,
            "dashboard" => self.dashboard,
            "search" => self.search,
            "library" => self.library,
            "document_view" => self.document_view,
            "upload" => self.upload,
            "badges" => self.badges,
            _ => false,
        }
    }
}

/// Optional affordances available on the current page.
///
/// Built once from configuration and handed to the components that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFeatures {
    /// "Search in progress" overlay driven by the progress monitor.
    pub search_overlay: bool,
    /// Example searches seeded from document topics.
    pub example_suggestions: bool,
    /// Rotating example questions in the search box.
    pub placeholder_rotation: bool,
    /// Onboarding tour.
    pub tour: bool,
    pub tour_targets: TourTargets,
}

impl Default for PageFeatures {
    fn default() -> Self {
        Self {
            search_overlay: true,
            example_suggestions: true,
            placeholder_rotation: true,
            tour: true,
            tour_targets: TourTargets::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_and_complete_always_present() {
        let targets = TourTargets {
            dashboard: false,
            search: false,
            library: false,
            document_view: false,
            upload: false,
            badges: false,
        };
        assert!(targets.has("welcome"));
        assert!(targets.has("complete"));
        assert!(!targets.has("search"));
        assert!(!targets.has("settings"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let features: PageFeatures =
            serde_json::from_str(r#"{"tour":false,"tour_targets":{"document_view":true}}"#)
                .unwrap();
        assert!(!features.tour);
        assert!(features.search_overlay);
        assert!(features.tour_targets.document_view);
        assert!(features.tour_targets.dashboard);
    }
}
