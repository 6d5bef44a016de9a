use docusearch_protocol::{TourConfig, TourTargets};

/// Every step id the tour knows, in display order.
pub const STEP_ORDER: [&str; 8] = [
    "welcome",
    "dashboard",
    "search",
    "library",
    "document_view",
    "upload",
    "badges",
    "complete",
];

/// One step as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourStep {
    pub id: String,
    pub title: String,
    pub content: String,
}

fn default_title(id: &str) -> &'static str {
    match id {
        "welcome" => "Welcome to DocuSearch",
        _ => "You're all set",
    }
}

/// Builds the ordered step list for the current page.
///
/// `welcome` opens and `complete` closes every tour. The steps in between
/// are kept only when the server sent content for them and the page has
/// their target.
pub fn plan_steps(config: &TourConfig, targets: &TourTargets) -> Vec<TourStep> {
    STEP_ORDER
        .iter()
        .filter_map(|&id| {
            let bookend = id == "welcome" || id == "complete";
            match config.step(id) {
                Some(step) if targets.has(id) => Some(TourStep {
                    id: id.to_string(),
                    title: step.title.clone(),
                    content: step.content.clone(),
                }),
                None if bookend => Some(TourStep {
                    id: id.to_string(),
                    title: default_title(id).to_string(),
                    content: String::new(),
                }),
                _ => None,
            }
        })
        .collect()
}
