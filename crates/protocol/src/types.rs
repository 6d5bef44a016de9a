use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// An achievement awarded by the server when an upload finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeEarned {
    pub name: String,
    /// Badge tier. The server emits either a label or a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub level: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    /// Extracts a non-empty `message` from a raw response body.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Title and body text for one onboarding tour step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStepContent {
    pub title: String,
    pub content: String,
}

/// Per-user onboarding tour state served by `/api/tour/config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourConfig {
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub steps: HashMap<String, TourStepContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_steps: Vec<String>,
}

impl TourConfig {
    /// Returns the content for a step id, if the server provided one.
    pub fn step(&self, id: &str) -> Option<&TourStepContent> {
        self.steps.get(id)
    }

    /// Returns `true` if the server has recorded `id` as completed.
    pub fn is_step_completed(&self, id: &str) -> bool {
        self.completed_steps.iter().any(|s| s == id)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
