use serde::{Deserialize, Serialize};

use crate::types::{BadgeEarned, TourConfig};

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Response to one `POST /chunked_upload` request.
///
/// Intermediate chunks usually come back as `{}` or a status message; the
/// final chunk carries the new document id and any awarded badges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkUploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges_earned: Vec<BadgeEarned>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Response from `GET /api/search/progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchProgressResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub detail: String,
    /// Percentage in `0..=100`.
    #[serde(default)]
    pub progress: f64,
}

/// Response from `GET /api/document-topics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicsResponse {
    #[serde(default)]
    pub topics: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tour
// ---------------------------------------------------------------------------

/// Body of `POST /api/tour/step/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUpdateRequest {
    pub completed: bool,
}

/// Response from the tour step and reset endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_config: Option<TourConfig>,
}

// ---------------------------------------------------------------------------
// Admin actions
// ---------------------------------------------------------------------------

/// Generic `{success, message}` response used by the thumbnail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_response_intermediate_is_empty_object() {
        let resp: ChunkUploadResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.document_id.is_none());
        assert!(resp.badges_earned.is_empty());
    }

    #[test]
    fn chunk_response_final_carries_document_and_badges() {
        let json = r#"{
            "document_id": "d-42",
            "badges_earned": [{"name": "First Upload", "level": 1}]
        }"#;
        let resp: ChunkUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.document_id.as_deref(), Some("d-42"));
        assert_eq!(resp.badges_earned.len(), 1);
        assert_eq!(resp.badges_earned[0].name, "First Upload");
        assert_eq!(resp.badges_earned[0].level, "1");
    }

    #[test]
    fn chunk_response_omits_empty_fields() {
        let json = serde_json::to_string(&ChunkUploadResponse::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn search_progress_parses() {
        let json = r#"{"success":true,"stage":"Ranking","detail":"12 docs","progress":64}"#;
        let resp: SearchProgressResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.stage, "Ranking");
        assert_eq!(resp.progress, 64.0);
    }

    #[test]
    fn topics_missing_field_is_empty() {
        let resp: TopicsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.topics.is_empty());
    }

    #[test]
    fn step_update_serializes_completed() {
        let json = serde_json::to_string(&StepUpdateRequest { completed: true }).unwrap();
        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn tour_response_without_config() {
        let resp: TourResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.tour_config.is_none());
    }

    #[test]
    fn action_response_defaults_message() {
        let resp: ActionResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.message.is_empty());
    }
}
