use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{Match, RenterSwipe};

/// Response for the submit swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSwipeResponse {
    pub matched: bool,
    #[serde(rename = "matchId", skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}

impl SubmitSwipeResponse {
    pub fn from_match(record: Option<&Match>) -> Self {
        Self {
            matched: record.is_some(),
            match_id: record.map(|m| m.id),
        }
    }
}

/// Response listing a user's matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub matches: Vec<Match>,
    pub count: usize,
}

/// Response listing renters who swiped right on a landlord's listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestedRentersResponse {
    #[serde(rename = "landlordId")]
    pub landlord_id: Uuid,
    pub interested: Vec<RenterSwipe>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
