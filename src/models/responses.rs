use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::UserSummary;

/// `{ success, response }` wrapper used by every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub response: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_out: Option<bool>,
}

impl<T> Envelope<T> {
    pub fn ok(response: T) -> Self {
        Self {
            success: true,
            response,
            message: None,
            logged_out: None,
        }
    }

    pub fn failure(response: T) -> Self {
        Self {
            success: false,
            response,
            message: None,
            logged_out: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn logged_out(mut self) -> Self {
        self.logged_out = Some(true);
        self
    }
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub username: String,
    pub id: Uuid,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A user summary with a status message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(flatten)]
    pub user: UserSummary,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesPayload {
    pub preferences: Vec<String>,
}

/// One mentor/mentee pairing as exposed over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairView {
    pub mentor: UserSummary,
    pub mentee: UserSummary,
    pub shared_preferences: Vec<String>,
}

/// Response body of the matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    pub matched_pairs: Vec<PairView>,
    pub unmatched_mentors: Vec<UserSummary>,
    pub unmatched_mentees: Vec<UserSummary>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
