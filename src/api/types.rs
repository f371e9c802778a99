//! API request and response types

use crate::engine::{DonationContext, SessionSnapshot, TranscriptEntry, TurnResult, Variant};
use serde::{Deserialize, Serialize};

/// Request to create a new session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Variant name or legacy condition code
    pub condition: String,
    pub donation_context: DonationContext,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub opening_message: String,
    pub condition: Variant,
}

/// Request to process one user utterance
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
}

/// Turn result plus the full transcript
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    #[serde(flatten)]
    pub result: TurnResult,
    pub history: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub opening_message: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub snapshot: SessionSnapshot,
}

/// Campaign form fields
#[derive(Debug, Deserialize)]
pub struct ScenarioSetupRequest {
    pub organization: String,
    pub cause: String,
    pub amounts: String,
    pub impact: String,
}

#[derive(Debug, Serialize)]
pub struct ScenarioSetupResponse {
    pub donation_context: DonationContext,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub active_sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
