//! Wire models for the crisis API.
//!
//! Every endpoint answers with the same envelope: an in-body status code,
//! a human-readable message, and an optional data object. Transport-level
//! status stays 200; failures are reported inside the envelope, which is
//! what the interaction surface expects.

use crisis_core::SessionState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    /// A successful response with a payload.
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failed response; the payload slot is null.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: 500,
            message: message.into(),
            data: None,
        }
    }
}

/// Body of `POST /api/app/crisis/decision`.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub state: SessionState,
    #[serde(default)]
    pub user_action: String,
    #[serde(default)]
    pub recent_events: Vec<String>,
}

/// Body of `POST /api/app/crisis/advice`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub final_state: SessionState,
    #[serde(default)]
    pub simulation_log: Vec<String>,
}
