//! Wire and normalized types for the MedAssist agent service.
//!
//! The agent exposes three endpoints: a liveness probe, a plain-text chat
//! endpoint, and a JSON chat endpoint that also accepts prior conversation
//! history. Both chat endpoints answer with the same [`AgentResponse`] shape,
//! which is normalized into an [`AgentReply`] before it reaches the transcript.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reply text used when the agent answers without a `reply` field.
pub const NO_REPLY_PLACEHOLDER: &str = "The agent returned no reply.";

/// Value of the health endpoint's `status` field when the service is up.
pub const HEALTH_OK: &str = "ok";

/// Response body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Whether the service reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_OK
    }
}

/// Raw response body of both chat endpoints.
///
/// Every field is optional on the wire. Unknown fields (the service also
/// echoes a `messages` list) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub required_params: Option<Vec<String>>,
    #[serde(default)]
    pub extracted_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub model_result: Option<Value>,
}

/// Structured metadata attached to an agent turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// Backend-classified label of the request (e.g. `predict_diabetes`).
    pub intent: Option<String>,
    /// Parameters the backend still needs, in the order it reported them.
    pub required_params: Vec<String>,
    /// Values the backend already parsed out of the user's text.
    pub extracted_data: Map<String, Value>,
    /// Opaque prediction payload, passed through for display.
    pub model_result: Option<Value>,
}

impl AgentMetadata {
    /// Whether the backend is still asking for parameters.
    pub fn needs_parameters(&self) -> bool {
        !self.required_params.is_empty()
    }
}

/// A chat response normalized into reply text plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub reply: String,
    pub metadata: AgentMetadata,
}

impl From<AgentResponse> for AgentReply {
    fn from(response: AgentResponse) -> Self {
        Self {
            reply: response
                .reply
                .unwrap_or_else(|| NO_REPLY_PLACEHOLDER.to_string()),
            metadata: AgentMetadata {
                intent: response.intent,
                required_params: response.required_params.unwrap_or_default(),
                extracted_data: response.extracted_data.unwrap_or_default(),
                model_result: response.model_result,
            },
        }
    }
}

/// Role of a prior message in the JSON chat request's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

impl fmt::Display for HistoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRole::User => write!(f, "user"),
            HistoryRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One prior message sent along with a JSON chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: HistoryRole,
    pub content: String,
}

/// Body of `POST /agent/chat-json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatJsonRequest {
    pub message: String,
    pub history: Vec<HistoryMessage>,
}

/// Which chat transport delivered a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRoute {
    /// Plain-text chat endpoint.
    Primary,
    /// JSON chat endpoint with history.
    Fallback,
}

impl fmt::Display for ChatRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRoute::Primary => write!(f, "primary"),
            ChatRoute::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for ChatRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(ChatRoute::Primary),
            "fallback" => Ok(ChatRoute::Fallback),
            other => Err(format!("invalid chat route: '{other}'")),
        }
    }
}
