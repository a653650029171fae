//! Stub agent shared by the api tests.

use serde_json::json;

use medassist_core::transport::{AgentTransport, BoxAgentTransport};
use medassist_types::agent::{AgentResponse, ChatJsonRequest, HealthResponse};
use medassist_types::config::ClientConfig;
use medassist_types::error::AgentError;

use crate::state::AppState;

/// Agent that asks for age and sex until a message carries an age.
pub(crate) struct StubAgent;

impl StubAgent {
    fn answer(message: &str) -> AgentResponse {
        if message.contains("45") {
            AgentResponse {
                reply: Some("Estimated risk: low.".to_string()),
                intent: Some("diabetes_risk".to_string()),
                model_result: Some(json!({"risk": 0.12})),
                ..Default::default()
            }
        } else {
            AgentResponse {
                reply: Some("I need a few details.".to_string()),
                intent: Some("diabetes_risk".to_string()),
                required_params: Some(vec!["age".to_string(), "gender".to_string()]),
                ..Default::default()
            }
        }
    }
}

impl AgentTransport for StubAgent {
    fn name(&self) -> &str {
        "stub"
    }

    fn base_url(&self) -> &str {
        "http://agent.test"
    }

    async fn health(&self) -> Result<HealthResponse, AgentError> {
        Ok(HealthResponse {
            status: "ok".to_string(),
        })
    }

    async fn chat(&self, message: &str) -> Result<AgentResponse, AgentError> {
        Ok(Self::answer(message))
    }

    async fn chat_json(&self, request: &ChatJsonRequest) -> Result<AgentResponse, AgentError> {
        Ok(Self::answer(&request.message))
    }
}

/// App state over the stub agent, opening with a greeting and no monitor.
pub(crate) fn stub_state() -> AppState {
    let config = ClientConfig {
        greeting: Some("Case created.".to_string()),
        ..Default::default()
    };
    AppState::with_transport(config, BoxAgentTransport::new(StubAgent))
}
