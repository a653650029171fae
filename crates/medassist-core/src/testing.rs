//! Scripted transport shared by the core tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Notify;

use medassist_types::agent::{AgentResponse, ChatJsonRequest, HealthResponse};
use medassist_types::error::AgentError;

use crate::transport::{AgentTransport, BoxAgentTransport};

#[derive(Default)]
struct MockState {
    primary: Mutex<VecDeque<Result<AgentResponse, AgentError>>>,
    fallback: Mutex<VecDeque<Result<AgentResponse, AgentError>>>,
    health: Mutex<VecDeque<Result<HealthResponse, AgentError>>>,
    primary_calls: Mutex<Vec<String>>,
    fallback_calls: Mutex<Vec<ChatJsonRequest>>,
    health_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

/// Transport that answers from scripted queues and records every call.
///
/// Unscripted chat calls fail with a network error; unscripted health
/// probes report `ok`.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<MockState>,
}

pub(crate) fn response(
    reply: &str,
    intent: Option<&str>,
    required: &[&str],
    extracted: Value,
) -> AgentResponse {
    AgentResponse {
        reply: Some(reply.to_string()),
        intent: intent.map(str::to_string),
        required_params: Some(required.iter().map(|s| s.to_string()).collect()),
        extracted_data: extracted.as_object().cloned(),
        model_result: None,
    }
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::new().then_reply(response(text, None, &[], Value::Null))
    }

    /// Block every chat call until `gate` is notified.
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            state: Arc::new(MockState {
                gate: Some(gate),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn then_reply(self, reply: AgentResponse) -> Self {
        self.state.primary.lock().unwrap().push_back(Ok(reply));
        self
    }

    pub(crate) fn then_primary_error(self, err: AgentError) -> Self {
        self.state.primary.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn then_fallback_reply(self, reply: AgentResponse) -> Self {
        self.state.fallback.lock().unwrap().push_back(Ok(reply));
        self
    }

    pub(crate) fn then_fallback_error(self, err: AgentError) -> Self {
        self.state.fallback.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn then_health(self, result: Result<&str, AgentError>) -> Self {
        let result = result.map(|status| HealthResponse {
            status: status.to_string(),
        });
        self.state.health.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn boxed(&self) -> Arc<BoxAgentTransport> {
        Arc::new(BoxAgentTransport::new(self.clone()))
    }

    pub(crate) fn primary_calls(&self) -> Vec<String> {
        self.state.primary_calls.lock().unwrap().clone()
    }

    pub(crate) fn fallback_calls(&self) -> Vec<ChatJsonRequest> {
        self.state.fallback_calls.lock().unwrap().clone()
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.state.health_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.state.gate {
            gate.notified().await;
        }
    }
}

impl AgentTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    fn base_url(&self) -> &str {
        "http://agent.test"
    }

    async fn health(&self) -> Result<HealthResponse, AgentError> {
        self.state.health_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .health
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HealthResponse {
                    status: "ok".to_string(),
                })
            })
    }

    async fn chat(&self, message: &str) -> Result<AgentResponse, AgentError> {
        self.state
            .primary_calls
            .lock()
            .unwrap()
            .push(message.to_string());
        self.wait_for_gate().await;
        let next = self.state.primary.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AgentError::Network("no scripted primary reply".to_string())))
    }

    async fn chat_json(&self, request: &ChatJsonRequest) -> Result<AgentResponse, AgentError> {
        self.state
            .fallback_calls
            .lock()
            .unwrap()
            .push(request.clone());
        let next = self.state.fallback.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AgentError::Network("no scripted fallback reply".to_string())))
    }
}
