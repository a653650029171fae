//! AgentTransport trait definition.
//!
//! This is the core abstraction over the remote agent service. Uses RPITIT
//! for every call so implementations can be plain `async fn`s.

use medassist_types::agent::{AgentResponse, ChatJsonRequest, HealthResponse};
use medassist_types::error::AgentError;

/// Trait for reaching the agent service.
///
/// Implementations live in medassist-infra (e.g., `HttpAgentClient`).
pub trait AgentTransport: Send + Sync {
    /// Human-readable transport name (e.g., "http").
    fn name(&self) -> &str;

    /// Service address, surfaced in user-visible error text.
    fn base_url(&self) -> &str;

    /// Liveness probe.
    fn health(&self) -> impl std::future::Future<Output = Result<HealthResponse, AgentError>> + Send;

    /// Send a raw utterance to the plain-text chat endpoint.
    fn chat(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<AgentResponse, AgentError>> + Send;

    /// Send a message plus prior history to the JSON chat endpoint.
    fn chat_json(
        &self,
        request: &ChatJsonRequest,
    ) -> impl std::future::Future<Output = Result<AgentResponse, AgentError>> + Send;
}
