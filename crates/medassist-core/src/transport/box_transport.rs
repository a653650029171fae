//! BoxAgentTransport -- object-safe dynamic dispatch wrapper for AgentTransport.
//!
//! 1. Define an object-safe `AgentTransportDyn` trait with boxed futures
//! 2. Blanket-impl `AgentTransportDyn` for all `T: AgentTransport`
//! 3. `BoxAgentTransport` wraps `Box<dyn AgentTransportDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use medassist_types::agent::{AgentResponse, ChatJsonRequest, HealthResponse};
use medassist_types::error::AgentError;

use super::provider::AgentTransport;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`AgentTransport`] with boxed futures.
pub trait AgentTransportDyn: Send + Sync {
    fn name(&self) -> &str;

    fn base_url(&self) -> &str;

    fn health_boxed(&self) -> BoxFuture<'_, Result<HealthResponse, AgentError>>;

    fn chat_boxed<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<AgentResponse, AgentError>>;

    fn chat_json_boxed<'a>(
        &'a self,
        request: &'a ChatJsonRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, AgentError>>;
}

impl<T: AgentTransport> AgentTransportDyn for T {
    fn name(&self) -> &str {
        AgentTransport::name(self)
    }

    fn base_url(&self) -> &str {
        AgentTransport::base_url(self)
    }

    fn health_boxed(&self) -> BoxFuture<'_, Result<HealthResponse, AgentError>> {
        Box::pin(self.health())
    }

    fn chat_boxed<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<AgentResponse, AgentError>> {
        Box::pin(self.chat(message))
    }

    fn chat_json_boxed<'a>(
        &'a self,
        request: &'a ChatJsonRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, AgentError>> {
        Box::pin(self.chat_json(request))
    }
}

/// Type-erased agent transport.
///
/// Since `AgentTransport` uses RPITIT, it cannot be used as a trait object
/// directly. The session and the monitor share one of these behind an `Arc`.
pub struct BoxAgentTransport {
    inner: Box<dyn AgentTransportDyn + Send + Sync>,
}

impl BoxAgentTransport {
    /// Wrap a concrete `AgentTransport` in a type-erased box.
    pub fn new<T: AgentTransport + 'static>(transport: T) -> Self {
        Self {
            inner: Box::new(transport),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub async fn health(&self) -> Result<HealthResponse, AgentError> {
        self.inner.health_boxed().await
    }

    pub async fn chat(&self, message: &str) -> Result<AgentResponse, AgentError> {
        self.inner.chat_boxed(message).await
    }

    pub async fn chat_json(&self, request: &ChatJsonRequest) -> Result<AgentResponse, AgentError> {
        self.inner.chat_json_boxed(request).await
    }
}

impl std::fmt::Debug for BoxAgentTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxAgentTransport")
            .field("name", &self.name())
            .field("base_url", &self.base_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_box_transport_delegates() {
        let boxed = BoxAgentTransport::new(MockTransport::replying("hello"));
        assert_eq!(boxed.name(), "mock");
        assert_eq!(boxed.base_url(), "http://agent.test");

        let response = boxed.chat("hi").await.unwrap();
        assert_eq!(response.reply.as_deref(), Some("hello"));
        assert!(boxed.health().await.unwrap().is_ok());
    }
}
