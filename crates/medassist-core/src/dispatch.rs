//! Primary/fallback message dispatch.
//!
//! Every message goes to the plain-text chat endpoint first. When that call
//! fails for any reason the same message is retried once against the JSON
//! chat endpoint together with the prior conversation history. There are no
//! further retries and no backoff.

use std::sync::Arc;

use medassist_types::agent::{AgentReply, ChatJsonRequest, ChatRoute, HistoryMessage};
use medassist_types::error::AgentError;

use crate::transport::BoxAgentTransport;

/// A reply obtained from one of the two endpoints.
#[derive(Debug)]
pub struct DispatchSuccess {
    pub reply: AgentReply,
    /// Which endpoint produced the reply.
    pub route: ChatRoute,
    /// Set when the primary endpoint failed and the fallback answered.
    pub failover_warning: Option<String>,
}

/// Both endpoints failed.
#[derive(Debug, thiserror::Error)]
#[error("{fallback}")]
pub struct DispatchError {
    /// Error from the plain-text endpoint.
    pub primary: AgentError,
    /// Error from the JSON endpoint; this is what gets reported.
    pub fallback: AgentError,
}

/// Sends user messages to the agent with single-step failover.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<BoxAgentTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<BoxAgentTransport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<BoxAgentTransport> {
        &self.transport
    }

    /// Deliver `message`, falling back to the JSON endpoint with `history`.
    ///
    /// `history` must be the conversation as it stood before `message` was
    /// appended.
    pub async fn deliver(
        &self,
        message: &str,
        history: Vec<HistoryMessage>,
    ) -> Result<DispatchSuccess, DispatchError> {
        let primary = match self.transport.chat(message).await {
            Ok(response) => {
                tracing::debug!(route = %ChatRoute::Primary, "Agent replied");
                return Ok(DispatchSuccess {
                    reply: response.into(),
                    route: ChatRoute::Primary,
                    failover_warning: None,
                });
            }
            Err(err) => err,
        };

        tracing::warn!(
            transport = self.transport.name(),
            error = %primary,
            "Primary chat endpoint failed, trying JSON endpoint"
        );

        let request = ChatJsonRequest {
            message: message.to_string(),
            history,
        };

        match self.transport.chat_json(&request).await {
            Ok(response) => Ok(DispatchSuccess {
                reply: response.into(),
                route: ChatRoute::Fallback,
                failover_warning: Some(format!(
                    "Plain chat endpoint failed ({primary}); answered via JSON endpoint"
                )),
            }),
            Err(fallback) => {
                tracing::warn!(
                    primary = %primary,
                    fallback = %fallback,
                    "Both chat endpoints failed"
                );
                Err(DispatchError { primary, fallback })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, response};
    use medassist_types::agent::HistoryRole;
    use serde_json::json;

    fn history() -> Vec<HistoryMessage> {
        vec![HistoryMessage {
            role: HistoryRole::Assistant,
            content: "Hello".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let mock = MockTransport::replying("hi there");
        let dispatcher = Dispatcher::new(mock.boxed());

        let success = dispatcher.deliver("hi", history()).await.unwrap();
        assert_eq!(success.route, ChatRoute::Primary);
        assert_eq!(success.reply.reply, "hi there");
        assert!(success.failover_warning.is_none());
        assert_eq!(mock.primary_calls(), vec!["hi".to_string()]);
        assert!(mock.fallback_calls().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_carries_message_and_history() {
        let mock = MockTransport::new()
            .then_primary_error(AgentError::Status {
                status: 500,
                body: "boom".to_string(),
            })
            .then_fallback_reply(response(
                "via json",
                Some("predict_diabetes"),
                &["age"],
                json!({}),
            ));
        let dispatcher = Dispatcher::new(mock.boxed());

        let success = dispatcher.deliver("predict diabetes", history()).await.unwrap();
        assert_eq!(success.route, ChatRoute::Fallback);
        assert_eq!(success.reply.reply, "via json");
        assert!(success.failover_warning.unwrap().contains("HTTP 500"));
        assert_eq!(success.reply.metadata.required_params, vec!["age"]);

        let calls = mock.fallback_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].message, "predict diabetes");
        assert_eq!(calls[0].history, history());
    }

    #[tokio::test]
    async fn test_both_fail_reports_fallback_error() {
        let mock = MockTransport::new()
            .then_primary_error(AgentError::Network("refused".to_string()))
            .then_fallback_error(AgentError::Network("still refused".to_string()));
        let dispatcher = Dispatcher::new(mock.boxed());

        let err = dispatcher.deliver("hello", Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), err.fallback.to_string());
        assert!(err.to_string().contains("still refused"));
        assert_eq!(mock.primary_calls().len(), 1);
        assert_eq!(mock.fallback_calls().len(), 1);
    }
}
