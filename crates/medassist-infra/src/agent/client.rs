//! HttpAgentClient -- concrete [`AgentTransport`] over the agent's HTTP API.
//!
//! Talks to three endpoints on one base URL: a health probe, the plain-text
//! chat endpoint, and the JSON chat endpoint used as the fallback route.
//! Non-2xx responses become [`AgentError::Status`] carrying the response body.

use medassist_core::transport::AgentTransport;
use medassist_types::agent::{AgentResponse, ChatJsonRequest, HealthResponse};
use medassist_types::config::AgentEndpointConfig;
use medassist_types::error::AgentError;
use serde::de::DeserializeOwned;

/// Agent transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
    health_url: String,
    chat_url: String,
    chat_json_url: String,
}

impl HttpAgentClient {
    /// Build a client for the configured endpoints.
    ///
    /// The request timeout bounds every call, including a chat that never
    /// answers.
    pub fn new(config: &AgentEndpointConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AgentError::InvalidRequest(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base().to_string(),
            health_url: config.url(&config.health_path),
            chat_url: config.url(&config.chat_path),
            chat_json_url: config.url(&config.chat_json_path),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AgentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AgentError::Deserialization(e.to_string()))
    }
}

fn network_error(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Network(format!("request timed out: {err}"))
    } else {
        AgentError::Network(err.to_string())
    }
}

impl AgentTransport for HttpAgentClient {
    fn name(&self) -> &str {
        "http"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn health(&self) -> Result<HealthResponse, AgentError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(network_error)?;
        Self::read_json(response).await
    }

    async fn chat(&self, message: &str) -> Result<AgentResponse, AgentError> {
        tracing::debug!(url = %self.chat_url, chars = message.len(), "POST plain chat");
        let response = self
            .client
            .post(&self.chat_url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(message.to_string())
            .send()
            .await
            .map_err(network_error)?;
        Self::read_json(response).await
    }

    async fn chat_json(&self, request: &ChatJsonRequest) -> Result<AgentResponse, AgentError> {
        tracing::debug!(
            url = %self.chat_json_url,
            history = request.history.len(),
            "POST JSON chat"
        );
        let response = self
            .client
            .post(&self.chat_json_url)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_types::agent::{HistoryMessage, HistoryRole};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpAgentClient {
        let config = AgentEndpointConfig {
            base_url: format!("{}/", server.uri()),
            ..Default::default()
        };
        HttpAgentClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.base_url(), server.uri());
        assert!(client.health().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_chat_sends_plain_text_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agent/chat"))
            .and(header("content-type", "text/plain; charset=utf-8"))
            .and(body_string("predict diabetes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": "How old is the patient?",
                "messages": [],
                "intent": "predict_diabetes",
                "required_params": ["age"],
                "extracted_data": {},
                "model_result": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).chat("predict diabetes").await.unwrap();
        assert_eq!(response.reply.as_deref(), Some("How old is the patient?"));
        assert_eq!(response.required_params, Some(vec!["age".to_string()]));
    }

    #[tokio::test]
    async fn test_chat_json_posts_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agent/chat-json"))
            .and(body_json(json!({
                "message": "45",
                "history": [{"role": "assistant", "content": "Age?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Thanks"})))
            .mount(&server)
            .await;

        let request = ChatJsonRequest {
            message: "45".to_string(),
            history: vec![HistoryMessage {
                role: HistoryRole::Assistant,
                content: "Age?".to_string(),
            }],
        };
        let response = client_for(&server).chat_json(&request).await.unwrap();
        assert_eq!(response.reply.as_deref(), Some("Thanks"));
    }

    #[tokio::test]
    async fn test_non_success_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agent/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
            .mount(&server)
            .await;

        let err = client_for(&server).chat("hi").await.unwrap_err();
        match err {
            AgentError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal failure");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_maps_to_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agent/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).chat("hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = AgentEndpointConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = HttpAgentClient::new(&config).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, AgentError::Network(_)));
    }
}
