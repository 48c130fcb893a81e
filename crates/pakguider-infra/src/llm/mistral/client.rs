//! MistralProvider -- concrete [`LlmProvider`] implementation for Mistral.
//!
//! Sends requests to the chat-completions API with bearer authentication.
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use secrecy::{ExposeSecret, SecretString};

use pakguider_core::llm::provider::LlmProvider;
use pakguider_observe::genai_attrs::PROVIDER_MISTRAL;
use pakguider_types::config::DEFAULT_MISTRAL_BASE_URL;
use pakguider_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

use super::types::{MistralMessage, MistralRequest, MistralResponse};

/// Mistral chat-completion provider.
pub struct MistralProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl MistralProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_MISTRAL_BASE_URL.to_string(),
            model,
        }
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_mistral_request(&self, request: &CompletionRequest) -> MistralRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        MistralRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| MistralMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            safe_prompt: request.safe_prompt,
        }
    }

    /// Check that the endpoint is reachable and the key is accepted.
    ///
    /// Lists the available models, which costs no tokens.
    pub async fn probe(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(self.url("/models"))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, body))
    }
}

fn map_send_error(err: reqwest::Error) -> LlmError {
    if err.is_connect() {
        LlmError::Connection(err.to_string())
    } else {
        LlmError::Provider {
            message: format!("HTTP request failed: {err}"),
        }
    }
}

fn map_status(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        400 | 422 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") | Some("model_length") => StopReason::MaxTokens,
        Some("error") => StopReason::Error,
        _ => StopReason::EndTurn,
    }
}

impl LlmProvider for MistralProvider {
    fn name(&self) -> &str {
        PROVIDER_MISTRAL
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_mistral_request(request);

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, error_body));
        }

        let mistral_resp: MistralResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let choice = mistral_resp
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let usage = mistral_resp.usage.unwrap_or_default();

        Ok(CompletionResponse {
            id: mistral_resp.id,
            content: choice.message.content.unwrap_or_default(),
            model: mistral_resp.model,
            stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pakguider_types::llm::Message;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_provider(base_url: &str) -> MistralProvider {
        MistralProvider::new(
            SecretString::from("test-key-not-real"),
            "mistral-large-latest".to_string(),
        )
        .with_base_url(base_url)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "mistral-large-latest".to_string(),
            messages: vec![Message::system("context"), Message::user("Hello")],
            max_tokens: 1000,
            safe_prompt: true,
        }
    }

    #[test]
    fn test_provider_name() {
        let provider = make_provider("http://localhost");
        assert_eq!(provider.name(), "mistral");
        assert_eq!(provider.model(), "mistral-large-latest");
    }

    #[test]
    fn test_empty_request_model_uses_default() {
        let provider = make_provider("http://localhost");
        let mut req = request();
        req.model = String::new();
        assert_eq!(provider.to_mistral_request(&req).model, "mistral-large-latest");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key-not-real"))
            .and(body_partial_json(json!({
                "model": "mistral-large-latest",
                "max_tokens": 1000,
                "safe_prompt": true,
                "messages": [
                    {"role": "system", "content": "context"},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-42",
                "model": "mistral-large-latest",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Welcome to Pakistan!"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = make_provider(&server.uri());
        let resp = provider.complete(&request()).await.unwrap();
        assert_eq!(resp.id, "cmpl-42");
        assert_eq!(resp.content, "Welcome to Pakistan!");
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
        assert_eq!(resp.usage.input_tokens, 20);
        assert_eq!(resp.usage.output_tokens, 5);
    }

    #[tokio::test]
    async fn test_complete_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request())
            .await
            .unwrap_err();
        match err {
            LlmError::Provider { message } => {
                assert!(message.contains("503"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("Expected Provider error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-empty",
                "choices": []
            })))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_complete_unreachable_is_connection_error() {
        // Nothing listens on port 1.
        let err = make_provider("http://127.0.0.1:1")
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.is_connection(), "expected connection error, got: {err}");
    }

    #[tokio::test]
    async fn test_probe_lists_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        make_provider(&server.uri()).probe().await.unwrap();
    }

    #[test]
    fn test_map_finish_reason() {
        assert_eq!(map_finish_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("model_length")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }
}
