//! Anthropic Messages API provider (`POST /v1/messages`).
//!
//! Request: `{"model", "max_tokens", "messages": [{"role": "user", "content"}]}`.
//! Reply text is `content[0].text`. There is no embeddings endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use sqlai_core::config::ProviderSettings;

use crate::error::ProviderError;
use crate::response::interpret;
use crate::traits::{LlmProvider, ProviderResult};
use crate::transport::{Headers, HttpTransport, Transport};

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const MESSAGES_PATH: &str = "/v1/messages";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 1024;

const NAME: &str = "anthropic";
const DISPLAY_NAME: &str = "Anthropic";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Message-style provider for Claude models.
pub struct AnthropicProvider {
    transport: Arc<dyn Transport>,
    api_base: String,
    timeout: Duration,
    extra_headers: Headers,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnthropicProvider {
    /// Provider using the real HTTP transport.
    pub fn new(settings: &ProviderSettings) -> Self {
        Self::with_transport(settings, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(settings: &ProviderSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_base: settings.api_base_or(DEFAULT_API_BASE).to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
            extra_headers: settings.extra_headers.clone().unwrap_or_default(),
        }
    }

    fn headers(&self, api_key: &str) -> Headers {
        let mut headers = self.extra_headers.clone();
        headers.insert(API_KEY_HEADER.to_string(), api_key.to_string());
        headers.insert("anthropic-version".to_string(), API_VERSION.to_string());
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers
    }

    fn request_body(model: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
        };
        Ok(serde_json::to_string(&request)?)
    }

    fn first_text(response: &Value) -> Option<String> {
        response
            .get("content")?
            .as_array()?
            .first()?
            .get("text")?
            .as_str()
            .map(String::from)
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, model: &str, api_key: &str, input: &str) -> ProviderResult {
        let body = Self::request_body(model, input)?;

        debug!(
            provider = DISPLAY_NAME,
            model = %model,
            prompt_bytes = input.len(),
            "Calling LLM"
        );

        let outcome = self
            .transport
            .post(
                &self.api_base,
                MESSAGES_PATH,
                body,
                &self.headers(api_key),
                self.timeout,
            )
            .await;

        interpret(DISPLAY_NAME, outcome, "content", Self::first_text)
    }

    async fn embed(&self, _model: &str, _api_key: &str, _input: &str) -> ProviderResult {
        Err(ProviderError::EmbeddingsUnsupported {
            provider: DISPLAY_NAME,
        })
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> AnthropicProvider {
        AnthropicProvider::new(&ProviderSettings::with_api_base(server.uri()))
    }

    #[test]
    fn test_request_body_shape() {
        let body = AnthropicProvider::request_body("claude-x", "hi").unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "claude-x",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_headers() {
        let provider = AnthropicProvider::new(&ProviderSettings::default());
        let headers = provider.headers("sk-ant");
        assert_eq!(headers["x-api-key"], "sk-ant");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_extra_headers_cannot_override_credential() {
        let mut extra = Headers::new();
        extra.insert("x-api-key".into(), "spoofed".into());
        extra.insert("x-trace".into(), "abc".into());
        let settings = ProviderSettings {
            extra_headers: Some(extra),
            ..Default::default()
        };
        let headers = AnthropicProvider::new(&settings).headers("real");
        assert_eq!(headers["x-api-key"], "real");
        assert_eq!(headers["x-trace"], "abc");
    }

    #[test]
    fn test_default_api_base() {
        let provider = AnthropicProvider::new(&ProviderSettings::default());
        assert_eq!(provider.api_base, "https://api.anthropic.com");
        assert_eq!(provider.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_first_text_variants() {
        use serde_json::json;
        assert_eq!(
            AnthropicProvider::first_text(&json!({"content": [{"type": "text", "text": "a"}, {"text": "b"}]})),
            Some("a".to_string())
        );
        assert_eq!(AnthropicProvider::first_text(&json!({"content": []})), None);
        assert_eq!(AnthropicProvider::first_text(&json!({"content": "text"})), None);
        assert_eq!(AnthropicProvider::first_text(&json!({"content": [{"text": 5}]})), None);
        assert_eq!(AnthropicProvider::first_text(&json!({})), None);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "k"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(serde_json::json!({
                "model": "m",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"text": "hello"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = provider_for(&mock_server).complete("m", "k", "hi").await;
        assert_eq!(result.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_complete_api_error_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid api key"}
            })))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .complete("m", "bad", "hi")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid api key");
    }

    #[tokio::test]
    async fn test_complete_http_error_without_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .complete("m", "k", "hi")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502 - Bad Gateway");
    }

    #[tokio::test]
    async fn test_complete_missing_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": []
            })))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .complete("m", "k", "hi")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid response format: missing content");
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        let provider = AnthropicProvider::new(&ProviderSettings::with_api_base("http://127.0.0.1:1"));
        let err = provider.complete("m", "k", "hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Connection failed");
    }

    #[tokio::test]
    async fn test_embed_unsupported_without_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .embed("m", "k", "text")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Embeddings not supported for Anthropic provider"
        );
    }
}
