//! Google Gemini provider (`generateContent` / `embedContent`).
//!
//! The model id is part of the path: `/v1beta/models/{model}:generateContent`.
//! Reply text is `candidates[0].content.parts[0].text`; embeddings are
//! `embedding.values`, handed back as compact JSON.

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
use crate::transport::{Headers, HttpTransport, Transport, TransportOutcome};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

const NAME: &str = "google";
const DISPLAY_NAME: &str = "Google";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

fn generate_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

fn embed_path(model: &str) -> String {
    format!("/v1beta/models/{model}:embedContent")
}

/// Content-style provider for Gemini models.
pub struct GoogleProvider {
    transport: Arc<dyn Transport>,
    api_base: String,
    timeout: Duration,
    extra_headers: Headers,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GoogleProvider {
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
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers
    }

    async fn post(&self, path: &str, body: String, api_key: &str) -> TransportOutcome {
        self.transport
            .post(&self.api_base, path, body, &self.headers(api_key), self.timeout)
            .await
    }

    fn candidate_text(response: &Value) -> Option<String> {
        response
            .get("candidates")?
            .as_array()?
            .first()?
            .get("content")?
            .get("parts")?
            .as_array()?
            .first()?
            .get("text")?
            .as_str()
            .map(String::from)
    }

    fn embedding_values(response: &Value) -> Option<String> {
        let values = response.get("embedding")?.get("values")?;
        values.is_array().then(|| values.to_string())
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    async fn complete(&self, model: &str, api_key: &str, input: &str) -> ProviderResult {
        let body = serde_json::to_string(&GenerateContentRequest {
            contents: vec![Content::text(input)],
        })
        .map_err(ProviderError::from)?;

        debug!(
            provider = DISPLAY_NAME,
            model = %model,
            prompt_bytes = input.len(),
            "Calling LLM"
        );

        let outcome = self.post(&generate_path(model), body, api_key).await;
        interpret(
            DISPLAY_NAME,
            outcome,
            "candidates or content",
            Self::candidate_text,
        )
    }

    async fn embed(&self, model: &str, api_key: &str, input: &str) -> ProviderResult {
        let body = serde_json::to_string(&EmbedContentRequest {
            content: Content::text(input),
        })
        .map_err(ProviderError::from)?;

        debug!(
            provider = DISPLAY_NAME,
            model = %model,
            text_bytes = input.len(),
            "Requesting embedding"
        );

        let outcome = self.post(&embed_path(model), body, api_key).await;
        interpret(
            DISPLAY_NAME,
            outcome,
            "embedding.values",
            Self::embedding_values,
        )
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
