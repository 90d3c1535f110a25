//! LLM Provider trait — the contract every backend implements.
//!
//! Both operations are text in, text out. Embeddings come back as the vendor's
//! vector re-serialized as a JSON array string, never as decoded floats.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Outcome of a provider call: extracted text, or the error to report.
pub type ProviderResult = Result<String, ProviderError>;

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `input` as a single user turn to `model` and return the reply text.
    ///
    /// Transport failures, HTTP error statuses and malformed bodies all come
    /// back as `Err`; nothing panics.
    async fn complete(&self, model: &str, api_key: &str, input: &str) -> ProviderResult;

    /// Embed `input` with `model`, returning the vector as JSON text (e.g. `"[0.1,0.2]"`).
    async fn embed(&self, model: &str, api_key: &str, input: &str) -> ProviderResult;

    /// Registry name (e.g. `"anthropic"`).
    fn name(&self) -> &'static str;

    /// Display name for logs and messages.
    fn display_name(&self) -> &'static str;
}
