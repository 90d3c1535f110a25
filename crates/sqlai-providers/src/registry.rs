//! Provider registry — the closed set of supported providers.
//!
//! Each `ProviderSpec` describes one provider: its registry name, wire
//! defaults, and the env var a CLI user would keep the key in. Lookup is by
//! exact, case-sensitive name; there is no fallback provider.

use std::sync::Arc;

use sqlai_core::config::ProvidersConfig;

use crate::anthropic::{self, AnthropicProvider};
use crate::error::ProviderError;
use crate::google::{self, GoogleProvider};
use crate::traits::LlmProvider;
use crate::transport::{HttpTransport, Transport};

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// The two request/response schema families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Messages-style API (Anthropic).
    Anthropic,
    /// Contents-style API (Google Gemini).
    Google,
}

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Registry name used by callers (e.g. `"anthropic"`).
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"Anthropic"`.
    pub display_name: &'static str,
    pub kind: ProviderKind,
    /// Base URL used when config doesn't override it.
    pub default_api_base: &'static str,
    /// Header that carries the credential.
    pub credential_header: &'static str,
    /// Conventional environment variable holding an API key.
    pub env_key: &'static str,
    pub supports_embeddings: bool,
}

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic",
        kind: ProviderKind::Anthropic,
        default_api_base: anthropic::DEFAULT_API_BASE,
        credential_header: anthropic::API_KEY_HEADER,
        env_key: "ANTHROPIC_API_KEY",
        supports_embeddings: false,
    },
    ProviderSpec {
        name: "google",
        display_name: "Google",
        kind: ProviderKind::Google,
        default_api_base: google::DEFAULT_API_BASE,
        credential_header: google::API_KEY_HEADER,
        env_key: "GEMINI_API_KEY",
        supports_embeddings: true,
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

impl ProviderKind {
    /// Resolve a registry name to its kind.
    pub fn from_name(name: &str) -> Option<Self> {
        find_by_name(name).map(|spec| spec.kind)
    }

    pub fn spec(self) -> &'static ProviderSpec {
        // PROVIDERS holds exactly one entry per kind
        match self {
            ProviderKind::Anthropic => &PROVIDERS[0],
            ProviderKind::Google => &PROVIDERS[1],
        }
    }
}

/// Build a fresh provider for `name` using the real HTTP transport.
pub fn create_provider(
    name: &str,
    config: &ProvidersConfig,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    create_provider_with_transport(name, config, Arc::new(HttpTransport::new()))
}

/// Build a fresh provider for `name` that sends through `transport`.
///
/// Unknown names yield [`ProviderError::UnknownProvider`].
pub fn create_provider_with_transport(
    name: &str,
    config: &ProvidersConfig,
    transport: Arc<dyn Transport>,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let kind = ProviderKind::from_name(name)
        .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?;

    let provider: Box<dyn LlmProvider> = match kind {
        ProviderKind::Anthropic => Box::new(AnthropicProvider::with_transport(
            &config.anthropic,
            transport,
        )),
        ProviderKind::Google => Box::new(GoogleProvider::with_transport(&config.google, transport)),
    };
    Ok(provider)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
