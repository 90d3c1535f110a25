//! LLM provider layer for sqlai.
//!
//! # Architecture
//!
//! - [`transport::Transport`] — one POST per call, normalized outcome
//! - [`traits::LlmProvider`] — `complete` / `embed` contract every provider implements
//! - [`anthropic::AnthropicProvider`] — messages-style API
//! - [`google::GoogleProvider`] — contents-style API (Gemini), with embeddings
//! - [`registry`] — closed name → provider mapping

pub mod anthropic;
pub mod error;
pub mod google;
pub mod registry;
mod response;
pub mod traits;
pub mod transport;

// Re-export main types for convenience
pub use anthropic::AnthropicProvider;
pub use error::{ProviderError, TransportError};
pub use google::GoogleProvider;
pub use registry::{
    create_provider, create_provider_with_transport, find_by_name, ProviderKind, ProviderSpec,
    PROVIDERS,
};
pub use traits::{LlmProvider, ProviderResult};
pub use transport::{Headers, HttpResponse, HttpTransport, Transport, TransportOutcome};
