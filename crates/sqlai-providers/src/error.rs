//! Error taxonomy for transport and provider calls.
//!
//! The `Display` output of these types is exactly the message handed back to
//! the SQL caller, so variant wording is part of the external contract.

use thiserror::Error;

/// No HTTP response was obtained.
///
/// Any response, whatever its status code, is a successful transport outcome;
/// these variants only cover the cases where nothing came back.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Connection failed")]
    Connection,

    #[error("Failed to bind IP address")]
    BindIpAddress,

    #[error("Read error")]
    Read,

    #[error("Write error")]
    Write,

    #[error("Too many redirects")]
    ExceedRedirectCount,

    #[error("Request canceled")]
    Canceled,

    #[error("SSL connection failed")]
    SslConnection,

    #[error("Failed to load SSL certificates")]
    SslLoadingCerts,

    #[error("SSL server verification failed")]
    SslServerVerification,

    #[error("Unsupported multipart boundary characters")]
    UnsupportedMultipartBoundaryChars,

    #[error("Compression error")]
    Compression,

    #[error("Unknown error")]
    Unknown,

    #[error("HTTP client initialization failed: {0}")]
    ClientInit(String),
}

/// Everything a provider call can fail with.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The vendor returned its own error envelope.
    #[error("{0}")]
    Api(String),

    /// Non-2xx status without a usable error envelope.
    #[error("HTTP {status} - {body_prefix}")]
    Http { status: u16, body_prefix: String },

    /// A 2xx body that lacks the node we extract from.
    #[error("Invalid response format: missing {0}")]
    InvalidResponse(&'static str),

    /// The body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Embeddings not supported for {provider} provider")]
    EmbeddingsUnsupported { provider: &'static str },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl ProviderError {
    /// Whether this error was raised before any network I/O was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingsUnsupported { .. }
                | Self::UnknownProvider(_)
                | Self::Transport(TransportError::InvalidUrl)
                | Self::Transport(TransportError::ClientInit(_))
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_messages() {
        assert_eq!(TransportError::Connection.to_string(), "Connection failed");
        assert_eq!(TransportError::InvalidUrl.to_string(), "Invalid URL format");
        assert_eq!(
            TransportError::SslServerVerification.to_string(),
            "SSL server verification failed"
        );
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: ProviderError = TransportError::Read.into();
        assert_eq!(err.to_string(), "Read error");
    }

    #[test]
    fn test_http_error_message() {
        let err = ProviderError::Http {
            status: 502,
            body_prefix: "<html>bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502 - <html>bad gateway");
    }

    #[test]
    fn test_unsupported_embeddings_message() {
        let err = ProviderError::EmbeddingsUnsupported { provider: "Anthropic" };
        assert_eq!(
            err.to_string(),
            "Embeddings not supported for Anthropic provider"
        );
        assert!(err.is_local());
    }

    #[test]
    fn test_parse_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProviderError = serde_err.into();
        assert!(err.to_string().starts_with("JSON parse error: "));
        assert!(!err.is_local());
    }
}
