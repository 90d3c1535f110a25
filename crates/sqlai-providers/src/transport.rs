//! Transport — one HTTP POST per call, normalized into a [`TransportOutcome`].
//!
//! A received response is always `Ok`, whatever its status code; reading the
//! status is the provider's job. `Err` means nothing came back, classified into
//! the fixed [`TransportError`] set.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::TransportError;

/// Request headers, name → value. Ordered so requests are reproducible.
pub type Headers = BTreeMap<String, String>;

/// Result of a single POST: a response of any status, or a transport failure.
pub type TransportOutcome = Result<HttpResponse, TransportError>;

/// A received HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status in the 200–299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ─────────────────────────────────────────────
// Endpoint parsing
// ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// An API base of the form `scheme://host[:port]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parse `scheme://host[:port]`, tolerating one trailing `/`.
    ///
    /// Anything else (other schemes, paths, empty host, bad port) is
    /// [`TransportError::InvalidUrl`].
    pub fn parse(url: &str) -> Result<Self, TransportError> {
        let (scheme, rest) = url.split_once("://").ok_or(TransportError::InvalidUrl)?;
        let scheme = match scheme {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            _ => return Err(TransportError::InvalidUrl),
        };

        let authority = rest.strip_suffix('/').unwrap_or(rest);
        if authority.contains('/') {
            return Err(TransportError::InvalidUrl);
        }

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TransportError::InvalidUrl);
                }
                let port: u16 = port.parse().map_err(|_| TransportError::InvalidUrl)?;
                if port == 0 {
                    return Err(TransportError::InvalidUrl);
                }
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };

        if host.is_empty() {
            return Err(TransportError::InvalidUrl);
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
        })
    }

    /// Absolute URL for `path` on this endpoint.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{self}{path}")
        } else {
            format!("{self}/{path}")
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Transport trait
// ─────────────────────────────────────────────

/// Issues a single POST and reports what came back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint` + `path`.
    ///
    /// `timeout` bounds connection establishment and the whole exchange.
    async fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: String,
        headers: &Headers,
        timeout: Duration,
    ) -> TransportOutcome;
}

/// Production transport backed by `reqwest`.
///
/// Builds a fresh client per call with idle pooling disabled, so no
/// connection outlives the request that opened it.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: String,
        headers: &Headers,
        timeout: Duration,
    ) -> TransportOutcome {
        let endpoint = Endpoint::parse(endpoint)?;
        let url = endpoint.url(path);

        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| classify_build_error(&e))?;

        debug!(
            host = %endpoint.host,
            port = endpoint.port,
            path = path,
            bytes = body.len(),
            "POST"
        );

        let response = client
            .post(&url)
            .headers(header_map(headers))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let kind = classify(&e);
                warn!(host = %endpoint.host, error = %e, kind = %kind, "HTTP request failed");
                kind
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            let kind = classify(&e);
            warn!(host = %endpoint.host, status, error = %e, "failed to read response body");
            kind
        })?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

/// Convert headers, skipping (and logging) any that aren't valid HTTP.
fn header_map(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(val)) => {
                map.insert(name, val);
            }
            // Value left out: it may be a credential.
            _ => warn!(header = %key, "skipping invalid header"),
        }
    }
    map
}

// ─────────────────────────────────────────────
// Error classification
// ─────────────────────────────────────────────

fn causes<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(err.source(), |&e| e.source())
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<std::io::ErrorKind> {
    causes(err).find_map(|e| e.downcast_ref::<std::io::Error>().map(|io| io.kind()))
}

fn tls_failure(err: &(dyn StdError + 'static)) -> Option<TransportError> {
    for cause in causes(err) {
        let msg = cause.to_string().to_ascii_lowercase();
        if msg.contains("certificate") || msg.contains("unknownissuer") {
            return Some(TransportError::SslServerVerification);
        }
        if msg.contains("tls") || msg.contains("ssl") || msg.contains("handshake") {
            return Some(TransportError::SslConnection);
        }
    }
    None
}

/// Map a `reqwest` send/read failure onto the fixed transport error set.
pub(crate) fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_redirect() {
        return TransportError::ExceedRedirectCount;
    }
    if let Some(tls) = tls_failure(err) {
        return tls;
    }
    if err.is_connect() {
        return match io_error_kind(err) {
            Some(std::io::ErrorKind::AddrNotAvailable | std::io::ErrorKind::AddrInUse) => {
                TransportError::BindIpAddress
            }
            _ => TransportError::Connection,
        };
    }
    if err.is_timeout() || err.is_body() {
        return TransportError::Read;
    }
    if err.is_decode() {
        return TransportError::Compression;
    }
    if err.is_request() {
        return TransportError::Write;
    }
    TransportError::Unknown
}

fn classify_build_error(err: &reqwest::Error) -> TransportError {
    let certs = causes(err).any(|c| c.to_string().to_ascii_lowercase().contains("certificate"));
    if certs {
        TransportError::SslLoadingCerts
    } else {
        TransportError::ClientInit(err.to_string())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
