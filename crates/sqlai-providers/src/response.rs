//! Response interpretation shared by every provider.
//!
//! Order of checks for one [`TransportOutcome`]:
//! 1. transport failure → returned verbatim
//! 2. non-2xx status → vendor error envelope, else `HTTP <status> - <body prefix>`
//! 3. 2xx body → JSON parse, vendor error envelope, then the provider's extractor

use serde_json::Value;
use tracing::{error, warn};

use sqlai_core::utils::truncate_bytes;

use crate::error::ProviderError;
use crate::traits::ProviderResult;
use crate::transport::{HttpResponse, TransportOutcome};

/// Bytes of the raw body quoted in a synthesized HTTP error.
pub const ERROR_BODY_PREFIX_BYTES: usize = 100;

/// Text of a vendor error envelope, if the body carries one.
///
/// `error.message` when it's a string, otherwise the `error` node as compact JSON.
/// Empty messages count as absent.
pub(crate) fn error_envelope(body: &Value) -> Option<String> {
    let text = match body.get("error")? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        node => match node.get("message") {
            Some(Value::String(msg)) => msg.clone(),
            Some(other) => other.to_string(),
            None => node.to_string(),
        },
    };
    (!text.is_empty()).then_some(text)
}

/// Error for a response whose status is outside 200–299.
pub(crate) fn status_error(response: &HttpResponse) -> ProviderError {
    serde_json::from_str::<Value>(&response.body)
        .ok()
        .as_ref()
        .and_then(error_envelope)
        .map(ProviderError::Api)
        .unwrap_or_else(|| ProviderError::Http {
            status: response.status,
            body_prefix: truncate_bytes(&response.body, ERROR_BODY_PREFIX_BYTES).to_string(),
        })
}

/// Run the shared checks on `outcome`, then `extract` from the parsed body.
///
/// `missing` names the node reported when `extract` finds nothing.
pub(crate) fn interpret<F>(
    provider: &'static str,
    outcome: TransportOutcome,
    missing: &'static str,
    extract: F,
) -> ProviderResult
where
    F: FnOnce(&Value) -> Option<String>,
{
    let result = outcome
        .map_err(ProviderError::from)
        .and_then(|response| {
            if !response.is_success() {
                return Err(status_error(&response));
            }
            let value: Value = serde_json::from_str(&response.body)?;
            if let Some(msg) = error_envelope(&value) {
                return Err(ProviderError::Api(msg));
            }
            extract(&value).ok_or(ProviderError::InvalidResponse(missing))
        });

    match result {
        Err(ref e) if e.is_local() => warn!(provider, error = %e, "request not sent"),
        Err(ref e) => error!(provider, error = %e, "provider call failed"),
        Ok(_) => {}
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use serde_json::json;

    fn extract_text(v: &Value) -> Option<String> {
        v.get("text")?.as_str().map(String::from)
    }

    #[test]
    fn test_envelope_message() {
        let body = json!({"error": {"type": "auth", "message": "invalid api key"}});
        assert_eq!(error_envelope(&body).as_deref(), Some("invalid api key"));
    }

    #[test]
    fn test_envelope_without_message_is_serialized() {
        let body = json!({"error": {"code": 7}});
        assert_eq!(error_envelope(&body).as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn test_envelope_non_string_message_is_serialized() {
        let body = json!({"error": {"message": {"detail": "bad"}}});
        assert_eq!(error_envelope(&body).as_deref(), Some(r#"{"detail":"bad"}"#));

        let body = json!({"error": {"message": 42}});
        assert_eq!(error_envelope(&body).as_deref(), Some("42"));
    }

    #[test]
    fn test_envelope_plain_string() {
        let body = json!({"error": "quota exhausted"});
        assert_eq!(error_envelope(&body).as_deref(), Some("quota exhausted"));
    }

    #[test]
    fn test_envelope_absent_or_empty() {
        assert!(error_envelope(&json!({"text": "hi"})).is_none());
        assert!(error_envelope(&json!({"error": null})).is_none());
        assert!(error_envelope(&json!({"error": {"message": ""}})).is_none());
    }

    #[test]
    fn test_status_error_uses_envelope() {
        let resp = HttpResponse::new(401, r#"{"error":{"message":"invalid api key"}}"#);
        assert_eq!(
            status_error(&resp),
            ProviderError::Api("invalid api key".to_string())
        );
    }

    #[test]
    fn test_status_error_synthesized_for_non_json() {
        let body = "x".repeat(250);
        let resp = HttpResponse::new(500, body);
        let err = status_error(&resp);
        assert_eq!(err.to_string(), format!("HTTP 500 - {}", "x".repeat(100)));
    }

    #[test]
    fn test_status_error_synthesized_for_json_without_envelope() {
        let resp = HttpResponse::new(404, r#"{"detail":"nope"}"#);
        assert_eq!(status_error(&resp).to_string(), r#"HTTP 404 - {"detail":"nope"}"#);
    }

    #[test]
    fn test_interpret_transport_error_verbatim() {
        let result = interpret("Test", Err(TransportError::Connection), "text", extract_text);
        assert_eq!(result.unwrap_err().to_string(), "Connection failed");
    }

    #[test]
    fn test_interpret_local_transport_error() {
        let result = interpret(
            "Test",
            Err(TransportError::InvalidUrl),
            "text",
            extract_text,
        );
        let err = result.unwrap_err();
        assert!(err.is_local());
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[test]
    fn test_interpret_success() {
        let ok = Ok(HttpResponse::new(200, r#"{"text":"hello"}"#));
        assert_eq!(interpret("Test", ok, "text", extract_text).unwrap(), "hello");
    }

    #[test]
    fn test_interpret_missing_node() {
        let ok = Ok(HttpResponse::new(200, r#"{"other":1}"#));
        assert_eq!(
            interpret("Test", ok, "text", extract_text).unwrap_err().to_string(),
            "Invalid response format: missing text"
        );
    }

    #[test]
    fn test_interpret_malformed_json() {
        let ok = Ok(HttpResponse::new(200, "{not json"));
        let err = interpret("Test", ok, "text", extract_text).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
        assert!(err.to_string().starts_with("JSON parse error: "));
    }

    #[test]
    fn test_interpret_error_envelope_on_success_status() {
        let ok = Ok(HttpResponse::new(200, r#"{"error":{"message":"overloaded"}}"#));
        assert_eq!(
            interpret("Test", ok, "text", extract_text).unwrap_err(),
            ProviderError::Api("overloaded".to_string())
        );
    }
}
