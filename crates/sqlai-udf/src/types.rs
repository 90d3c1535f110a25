//! Argument and result records exchanged with the SQL host.
//!
//! The host hands over four nullable strings and a result record whose string
//! buffer has a fixed capacity it chose up front. Everything written into that
//! record goes through the bounded setters here.

use sqlai_core::utils::truncate_bytes;

/// Size of the host's error message field, terminator included.
pub const ERROR_MSG_CAPACITY: usize = 256;

/// Longest error message handed to the host.
pub const MAX_ERROR_LEN: usize = ERROR_MSG_CAPACITY - 1;

/// What the host should read from a [`UdfResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    /// The buffer holds a string value.
    Value,
    /// SQL `NULL`.
    Null,
    /// `error_message()` holds the reason.
    Error,
}

/// The four arguments of `ai_prompt` / `create_embed`; `None` is SQL `NULL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UdfArgs<'a> {
    pub provider: Option<&'a str>,
    pub model: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub text: Option<&'a str>,
}

impl<'a> UdfArgs<'a> {
    /// All four arguments present.
    pub fn new(provider: &'a str, model: &'a str, api_key: &'a str, text: &'a str) -> Self {
        Self {
            provider: Some(provider),
            model: Some(model),
            api_key: Some(api_key),
            text: Some(text),
        }
    }
}

/// Result record with a fixed-capacity, NUL-terminated string buffer.
///
/// At most `max_len() - 1` bytes of a value are stored; `actual_len()` is the
/// number of bytes actually written and `truncated()` tells whether the source
/// was longer. The copy is byte-exact, so a cut may land inside a UTF-8
/// sequence; [`value`](Self::value) decodes lossily.
#[derive(Clone, Debug)]
pub struct UdfResult {
    buf: Box<[u8]>,
    kind: ResultKind,
    actual_len: usize,
    truncated: bool,
    error_msg: String,
}

impl UdfResult {
    /// A result record whose buffer holds `capacity` bytes, terminator included.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            kind: ResultKind::Null,
            actual_len: 0,
            truncated: false,
            error_msg: String::new(),
        }
    }

    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Buffer capacity, terminator included.
    pub fn max_len(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written for the current value.
    pub fn actual_len(&self) -> usize {
        self.actual_len
    }

    /// Whether the last value was cut to fit the buffer.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// The whole buffer, including the terminator and any stale bytes after it.
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// The written value bytes (no terminator).
    pub fn value_bytes(&self) -> &[u8] {
        &self.buf[..self.actual_len]
    }

    /// The value as text, if the result is a value.
    pub fn value(&self) -> Option<String> {
        (self.kind == ResultKind::Value)
            .then(|| String::from_utf8_lossy(self.value_bytes()).into_owned())
    }

    /// The error message, if the result is an error.
    pub fn error_message(&self) -> Option<&str> {
        (self.kind == ResultKind::Error).then_some(self.error_msg.as_str())
    }

    pub(crate) fn set_null(&mut self) {
        self.clear();
        self.kind = ResultKind::Null;
    }

    /// Store `msg`, cut to [`MAX_ERROR_LEN`] bytes on a char boundary.
    pub(crate) fn set_error(&mut self, msg: &str) {
        self.clear();
        self.kind = ResultKind::Error;
        self.error_msg.push_str(truncate_bytes(msg, MAX_ERROR_LEN));
    }

    /// Copy up to `max_len() - 1` bytes of `text` and terminate.
    pub(crate) fn set_value(&mut self, text: &str) {
        self.clear();
        let bytes = text.as_bytes();
        let limit = self.buf.len().saturating_sub(1);
        let copy_len = bytes.len().min(limit);

        self.buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        if copy_len < self.buf.len() {
            self.buf[copy_len] = 0;
        }

        self.kind = ResultKind::Value;
        self.actual_len = copy_len;
        self.truncated = bytes.len() > limit;
    }

    fn clear(&mut self) {
        self.actual_len = 0;
        self.truncated = false;
        self.error_msg.clear();
        if let Some(first) = self.buf.first_mut() {
            *first = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_null() {
        let result = UdfResult::with_capacity(16);
        assert_eq!(result.kind(), ResultKind::Null);
        assert_eq!(result.max_len(), 16);
        assert!(result.value().is_none());
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_value_fits() {
        let mut result = UdfResult::with_capacity(16);
        result.set_value("hello");
        assert_eq!(result.kind(), ResultKind::Value);
        assert_eq!(result.actual_len(), 5);
        assert_eq!(result.value_bytes(), b"hello");
        assert_eq!(result.buffer()[5], 0);
        assert!(!result.truncated());
    }

    #[test]
    fn test_value_exactly_capacity_minus_one() {
        let mut result = UdfResult::with_capacity(6);
        result.set_value("hello");
        assert_eq!(result.actual_len(), 5);
        assert!(!result.truncated());
        assert_eq!(result.buffer(), b"hello\0");
    }

    #[test]
    fn test_value_truncated() {
        let mut result = UdfResult::with_capacity(6);
        result.set_value("hello world");
        assert_eq!(result.actual_len(), 5);
        assert_eq!(result.value().as_deref(), Some("hello"));
        assert_eq!(result.buffer()[5], 0);
        assert!(result.truncated());
    }

    #[test]
    fn test_truncation_is_byte_exact() {
        // "é" is 0xC3 0xA9
        let mut result = UdfResult::with_capacity(4);
        result.set_value("aé");
        assert_eq!(result.value_bytes(), "aé".as_bytes());
        assert!(!result.truncated());

        // capacity 3 keeps "a" + first byte of "é"
        let mut result = UdfResult::with_capacity(3);
        result.set_value("aé");
        assert_eq!(result.value_bytes(), &[b'a', 0xC3]);
        assert!(result.truncated());
    }

    #[test]
    fn test_zero_capacity_never_writes() {
        let mut result = UdfResult::with_capacity(0);
        result.set_value("x");
        assert_eq!(result.kind(), ResultKind::Value);
        assert_eq!(result.actual_len(), 0);
        assert!(result.truncated());
    }

    #[test]
    fn test_error_is_capped() {
        let mut result = UdfResult::with_capacity(8);
        result.set_error(&"e".repeat(300));
        assert_eq!(result.kind(), ResultKind::Error);
        assert_eq!(result.error_message().unwrap().len(), MAX_ERROR_LEN);
    }

    #[test]
    fn test_error_after_value_resets_state() {
        let mut result = UdfResult::with_capacity(4);
        result.set_value("too long");
        result.set_error("boom");
        assert_eq!(result.actual_len(), 0);
        assert!(!result.truncated());
        assert!(result.value().is_none());
        assert_eq!(result.error_message(), Some("boom"));

        result.set_null();
        assert_eq!(result.kind(), ResultKind::Null);
        assert!(result.error_message().is_none());
    }
}
