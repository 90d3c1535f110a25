//! Utility helpers — path resolution and byte-bounded string slicing.

use std::path::PathBuf;

/// Get the sqlai data directory (e.g. `~/.sqlai/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".sqlai")
}

/// Longest prefix of `s` that is at most `max_bytes` long and ends on a char boundary.
///
/// Never splits a UTF-8 sequence, so the result can be shorter than `max_bytes`
/// even when `s` is longer.
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Helper to get home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}
