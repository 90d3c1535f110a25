//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig` → one `ProviderSettings` per provider.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! Credentials are deliberately absent: every call supplies its own API key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request timeout applied when a provider section doesn't set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.sqlai/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Connection settings for a single provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Custom API base URL (`scheme://host[:port]`), overrides the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Connect + request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<BTreeMap<String, String>>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra_headers: None,
        }
    }
}

impl ProviderSettings {
    /// Settings pointing at a specific base URL, everything else default.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: Some(api_base.into()),
            ..Default::default()
        }
    }

    /// The base URL to use: configured override, else `default_base`.
    pub fn api_base_or<'a>(&'a self, default_base: &'a str) -> &'a str {
        self.api_base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(default_base)
    }
}

/// All provider configurations, one section per supported provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: ProviderSettings,
    #[serde(default)]
    pub google: ProviderSettings,
}

impl ProvidersConfig {
    /// Get a provider section by registry name (e.g. `"anthropic"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderSettings> {
        match name {
            "anthropic" => Some(&self.anthropic),
            "google" => Some(&self.google),
            _ => None,
        }
    }

    /// Mutable variant of [`get_by_name`](Self::get_by_name).
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderSettings> {
        match name {
            "anthropic" => Some(&mut self.anthropic),
            "google" => Some(&mut self.google),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.providers.anthropic.timeout_secs, 30);
        assert_eq!(config.providers.google.timeout_secs, 30);
        assert!(config.providers.anthropic.api_base.is_none());
        assert!(config.providers.google.extra_headers.is_none());
    }

    #[test]
    fn test_config_from_json_camel_case() {
        let json = serde_json::json!({
            "providers": {
                "anthropic": {
                    "apiBase": "http://localhost:8080",
                    "timeoutSecs": 5
                },
                "google": {
                    "extraHeaders": { "x-trace": "1" }
                }
            }
        });

        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(
            config.providers.anthropic.api_base.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(config.providers.anthropic.timeout_secs, 5);
        // Defaults preserved for missing fields
        assert_eq!(config.providers.google.timeout_secs, 30);
        assert_eq!(
            config.providers.google.extra_headers.as_ref().unwrap()["x-trace"],
            "1"
        );
    }

    #[test]
    fn test_api_base_or_falls_back() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.api_base_or("https://api.anthropic.com"), "https://api.anthropic.com");

        let empty = ProviderSettings::with_api_base("");
        assert_eq!(empty.api_base_or("https://x.example"), "https://x.example");

        let custom = ProviderSettings::with_api_base("http://127.0.0.1:9000");
        assert_eq!(custom.api_base_or("https://x.example"), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_get_by_name() {
        let mut providers = ProvidersConfig::default();
        providers.get_by_name_mut("google").unwrap().timeout_secs = 7;
        assert_eq!(providers.get_by_name("google").unwrap().timeout_secs, 7);
        assert!(providers.get_by_name("Google").is_none());
        assert!(providers.get_by_name("openai").is_none());
    }
}
