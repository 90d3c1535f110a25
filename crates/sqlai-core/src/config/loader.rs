//! Config loader — reads `~/.sqlai/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.sqlai/config.json`
//! 3. Environment variables `SQLAI_PROVIDERS__<NAME>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::schema::{Config, ProviderSettings, DEFAULT_TIMEOUT_SECS};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        debug!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(reject_zero_timeouts(config))
}

/// Provider sections that accept overrides, as (config name, env segment).
const PROVIDER_SECTIONS: [(&str, &str); 2] = [("anthropic", "ANTHROPIC"), ("google", "GOOGLE")];

/// A zero timeout would fail every request; fall back to the default.
fn reject_zero_timeouts(mut config: Config) -> Config {
    for (name, _) in PROVIDER_SECTIONS {
        let Some(settings) = config.providers.get_by_name_mut(name) else {
            continue;
        };
        if settings.timeout_secs == 0 {
            warn!(
                provider = name,
                default = DEFAULT_TIMEOUT_SECS,
                "timeoutSecs must be positive, using default"
            );
            settings.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
    }
    config
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `SQLAI_PROVIDERS__<NAME>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `SQLAI_PROVIDERS__ANTHROPIC__API_BASE` → `providers.anthropic.api_base`
/// - `SQLAI_PROVIDERS__ANTHROPIC__TIMEOUT_SECS` → `providers.anthropic.timeout_secs`
/// - `SQLAI_PROVIDERS__GOOGLE__API_BASE` → `providers.google.api_base`
/// - `SQLAI_PROVIDERS__GOOGLE__TIMEOUT_SECS` → `providers.google.timeout_secs`
fn apply_env_overrides(mut config: Config) -> Config {
    for (name, env_name) in PROVIDER_SECTIONS {
        if let Some(settings) = config.providers.get_by_name_mut(name) {
            apply_provider_env(settings, env_name);
        }
    }
    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderSettings, name: &str) {
    if let Ok(val) = std::env::var(format!("SQLAI_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if let Ok(val) = std::env::var(format!("SQLAI_PROVIDERS__{name}__TIMEOUT_SECS")) {
        match val.parse::<u64>() {
            Ok(secs) if secs > 0 => provider.timeout_secs = secs,
            _ => warn!(provider = name, value = %val, "ignoring invalid timeout override"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
