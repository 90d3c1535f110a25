//! `sqlai providers` — list supported providers and their effective settings.

use anyhow::Result;
use colored::Colorize;

use sqlai_core::config::{get_config_path, load_config, ProviderSettings};
use sqlai_providers::{ProviderSpec, PROVIDERS};

/// Run the providers command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "sqlai Providers".cyan().bold());
    println!();

    println!(
        "  {:<12} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".dimmed().to_string()
        }
    );
    println!();

    for spec in PROVIDERS {
        let settings = config
            .providers
            .get_by_name(spec.name)
            .cloned()
            .unwrap_or_default();
        print_provider(spec, &settings);
    }

    Ok(())
}

fn print_provider(spec: &ProviderSpec, settings: &ProviderSettings) {
    println!("  {} ({})", spec.display_name.bold(), spec.name);
    println!("    {:<12} {}", "Base URL:", settings.api_base_or(spec.default_api_base));
    println!("    {:<12} {}s", "Timeout:", settings.timeout_secs);
    println!("    {:<12} {}", "Key header:", spec.credential_header);
    println!(
        "    {:<12} {}",
        "Embeddings:",
        if spec.supports_embeddings {
            "✓".green().to_string()
        } else {
            "· not supported".dimmed().to_string()
        }
    );
    let key_status = if std::env::var(spec.env_key).is_ok_and(|k| !k.is_empty()) {
        format!("{} ({} set)", "✓".green(), spec.env_key)
    } else {
        format!("{}", format!("· {} not set", spec.env_key).dimmed())
    };
    println!("    {:<12} {}", "API key:", key_status);
    if let Some(headers) = &settings.extra_headers {
        let names: Vec<&str> = headers.keys().map(String::as_str).collect();
        println!("    {:<12} {}", "Headers:", names.join(", "));
    }
    println!();
}
