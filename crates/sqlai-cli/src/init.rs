//! `sqlai init` — write `~/.sqlai/config.json` with defaults.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use sqlai_core::config::{get_config_path, save_config, Config};

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "sqlai — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }
    println!();

    Ok(())
}

/// Write the default config unless a file is already there. Returns whether it wrote.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config: {}", path.display()))?;
    Ok(true)
}
