//! sqlai CLI — entry point.
//!
//! # Commands
//!
//! - `sqlai prompt --provider P --model M [--api-key K] TEXT` — run `ai_prompt`
//! - `sqlai embed --provider P --model M [--api-key K] TEXT` — run `create_embed`
//! - `sqlai providers` — list supported providers and their effective settings
//! - `sqlai init` — write the default config file

mod call;
mod init;
mod providers_cmd;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use sqlai_udf::Operation;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// sqlai — call LLM providers the way the SQL functions do
#[derive(Parser)]
#[command(name = "sqlai", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text from a prompt (ai_prompt)
    Prompt(CallArgs),

    /// Generate an embedding vector (create_embed)
    Embed(CallArgs),

    /// Show supported providers and their effective settings
    Providers,

    /// Write the default configuration file
    Init,
}

/// Arguments shared by `prompt` and `embed`.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Provider name ("anthropic" or "google")
    #[arg(short, long)]
    pub provider: String,

    /// Model identifier, passed through to the provider
    #[arg(short, long)]
    pub model: String,

    /// API key. Defaults to the provider's env var (ANTHROPIC_API_KEY / GEMINI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Result buffer capacity in bytes, terminator included
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,

    /// Prompt or text to embed
    pub text: String,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Prompt(args) => {
            init_logging(args.logs);
            call::run(Operation::Prompt, args)
        }
        Commands::Embed(args) => {
            init_logging(args.logs);
            call::run(Operation::Embed, args)
        }
        Commands::Providers => providers_cmd::run(),
        Commands::Init => init::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("sqlai=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
