//! `sqlai prompt` / `sqlai embed` — run one function call and print its result.

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::debug;

use sqlai_providers::find_by_name;
use sqlai_udf::{invoke, FunctionContext, Operation, ResultKind, UdfArgs, UdfResult};

use crate::CallArgs;

/// Run the call and print the value, `NULL`, or the error.
pub fn run(op: Operation, args: CallArgs) -> Result<()> {
    let ctx = FunctionContext::from_default_config();
    let api_key = resolve_api_key(&args.provider, args.api_key).unwrap_or_default();
    let capacity = args.max_len.unwrap_or(op.spec().buffer_size);

    debug!(
        function = op.spec().name,
        provider = %args.provider,
        capacity,
        "running from CLI"
    );

    let mut result = UdfResult::with_capacity(capacity);
    invoke(
        &ctx,
        op,
        &UdfArgs::new(&args.provider, &args.model, &api_key, &args.text),
        &mut result,
    );

    print_result(&result)
}

/// Explicit key first, then the provider's conventional env var.
pub fn resolve_api_key(provider: &str, explicit: Option<String>) -> Option<String> {
    explicit.or_else(|| {
        let spec = find_by_name(provider)?;
        std::env::var(spec.env_key).ok().filter(|k| !k.is_empty())
    })
}

fn print_result(result: &UdfResult) -> Result<()> {
    match result.kind() {
        ResultKind::Value => {
            println!("{}", result.value().unwrap_or_default());
            if result.truncated() {
                eprintln!(
                    "{}",
                    format!("(truncated to {} bytes)", result.actual_len()).dimmed()
                );
            }
            Ok(())
        }
        ResultKind::Null => {
            println!("{}", "NULL".dimmed());
            Ok(())
        }
        ResultKind::Error => {
            let msg = result.error_message().unwrap_or_default();
            eprintln!("{} {}", "✗".red(), msg.red());
            bail!("function call failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins() {
        let key = resolve_api_key("anthropic", Some("explicit".to_string()));
        assert_eq!(key.as_deref(), Some("explicit"));
    }

    #[test]
    fn falls_back_to_provider_env_var() {
        std::env::set_var("GEMINI_API_KEY", "from-env");
        assert_eq!(resolve_api_key("google", None).as_deref(), Some("from-env"));

        std::env::set_var("GEMINI_API_KEY", "");
        assert!(resolve_api_key("google", None).is_none());
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn unknown_provider_has_no_env_fallback() {
        assert!(resolve_api_key("openai", None).is_none());
    }
}
