//! The SQL function bodies: validate arguments, resolve a provider, call it,
//! and write the outcome into the host's bounded result record.
//!
//! Validation order is fixed and happens before any network activity:
//! 1. any argument `NULL` → result is `NULL`
//! 2. empty provider, model, api key, text (in that order) → field-specific error
//! 3. unknown provider → `Unknown provider: <name>`
//!
//! The synchronous entry points ([`ai_prompt`], [`create_embed`], [`invoke`])
//! block the calling thread on a per-call current-thread runtime, moved to a
//! helper thread when the caller is itself a runtime thread. Async callers
//! use [`invoke_async`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use sqlai_core::config::{load_config, Config};
use sqlai_providers::{
    create_provider_with_transport, HttpTransport, LlmProvider, ProviderResult, Transport,
};

use crate::functions::Operation;
use crate::types::{UdfArgs, UdfResult};

/// An argument that is present but unusable.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Provider name cannot be empty")]
    EmptyProvider,

    #[error("Model name cannot be empty")]
    EmptyModel,

    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("Prompt text cannot be empty")]
    EmptyPrompt,

    #[error("Text cannot be empty")]
    EmptyText,
}

/// Per-process settings the function bodies run with.
///
/// Holds configuration and the transport only; nothing from one call is kept
/// for the next.
#[derive(Clone)]
pub struct FunctionContext {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FunctionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionContext")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for FunctionContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl FunctionContext {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Context from `~/.sqlai/config.json` + env overrides.
    pub fn from_default_config() -> Self {
        Self::new(load_config(None))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Arguments after the NULL check.
#[derive(Clone, Copy, Debug)]
struct Request<'a> {
    provider: &'a str,
    model: &'a str,
    api_key: &'a str,
    text: &'a str,
}

/// Outcome of validation.
enum Checked<'a> {
    Null,
    Invalid(InputError),
    Ready(Request<'a>),
}

fn validate<'a>(op: Operation, args: &UdfArgs<'a>) -> Checked<'a> {
    let (Some(provider), Some(model), Some(api_key), Some(text)) =
        (args.provider, args.model, args.api_key, args.text)
    else {
        return Checked::Null;
    };

    let empty_text = match op {
        Operation::Prompt => InputError::EmptyPrompt,
        Operation::Embed => InputError::EmptyText,
    };
    let checks = [
        (provider, InputError::EmptyProvider),
        (model, InputError::EmptyModel),
        (api_key, InputError::EmptyApiKey),
        (text, empty_text),
    ];
    if let Some((_, err)) = checks.iter().find(|(value, _)| value.is_empty()) {
        return Checked::Invalid(*err);
    }

    Checked::Ready(Request {
        provider,
        model,
        api_key,
        text,
    })
}

/// Validate and resolve; on anything but a ready call, write the result and return `None`.
fn prepare<'a>(
    ctx: &FunctionContext,
    op: Operation,
    args: &UdfArgs<'a>,
    result: &mut UdfResult,
) -> Option<(Box<dyn LlmProvider>, Request<'a>)> {
    let request = match validate(op, args) {
        Checked::Null => {
            result.set_null();
            return None;
        }
        Checked::Invalid(err) => {
            result.set_error(&err.to_string());
            return None;
        }
        Checked::Ready(request) => request,
    };

    match create_provider_with_transport(
        request.provider,
        &ctx.config.providers,
        Arc::clone(&ctx.transport),
    ) {
        Ok(provider) => Some((provider, request)),
        Err(err) => {
            warn!(provider = %request.provider, "unknown provider requested");
            result.set_error(&err.to_string());
            None
        }
    }
}

async fn call(provider: &dyn LlmProvider, op: Operation, request: Request<'_>) -> ProviderResult {
    debug!(
        function = op.spec().name,
        provider = provider.display_name(),
        model = %request.model,
        "invoking provider"
    );
    match op {
        Operation::Prompt => {
            provider
                .complete(request.model, request.api_key, request.text)
                .await
        }
        Operation::Embed => {
            provider
                .embed(request.model, request.api_key, request.text)
                .await
        }
    }
}

fn write_outcome(op: Operation, outcome: ProviderResult, result: &mut UdfResult) {
    match outcome {
        Ok(text) => {
            result.set_value(&text);
            if result.truncated() {
                warn!(
                    function = op.spec().name,
                    source_len = text.len(),
                    written = result.actual_len(),
                    "result truncated to fit buffer"
                );
            }
        }
        Err(err) => result.set_error(&err.to_string()),
    }
}

/// Run `op` from inside an async context.
pub async fn invoke_async(
    ctx: &FunctionContext,
    op: Operation,
    args: &UdfArgs<'_>,
    result: &mut UdfResult,
) {
    let Some((provider, request)) = prepare(ctx, op, args, result) else {
        return;
    };
    let outcome = call(provider.as_ref(), op, request).await;
    write_outcome(op, outcome, result);
}

/// Drive one call to completion on a fresh current-thread runtime.
fn run_blocking(
    provider: &dyn LlmProvider,
    op: Operation,
    request: Request<'_>,
) -> Result<ProviderResult, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(call(provider, op, request)))
}

/// Run `op`, blocking the current thread until the provider answers or times out.
///
/// When the caller is itself on a tokio runtime thread, the call is driven
/// from a scoped helper thread, since `block_on` cannot nest. Async callers
/// should still prefer [`invoke_async`].
pub fn invoke(ctx: &FunctionContext, op: Operation, args: &UdfArgs<'_>, result: &mut UdfResult) {
    let Some((provider, request)) = prepare(ctx, op, args, result) else {
        return;
    };
    let provider = provider.as_ref();

    let completed = if tokio::runtime::Handle::try_current().is_ok() {
        debug!(function = op.spec().name, "inside a runtime, using helper thread");
        std::thread::scope(|scope| {
            scope
                .spawn(move || run_blocking(provider, op, request))
                .join()
                .unwrap_or_else(|_| Err("Provider call panicked".to_string()))
        })
    } else {
        run_blocking(provider, op, request)
    };

    match completed {
        Ok(outcome) => write_outcome(op, outcome, result),
        Err(msg) => result.set_error(&msg),
    }
}

/// `ai_prompt(provider, model, api_key, prompt)`.
pub fn ai_prompt(ctx: &FunctionContext, args: &UdfArgs<'_>, result: &mut UdfResult) {
    invoke(ctx, Operation::Prompt, args, result);
}

/// `create_embed(provider, model, api_key, text)`.
pub fn create_embed(ctx: &FunctionContext, args: &UdfArgs<'_>, result: &mut UdfResult) {
    invoke(ctx, Operation::Embed, args, result);
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
