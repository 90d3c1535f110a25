//! SQL function layer for sqlai.
//!
//! Backs two scalar functions a database host registers:
//!
//! - `ai_prompt(provider, model, api_key, prompt)` → completion text
//! - `create_embed(provider, model, api_key, text)` → embedding as a JSON array string
//!
//! Each call yields exactly one of a value, `NULL`, or an error message, and
//! values are copied into a caller-owned buffer of fixed capacity.

pub mod adapter;
pub mod functions;
pub mod types;

pub use adapter::{ai_prompt, create_embed, invoke, invoke_async, FunctionContext, InputError};
pub use functions::{FunctionSpec, Operation, DEFAULT_BUFFER_SIZE, FUNCTIONS};
pub use types::{ResultKind, UdfArgs, UdfResult, ERROR_MSG_CAPACITY, MAX_ERROR_LEN};
