//! Catalog of the SQL functions this crate backs.

use crate::types::UdfResult;

/// Declared result buffer size for both functions.
pub const DEFAULT_BUFFER_SIZE: usize = 65535;

/// Which provider operation a function drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Text completion (`ai_prompt`).
    Prompt,
    /// Embedding generation (`create_embed`).
    Embed,
}

impl Operation {
    pub fn spec(self) -> &'static FunctionSpec {
        match self {
            Operation::Prompt => &FUNCTIONS[0],
            Operation::Embed => &FUNCTIONS[1],
        }
    }
}

/// Signature and buffer size of one SQL-visible function.
#[derive(Clone, Debug)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub operation: Operation,
    /// Parameter names, in call order. All are nullable strings.
    pub params: &'static [&'static str],
    /// Result buffer capacity in bytes, terminator included.
    pub buffer_size: usize,
}

impl FunctionSpec {
    /// A fresh result record sized for this function.
    pub fn new_result(&self) -> UdfResult {
        UdfResult::with_capacity(self.buffer_size)
    }
}

pub static FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec {
        name: "ai_prompt",
        operation: Operation::Prompt,
        params: &["provider", "model", "api_key", "prompt"],
        buffer_size: DEFAULT_BUFFER_SIZE,
    },
    FunctionSpec {
        name: "create_embed",
        operation: Operation::Embed,
        params: &["provider", "model", "api_key", "text"],
        buffer_size: DEFAULT_BUFFER_SIZE,
    },
];
