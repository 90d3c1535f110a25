//! Shared building blocks for sqlai.
//!
//! - [`config`] — per-provider settings loaded from `~/.sqlai/config.json` + env vars
//! - [`utils`] — data paths and byte-bounded string helpers

pub mod config;
pub mod utils;
