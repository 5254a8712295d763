//! LLM API client and types
//!
//! Supports the Gemini `generateContent` API and OpenAI-compatible APIs.

mod client;
mod types;

pub use client::LlmClient;
pub use types::*;
