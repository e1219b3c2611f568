//! LLM chat interface and HTTP client.
//!
//! The engine depends only on the [`LlmChat`] trait: one ordered message
//! sequence in, one assistant reply out. [`ChatClient`] is the production
//! implementation speaking the OpenAI-compatible chat completions protocol.

mod client;
mod types;

pub use client::{ChatClient, LlmChat};
pub use types::{ChatMessage, ChatReply, MessageRole, Usage};
