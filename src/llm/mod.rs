//! LLM integration module
//!
//! This module provides the provider abstraction the SQL agent is built
//! on, plus an OpenAI-compatible implementation.

pub mod client;
pub mod provider;

// Provider implementations
pub mod providers {
    pub mod openai;
}

// Re-exports
pub use provider::{GenerationParams, LLMProvider, LLMResponse, Message, MessageRole};
pub use providers::openai::OpenAIProvider;
