//! LLM client abstraction layer
//!
//! The pipeline talks to models through [`LLMClient`]. [`GenAIClient`] covers
//! the hosted providers and Ollama; [`MockLLMClient`] replays scripted
//! responses in tests.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
