//! Agent module — core chat logic.
//!
//! This module contains:
//! - Message types (Message, ToolCallRequest)
//! - LLM client trait and implementations
//! - Chat session running the tool-call loop
//!
//! # Adding a New LLM Provider
//!
//! See [`llm::ProviderRegistry`] for instructions.

mod message;
mod session;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use llm::{FinishReason, LlmClient, LlmResponse, OpenAiCompatClient, ProviderRegistry, Usage};
pub use message::{Message, Role, ToolCallRequest};
pub use session::{ChatSession, Outcome, Reply, FALLBACK_MESSAGE, TOOL_LOOP_MESSAGE};
