//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait for swappable LLM providers
//! - [`ProviderRegistry`] for dynamic provider creation
//! - [`OpenAiCompatClient`], which speaks the chat-completions wire format
//!   used by both OpenAI and Gemini's compatibility endpoint
//!
//! # Adding a New Provider
//!
//! 1. If it speaks chat-completions, add its base URL to `ProviderRegistry`
//! 2. Otherwise create a new file and implement `LlmClient`
//! 3. Add config fields in `config.rs`

mod types;

pub mod openai;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::tools::ToolDefinition;
use crate::Result;

pub use openai::OpenAiCompatClient;

use super::message::{Message, ToolCallRequest};

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Final answer.
    Stop,
    /// The model wants the client to run tools.
    ToolCalls,
    /// Output was cut at the token limit.
    Length,
    ContentFilter,
    Other(String),
}

impl FinishReason {
    /// Map the wire value onto a reason. A missing value counts as `Stop`.
    pub fn from_wire(reason: Option<&str>) -> Self {
        match reason {
            None | Some("stop") => Self::Stop,
            Some("tool_calls") | Some("function_call") => Self::ToolCalls,
            Some("length") => Self::Length,
            Some("content_filter") => Self::ContentFilter,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text content of the response.
    pub content: Option<String>,

    /// Tool calls requested by the LLM.
    pub tool_calls: Vec<ToolCallRequest>,

    /// Reason the response finished.
    pub finish_reason: FinishReason,

    /// Token usage statistics.
    pub usage: Usage,
}

impl LlmResponse {
    /// Create a simple text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            finish_reason: FinishReason::Stop,
            usage: Usage::default(),
        }
    }

    /// Create a response asking for the given tool calls.
    pub fn tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls,
            finish_reason: FinishReason::ToolCalls,
            usage: Usage::default(),
        }
    }

    /// Whether the session must run tools before the model can answer.
    #[inline]
    pub fn wants_tools(&self) -> bool {
        self.finish_reason == FinishReason::ToolCalls && !self.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// LLM client trait — swappable provider abstraction.
///
/// Implement this trait to add a new LLM provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send messages and get response.
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

#[async_trait]
impl LlmClient for Box<dyn LlmClient> {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse> {
        (**self).chat(messages, tools).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

const GEMINI_OPENAI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Provider registry — creates LLM clients dynamically.
///
/// # Example
///
/// ```ignore
/// let client = ProviderRegistry::create(&config)?;
/// let response = client.chat(&messages, &tools).await?;
/// ```
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Create an LLM client from configuration.
    ///
    /// Supported providers:
    /// - `"gemini"`: Gemini through its OpenAI-compatible endpoint
    /// - `"openai"`: OpenAI chat completions
    pub fn create(config: &Config) -> Result<Box<dyn LlmClient>> {
        let default_url = Self::base_url(&config.provider)
            .ok_or_else(|| Error::Config(format!("Unknown provider: {}", config.provider)))?;

        if config.api_key.is_empty() {
            return Err(Error::Config(format!(
                "No API key configured for provider '{}'",
                config.provider
            )));
        }

        let base_url = config.base_url.as_deref().unwrap_or(default_url);
        let client = OpenAiCompatClient::new(
            base_url,
            &config.api_key,
            &config.model,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Box::new(client))
    }

    /// Default base URL for a provider name.
    pub fn base_url(provider: &str) -> Option<&'static str> {
        match provider {
            "gemini" => Some(GEMINI_OPENAI_URL),
            "openai" => Some(OPENAI_URL),
            _ => None,
        }
    }

    /// List available provider names.
    pub fn available() -> &'static [&'static str] {
        &["gemini", "openai"]
    }
}

/// Fake LLM client for testing.
///
/// Either replays a scripted queue of responses, or answers every request
/// through a closure so repeated turns are deterministic. Every request's
/// message list is recorded.
#[cfg(test)]
pub struct FakeLlmClient {
    script: FakeScript,
    requests: std::sync::Mutex<Vec<Vec<Message>>>,
}

#[cfg(test)]
enum FakeScript {
    Queue(std::sync::Mutex<std::collections::VecDeque<Result<LlmResponse>>>),
    Responder(Box<dyn Fn(&[Message]) -> LlmResponse + Send + Sync>),
}

#[cfg(test)]
impl FakeLlmClient {
    /// Create with predefined text responses.
    pub fn new(responses: Vec<&str>) -> Self {
        Self::scripted(responses.into_iter().map(|s| Ok(LlmResponse::text(s))).collect())
    }

    /// Create from a queue of results, errors included.
    pub fn scripted(responses: Vec<Result<LlmResponse>>) -> Self {
        Self {
            script: FakeScript::Queue(std::sync::Mutex::new(responses.into())),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create with a single tool call followed by a text response.
    pub fn with_tool_call(name: &str, args: serde_json::Value, final_response: &str) -> Self {
        let call = ToolCallRequest::new("tc_1", name, &args);
        Self::scripted(vec![
            Ok(LlmResponse::tool_calls(vec![call])),
            Ok(LlmResponse::text(final_response)),
        ])
    }

    /// Answer each request by inspecting the messages sent.
    pub fn responder<F>(f: F) -> Self
    where
        F: Fn(&[Message]) -> LlmResponse + Send + Sync + 'static,
    {
        Self {
            script: FakeScript::Responder(Box::new(f)),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Number of `chat` calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Message lists sent on each call.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn chat(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match &self.script {
            FakeScript::Queue(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Llm("No more fake responses".to_string()))),
            FakeScript::Responder(f) => Ok(f(messages)),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}
