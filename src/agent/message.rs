//! Message types for agent communication

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::Result;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    /// Text content; absent on assistant turns that only carry tool calls
    #[serde(default)]
    pub content: Option<String>,

    /// Tool call ID (for tool responses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls made by assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Create an assistant message with tool calls
    pub fn assistant_with_tools(content: Option<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_call_id: None,
            tool_calls: Some(tool_calls),
        }
    }

    /// Create a tool result message paired to the originating call
    pub fn tool_result(call_id: impl Into<String>, result: &Value) -> Self {
        Self {
            role: Role::Tool,
            content: Some(result.to_string()),
            tool_call_id: Some(call_id.into()),
            tool_calls: None,
        }
    }

    /// Content as a string slice, empty when absent
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Whether this message belongs in a carried-over transcript.
    ///
    /// Only user and assistant turns survive between turns; the assistant's
    /// tool-call bookkeeping is stripped along with the tool results.
    pub fn carry_over(&self) -> Option<Message> {
        match self.role {
            Role::User => Some(Message::user(self.text())),
            Role::Assistant => Some(Message::assistant(self.text())),
            Role::System | Role::Tool => None,
        }
    }
}

/// A tool call request from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// Raw JSON argument payload as emitted by the model
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.to_string(),
        }
    }

    /// Parse the argument payload. An empty payload is treated as `{}`.
    pub fn parse_arguments(&self) -> Result<Value> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&self.arguments).map_err(|source| Error::ToolArguments {
            tool: self.name.clone(),
            source,
        })
    }
}
