//! Tools module - actions the model may ask the assistant to take
//!
//! Both built-in tools relay something to the persona owner through a
//! [`Notifier`](crate::notify::Notifier): a visitor's contact details, or a
//! question the assistant couldn't answer.

mod contact;
mod registry;

pub use contact::{RecordUnknownQuestionTool, RecordUserDetailsTool};
pub use registry::{ToolDefinition, ToolRegistry};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::notify::Notifier;
use crate::Result;

/// Tool trait - interface for all agent tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name used in function calls
    fn name(&self) -> &str;

    /// Description the model reads when choosing a tool
    fn description(&self) -> &str;

    /// JSON Schema for parameters
    fn parameters(&self) -> Value;

    /// Execute the tool with parsed arguments
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Registry holding the two relay tools, sharing one notifier.
pub fn default_registry(notifier: Arc<dyn Notifier>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(RecordUserDetailsTool::new(notifier.clone()))?;
    registry.register(RecordUnknownQuestionTool::new(notifier))?;
    Ok(registry)
}

/// Dummy tool for testing
#[cfg(test)]
pub struct DummyTool {
    pub name: String,
    pub result: Value,
}

#[cfg(test)]
#[async_trait]
impl Tool for DummyTool {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "Dummy tool for testing"
    }
    fn parameters(&self) -> Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        Ok(self.result.clone())
    }
}
