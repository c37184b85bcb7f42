//! Tool registry - closed name-to-tool mapping built at session setup

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::Tool;
use crate::agent::ToolCallRequest;
use crate::error::Error;
use crate::Result;

/// Tool definition for LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry of the tools a session may dispatch to.
///
/// Ordered by name so the tool list sent to the model is stable.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Names must be unique.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        self.tools.insert(name, Box::new(tool));
        Ok(())
    }

    /// Get tool definitions for LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Run the tool named by `call`.
    ///
    /// Unknown names yield an empty object instead of failing the turn.
    /// Malformed arguments and tool failures are returned as errors.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> Result<Value> {
        let args = call.parse_arguments()?;

        let Some(tool) = self.tools.get(&call.name) else {
            warn!(
                tool = %call.name,
                call_id = %call.id,
                "model requested an unregistered tool; substituting empty result"
            );
            return Ok(json!({}));
        };

        debug!(tool = %call.name, call_id = %call.id, "executing tool");
        tool.execute(args).await
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
