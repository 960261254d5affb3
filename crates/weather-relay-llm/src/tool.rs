//! Tools callable by a [`ToolAgent`](crate::ToolAgent).

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A function the model may call.
///
/// Arguments arrive as the JSON object the model produced; implementations
/// validate them against their own schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn parameters_schema(&self) -> serde_json::Value;

    /// Run the tool
    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError>;
}

/// Read a required string argument
pub fn required_str<'a>(
    tool: &str,
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolError> {
    match arguments.get(key) {
        Some(serde_json::Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(ToolError::invalid_arguments(
            tool,
            format!("'{}' must be a string, got {}", key, other),
        )),
        None => Err(ToolError::invalid_arguments(
            tool,
            format!("missing required argument '{}'", key),
        )),
    }
}

/// Tools available to one agent, keyed by name
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for LLM function calling, ordered by name
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
