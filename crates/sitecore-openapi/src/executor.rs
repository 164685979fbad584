use crate::synth::{Tool, ToolArguments};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Tool surface the agent loop talks to
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Function definitions to advertise to the model
    fn llm_tools(&self) -> Vec<sitecore_llm::Tool>;

    /// Run a tool by name with the model-supplied arguments
    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String>;
}

/// Executor over the tools synthesized from an OpenAPI document
pub struct ToolRegistry {
    tools: Vec<Tool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Tool>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, tool) in tools.iter().enumerate() {
            // First definition wins on duplicate names
            by_name.entry(tool.name.clone()).or_insert(idx);
        }
        Self { tools, by_name }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.by_name.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    fn llm_tools(&self) -> Vec<sitecore_llm::Tool> {
        self.tools.iter().map(Tool::to_llm_tool).collect()
    }

    async fn execute(&self, tool_name: &str, arguments: Value) -> Result<String> {
        let tool = self
            .get(tool_name)
            .ok_or_else(|| anyhow::anyhow!("Tool '{}' not found", tool_name))?;

        let arguments: ToolArguments = match arguments {
            Value::Object(map) => map,
            Value::Null => ToolArguments::new(),
            other => anyhow::bail!(
                "Arguments for '{}' must be a JSON object, got: {}",
                tool_name,
                other
            ),
        };

        tracing::info!(tool = %tool.name, method = %tool.binding.method, "invoking tool");
        Ok(tool.invoke(arguments).await)
    }
}
