use crate::node::{EventSender, Node, NodeType};
use crate::types::{GraphState, StreamEvent};
use anyhow::Result;
use async_trait::async_trait;
use sitecore_openapi::ToolExecutor;
use std::sync::Arc;
use std::time::Instant;

/// Prefix synthesized tools use when the API call fails
const TOOL_ERROR_PREFIX: &str = "Error: ";

pub struct ToolNode {
    tool_executor: Arc<dyn ToolExecutor>,
}

impl ToolNode {
    pub fn new(tool_executor: Arc<dyn ToolExecutor>) -> Self {
        Self { tool_executor }
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn execute(&self, state: &mut GraphState, event_tx: EventSender) -> Result<()> {
        let tool_calls = state.get_pending_tool_calls();

        for tool_call in tool_calls {
            let start = Instant::now();
            let name = tool_call.function.name.clone();

            // Failures are reported back to the model, never abort the run
            let (result, is_error) = match tool_call.arguments_value() {
                Ok(args) => match self.tool_executor.execute(&name, args).await {
                    Ok(output) => {
                        let is_error = output.starts_with(TOOL_ERROR_PREFIX);
                        (output, is_error)
                    }
                    Err(e) => (format!("Tool execution failed: {}", e), true),
                },
                Err(e) => (format!("Invalid tool arguments: {}", e), true),
            };

            let duration_ms = start.elapsed().as_millis() as u64;
            if is_error {
                tracing::warn!(tool = %name, duration_ms, "TOOL_NODE: {}", result);
            } else {
                tracing::info!(tool = %name, duration_ms, "TOOL_NODE: tool completed");
            }

            event_tx
                .send(StreamEvent::ToolResult {
                    tool_call_id: tool_call.id.clone(),
                    tool_name: name,
                    result: result.clone(),
                    is_error,
                    duration_ms,
                })
                .await?;

            state.add_tool_result(tool_call.id, result);
        }

        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Tool
    }
}
