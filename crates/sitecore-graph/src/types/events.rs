use serde::{Deserialize, Serialize};

/// Progress of one agent run, emitted over the run's channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Run started
    InitStream { run_id: String, timestamp: i64 },

    /// Assistant text from one LLM call
    Message { content: String },

    /// The model asked for a tool call
    ToolCall {
        index: u32,
        id: String,
        name: String,
        arguments: String,
    },

    /// Tool execution finished (errors included)
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: String,
        is_error: bool,
        duration_ms: u64,
    },

    /// One LLM call completed
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    /// Fatal error, the run stops
    Error { message: String },

    /// Run completed
    EndStream { status: String, total_duration_ms: u64 },
}
