use crate::graph::Graph;
use crate::types::{GraphConfig, GraphInput, LLMConfig, StreamEvent};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use sitecore_llm::{ChatClient, Message};
use sitecore_openapi::ToolExecutor;
use std::sync::Arc;

pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a Sitecore assistant. Use the available tools to help users. Be concise.";

/// Reply to one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    pub text: String,
}

/// Anything that can answer a user turn
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, user_text: &str) -> Result<AgentResponse>;
}

/// ReAct agent over a chat client and a tool executor
pub struct ChatAgent {
    graph: Graph,
    instructions: String,
    llm_config: LLMConfig,
}

impl ChatAgent {
    pub fn builder() -> ChatAgentBuilder {
        ChatAgentBuilder::new()
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Start a turn and return its raw event stream
    pub fn spawn_turn(&self, user_text: &str) -> tokio::sync::mpsc::Receiver<StreamEvent> {
        let input = GraphInput::new(Message::human(user_text), self.llm_config.clone())
            .with_instructions(self.instructions.clone());
        self.graph.spawn_run(input)
    }
}

#[async_trait]
impl AgentRuntime for ChatAgent {
    async fn run(&self, user_text: &str) -> Result<AgentResponse> {
        let mut rx = self.spawn_turn(user_text);
        let mut text = String::new();

        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::InitStream { run_id, .. } => {
                    tracing::debug!(%run_id, "AGENT: turn started");
                }
                // The last assistant message is the answer
                StreamEvent::Message { content } => text = content,
                StreamEvent::ToolCall { name, arguments, .. } => {
                    tracing::debug!(tool = %name, %arguments, "AGENT: tool call");
                }
                StreamEvent::ToolResult {
                    tool_name, is_error, ..
                } => {
                    tracing::debug!(tool = %tool_name, is_error, "AGENT: tool result");
                }
                StreamEvent::Done { .. } => {}
                StreamEvent::Error { message } => bail!(message),
                StreamEvent::EndStream {
                    status,
                    total_duration_ms,
                } => {
                    tracing::debug!(%status, total_duration_ms, "AGENT: turn finished");
                    return Ok(AgentResponse { text });
                }
            }
        }

        Err(anyhow!("Agent run ended without completing"))
    }
}

pub struct ChatAgentBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    tool_executor: Option<Arc<dyn ToolExecutor>>,
    instructions: String,
    llm_config: Option<LLMConfig>,
    config: GraphConfig,
}

impl ChatAgentBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            tool_executor: None,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            llm_config: None,
            config: GraphConfig::default(),
        }
    }

    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn tool_executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.tool_executor = Some(executor);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = Some(config);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ChatAgent> {
        let llm_client = self
            .llm_client
            .ok_or_else(|| anyhow!("LLM client is required"))?;
        let tool_executor = self
            .tool_executor
            .ok_or_else(|| anyhow!("Tool executor is required"))?;
        let llm_config = self
            .llm_config
            .ok_or_else(|| anyhow!("LLM config is required"))?;

        Ok(ChatAgent {
            graph: Graph::new(llm_client, tool_executor, self.config),
            instructions: self.instructions,
            llm_config,
        })
    }
}

impl Default for ChatAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
