use crate::types::config::LLMConfig;
use sitecore_llm::{Content, Message, ToolCall};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphState {
    pub run_id: String,
    pub messages: Vec<Message>,
    pub llm_config: LLMConfig,
}

impl GraphState {
    /// Each run starts from the instructions and the user's text only
    pub fn from_input(input: GraphInput) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(instructions) = input.instructions.filter(|i| !i.is_empty()) {
            messages.push(Message::system(instructions));
        }
        messages.push(input.user_message);

        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            messages,
            llm_config: input.llm_config,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        !self.get_pending_tool_calls().is_empty()
    }

    pub fn get_pending_tool_calls(&self) -> Vec<ToolCall> {
        match self.last_message() {
            Some(Message::AI {
                tool_calls: Some(calls),
                ..
            }) => calls.clone(),
            _ => Vec::new(),
        }
    }

    pub fn add_tool_result(&mut self, tool_call_id: String, result: String) {
        self.messages.push(Message::Tool {
            tool_call_id,
            content: Content::text(result),
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphInput {
    pub instructions: Option<String>,
    pub user_message: Message,
    pub llm_config: LLMConfig,
}

impl GraphInput {
    pub fn new(user_message: Message, llm_config: LLMConfig) -> Self {
        Self {
            instructions: None,
            user_message,
            llm_config,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}
