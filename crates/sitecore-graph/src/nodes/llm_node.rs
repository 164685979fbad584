use crate::node::{EventSender, Node, NodeType};
use crate::types::{GraphState, StreamEvent};
use anyhow::Result;
use async_trait::async_trait;
use sitecore_llm::{ChatClient, ChatOptions, ChatRequest, Message, ToolChoice};
use sitecore_openapi::ToolExecutor;
use std::sync::Arc;

pub struct LLMNode {
    client: Arc<dyn ChatClient>,
    tool_executor: Arc<dyn ToolExecutor>,
}

impl LLMNode {
    pub fn new(client: Arc<dyn ChatClient>, tool_executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            client,
            tool_executor,
        }
    }

    fn build_request(&self, state: &GraphState) -> ChatRequest {
        let config = &state.llm_config;
        let tools = self.tool_executor.llm_tools();

        let mut options = ChatOptions::new();
        if !tools.is_empty() {
            options = options.tools(tools).tool_choice(ToolChoice::auto());
        }
        if let Some(temp) = config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max) = config.max_tokens {
            options = options.max_tokens(max);
        }

        ChatRequest::new(config.model.clone(), state.messages.clone()).with_options(options)
    }
}

#[async_trait]
impl Node for LLMNode {
    async fn execute(&self, state: &mut GraphState, event_tx: EventSender) -> Result<()> {
        let request = self.build_request(state);
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "LLM_NODE: sending chat request"
        );

        let response = self.client.chat(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "LLM_NODE: token usage"
            );
        }

        let content = response.content.filter(|c| !c.is_empty());
        if let Some(text) = &content {
            event_tx
                .send(StreamEvent::Message {
                    content: text.clone(),
                })
                .await?;
        }

        let tool_calls = response.tool_calls.unwrap_or_default();
        for (index, call) in tool_calls.iter().enumerate() {
            tracing::info!(tool = %call.function.name, "LLM_NODE: model requested tool");
            event_tx
                .send(StreamEvent::ToolCall {
                    index: index as u32,
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                })
                .await?;
        }

        event_tx
            .send(StreamEvent::Done {
                finish_reason: response.finish_reason,
            })
            .await?;

        let message = if tool_calls.is_empty() {
            Message::ai(content.unwrap_or_default())
        } else {
            Message::ai_with_tools(content, tool_calls)
        };
        state.add_message(message);

        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::LLM
    }
}
