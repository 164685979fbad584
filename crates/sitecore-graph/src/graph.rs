use crate::node::{Node, NodeType};
use crate::nodes::{LLMNode, ToolNode};
use crate::router::{NextNode, Router, SimpleRouter};
use crate::types::{GraphConfig, GraphInput, GraphState, StreamEvent};
use anyhow::Result;
use sitecore_llm::ChatClient;
use sitecore_openapi::ToolExecutor;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub struct Graph {
    llm_client: Arc<dyn ChatClient>,
    tool_executor: Arc<dyn ToolExecutor>,
    config: GraphConfig,
}

impl Graph {
    pub fn new(
        llm_client: Arc<dyn ChatClient>,
        tool_executor: Arc<dyn ToolExecutor>,
        config: GraphConfig,
    ) -> Self {
        Self {
            llm_client,
            tool_executor,
            config,
        }
    }

    /// Spawn execution in background, return event receiver
    pub fn spawn_run(&self, input: GraphInput) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(self.config.event_buffer);

        let llm_client = Arc::clone(&self.llm_client);
        let tool_executor = Arc::clone(&self.tool_executor);
        let config = self.config.clone();

        tokio::spawn(async move {
            if let Err(e) =
                Self::execute_loop(input, tx.clone(), llm_client, tool_executor, config).await
            {
                tracing::error!("GRAPH: run failed: {}", e);
                let _ = tx
                    .send(StreamEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        });

        rx
    }

    async fn execute_loop(
        input: GraphInput,
        event_tx: mpsc::Sender<StreamEvent>,
        llm_client: Arc<dyn ChatClient>,
        tool_executor: Arc<dyn ToolExecutor>,
        config: GraphConfig,
    ) -> Result<()> {
        let start_time = Instant::now();
        let mut state = GraphState::from_input(input);

        event_tx
            .send(StreamEvent::InitStream {
                run_id: state.run_id.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            })
            .await?;

        let llm_node = LLMNode::new(llm_client, Arc::clone(&tool_executor));
        let tool_node = ToolNode::new(tool_executor);
        let router = SimpleRouter;

        let mut current_node = NodeType::LLM;
        let mut iteration = 0;
        let mut status = "success";

        loop {
            if iteration >= config.max_iterations {
                event_tx
                    .send(StreamEvent::Error {
                        message: format!("Max iterations ({}) reached", config.max_iterations),
                    })
                    .await?;
                status = "max_iterations";
                break;
            }

            let node: &dyn Node = match current_node {
                NodeType::LLM => &llm_node,
                NodeType::Tool => &tool_node,
            };
            tracing::debug!(node = ?node.node_type(), iteration, "GRAPH: executing node");
            node.execute(&mut state, event_tx.clone()).await?;

            match router.next(&state, current_node) {
                NextNode::End => break,
                NextNode::LLM => current_node = NodeType::LLM,
                NextNode::Tool => current_node = NodeType::Tool,
            }

            iteration += 1;
        }

        let total_duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            run_id = %state.run_id,
            iterations = iteration,
            total_duration_ms,
            "GRAPH: run finished"
        );

        event_tx
            .send(StreamEvent::EndStream {
                status: status.to_string(),
                total_duration_ms,
            })
            .await?;

        Ok(())
    }
}
