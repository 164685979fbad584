use crate::types::{GraphState, StreamEvent};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub type EventSender = mpsc::Sender<StreamEvent>;

/// One step of the agent loop
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the step, mutating state and emitting events
    async fn execute(&self, state: &mut GraphState, event_tx: EventSender) -> Result<()>;

    fn node_type(&self) -> NodeType;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    LLM,
    Tool,
}
