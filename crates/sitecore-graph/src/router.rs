use crate::node::NodeType;
use crate::types::GraphState;

/// Picks the next node from the current state
pub trait Router: Send + Sync {
    fn next(&self, state: &GraphState, current: NodeType) -> NextNode;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextNode {
    LLM,
    Tool,
    End,
}

/// LLM -> Tool (while the model asks for tools) -> LLM -> END
pub struct SimpleRouter;

impl Router for SimpleRouter {
    fn next(&self, state: &GraphState, current: NodeType) -> NextNode {
        match current {
            NodeType::LLM if state.has_pending_tool_calls() => NextNode::Tool,
            NodeType::LLM => NextNode::End,
            NodeType::Tool => NextNode::LLM,
        }
    }
}
