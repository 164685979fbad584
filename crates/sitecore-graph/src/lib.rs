//! ReAct agent loop for the Sitecore tools.
//!
//! A turn alternates an LLM call and the execution of the tools the model
//! asked for, until the model answers without tool calls.

pub mod agent;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod router;
pub mod types;

pub use agent::{AgentResponse, AgentRuntime, ChatAgent, ChatAgentBuilder, DEFAULT_INSTRUCTIONS};
pub use graph::Graph;
pub use node::{EventSender, Node, NodeType};
pub use router::{NextNode, Router, SimpleRouter};
pub use types::{GraphConfig, GraphInput, GraphState, LLMConfig, StreamEvent};
