pub mod config;
pub mod events;
pub mod state;

pub use config::{GraphConfig, LLMConfig};
pub use events::StreamEvent;
pub use state::{GraphInput, GraphState};
