pub mod azure_openai;
pub mod config;
pub mod traits;
pub mod types;

pub use azure_openai::AzureOpenAIClient;
pub use config::{normalize_endpoint, AzureConfig, DEFAULT_API_VERSION};
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use types::{Content, FunctionCall, FunctionDefinition, Message, Tool, ToolCall, ToolChoice};
