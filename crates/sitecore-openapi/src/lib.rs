//! Sitecore Agent API access and OpenAPI-driven tool synthesis.
//!
//! - [`credentials`]: OAuth2 client-credentials token exchange
//! - [`gateway`]: bearer-authenticated API calls
//! - [`spec`]: OpenAPI document model and loader (remote, then local fallback)
//! - [`synth`]: one callable tool per operation
//! - [`executor`]: the tool registry handed to the agent

pub mod credentials;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod spec;
pub mod synth;

pub use credentials::{BearerToken, ClientCredentials, CredentialProvider};
pub use error::{Result, SitecoreError};
pub use executor::{ToolExecutor, ToolRegistry};
pub use gateway::{ApiCaller, ApiGatewayClient};
pub use spec::{OpenApiDocument, Operation, SpecLoader};
pub use synth::{make_tool, resolve_path, synthesize_tools, tool_name, OperationBinding, Tool, ToolArguments};
