//! Turns OpenAPI operations into callable tools.
//!
//! Each tool owns its own [`OperationBinding`] and a handle to the API caller.
//! Invocation substitutes `{name}` placeholders from the supplied arguments,
//! issues the call without body or query string, and always yields text:
//! pretty-printed JSON on success, `Error: ...` on failure.

use crate::gateway::ApiCaller;
use crate::spec::{OpenApiDocument, Operation};
use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Arguments supplied by the model for one invocation.
pub type ToolArguments = Map<String, Value>;

type InvokeFn = Arc<dyn Fn(ToolArguments) -> BoxFuture<'static, String> + Send + Sync>;

/// The immutable (method, path, description) triple a tool is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationBinding {
    pub method: String,
    pub path_template: String,
    pub description: String,
}

/// A named, documented, invokable unit derived from one operation.
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: Value,
    pub binding: OperationBinding,
    invoke: InvokeFn,
}

impl Tool {
    /// Run the tool. Never fails: errors come back as `Error: <message>`.
    pub async fn invoke(&self, arguments: ToolArguments) -> String {
        (self.invoke)(arguments).await
    }

    /// Function definition handed to the chat model.
    pub fn to_llm_tool(&self) -> sitecore_llm::Tool {
        sitecore_llm::Tool::new(
            self.name.clone(),
            self.description.clone(),
            self.parameters.clone(),
        )
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Callable name for an operationId: every `-` becomes `_`.
pub fn tool_name(operation_id: &str) -> String {
    operation_id.replace('-', "_")
}

/// Placeholder names of a path template, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 1..];
    }

    names
}

/// Substitute `{key}` for every argument; unmatched arguments are ignored and
/// placeholders without an argument stay as they are.
pub fn resolve_path(template: &str, arguments: &ToolArguments) -> String {
    arguments
        .iter()
        .fold(template.to_string(), |path, (key, value)| {
            path.replace(&format!("{{{key}}}"), &value_to_string(value))
        })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

fn parameters_schema(operation: &Operation) -> Value {
    let names = placeholders(&operation.path);

    let properties: Map<String, Value> = names
        .iter()
        .map(|name| {
            let mut property = json!({"type": "string"});
            let description = operation
                .path_params
                .iter()
                .find(|p| &p.name == name)
                .and_then(|p| p.description.clone());
            if let Some(description) = description {
                property["description"] = Value::String(description);
            }
            (name.clone(), property)
        })
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": names,
        "additionalProperties": true,
    })
}

/// Build one tool. The closure owns `binding`, so every tool calls its own operation.
pub fn make_tool(
    name: String,
    binding: OperationBinding,
    parameters: Value,
    caller: Arc<dyn ApiCaller>,
) -> Tool {
    let bound = binding.clone();
    let invoke: InvokeFn = Arc::new(move |arguments: ToolArguments| -> BoxFuture<'static, String> {
        let binding = bound.clone();
        let caller = Arc::clone(&caller);
        Box::pin(async move { run_operation(caller.as_ref(), &binding, &arguments).await })
    });

    Tool {
        description: binding.description.clone(),
        name,
        parameters,
        binding,
        invoke,
    }
}

async fn run_operation(
    caller: &dyn ApiCaller,
    binding: &OperationBinding,
    arguments: &ToolArguments,
) -> String {
    let path = resolve_path(&binding.path_template, arguments);
    let unresolved = placeholders(&path);
    if !unresolved.is_empty() {
        tracing::debug!(?unresolved, %path, "calling with unresolved path placeholders");
    }

    match caller.call_api(&binding.method, &path).await {
        Ok(result) => serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| format!("Error: {e}")),
        Err(e) => {
            tracing::debug!(method = %binding.method, %path, error = %e, "tool call failed");
            format!("Error: {e}")
        }
    }
}

/// One tool per valid operation in `doc`, all sharing `caller`.
pub fn synthesize_tools(doc: &OpenApiDocument, caller: Arc<dyn ApiCaller>) -> Vec<Tool> {
    let mut seen = HashSet::new();

    let tools: Vec<Tool> = doc
        .operations()
        .into_iter()
        .map(|operation| {
            let name = tool_name(&operation.operation_id);
            if !seen.insert(name.clone()) {
                tracing::warn!(tool = %name, "duplicate tool name in OpenAPI spec");
            }
            let binding = OperationBinding {
                method: operation.method.clone(),
                path_template: operation.path.clone(),
                description: operation.summary.clone(),
            };
            make_tool(name, binding, parameters_schema(&operation), Arc::clone(&caller))
        })
        .collect();

    tracing::info!(count = tools.len(), "synthesized tools from OpenAPI spec");
    tools
}
