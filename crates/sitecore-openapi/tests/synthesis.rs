mod common;

use common::{sample_spec, FailingCaller, RecordingCaller};
use serde_json::{json, Value};
use sitecore_openapi::{synthesize_tools, OpenApiDocument, ToolExecutor, ToolRegistry};
use std::sync::Arc;

fn document(value: Value) -> OpenApiDocument {
    serde_json::from_value(value).unwrap()
}

fn arguments(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_one_tool_per_valid_operation() {
    let tools = synthesize_tools(&document(sample_spec()), Arc::new(RecordingCaller::default()));

    let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["create_site", "delete_site", "get_job_status", "get_site", "list_sites"]
    );
}

#[test]
fn test_tool_metadata() {
    let tools = synthesize_tools(&document(sample_spec()), Arc::new(RecordingCaller::default()));
    let get_site = tools.iter().find(|t| t.name == "get_site").unwrap();
    let delete_site = tools.iter().find(|t| t.name == "delete_site").unwrap();

    assert_eq!(get_site.description, "Get a site");
    assert_eq!(get_site.binding.method, "GET");
    assert_eq!(get_site.binding.path_template, "/sites/{siteId}");
    assert_eq!(get_site.parameters["required"], json!(["siteId"]));
    assert_eq!(delete_site.description, "");
    assert_eq!(delete_site.binding.method, "DELETE");
}

#[test]
fn test_synthesis_is_repeatable() {
    let doc = document(sample_spec());
    let caller = Arc::new(RecordingCaller::default());

    let first = synthesize_tools(&doc, caller.clone());
    let second = synthesize_tools(&doc, caller);

    let describe = |tools: &[sitecore_openapi::Tool]| {
        tools
            .iter()
            .map(|t| (t.name.clone(), t.binding.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(describe(&first), describe(&second));
}

#[tokio::test]
async fn test_each_tool_calls_its_own_operation() {
    let caller = Arc::new(RecordingCaller::default());
    let tools = synthesize_tools(&document(sample_spec()), caller.clone());

    let expected = [
        ("list_sites", "GET", "/sites"),
        ("create_site", "POST", "/sites"),
        ("get_site", "GET", "/sites/s1"),
        ("delete_site", "DELETE", "/sites/s1"),
        ("get_job_status", "GET", "/jobs/j9/status"),
    ];

    for (name, method, path) in expected {
        let tool = tools.iter().find(|t| t.name == name).unwrap();
        let before = caller.calls().len();

        tool.invoke(arguments(json!({"siteId": "s1", "jobId": "j9"}))).await;

        let calls = caller.calls();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(
            calls.last().unwrap(),
            &(method.to_string(), path.to_string()),
            "tool {name} called the wrong operation"
        );
    }
}

#[tokio::test]
async fn test_success_returns_indented_json() {
    let caller = Arc::new(RecordingCaller::default());
    let tools = synthesize_tools(&document(sample_spec()), caller);
    let tool = tools.iter().find(|t| t.name == "list_sites").unwrap();

    let output = tool.invoke(arguments(json!({}))).await;

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"method": "GET", "path": "/sites"}));
    assert!(output.contains("\n  \"method\": \"GET\""));
}

#[tokio::test]
async fn test_unresolved_placeholder_is_still_called() {
    let caller = Arc::new(RecordingCaller::default());
    let tools = synthesize_tools(&document(sample_spec()), caller.clone());
    let tool = tools.iter().find(|t| t.name == "get_site").unwrap();

    tool.invoke(arguments(json!({"unrelated": 1}))).await;

    assert_eq!(
        caller.calls(),
        vec![("GET".to_string(), "/sites/{siteId}".to_string())]
    );
}

#[tokio::test]
async fn test_api_error_becomes_text() {
    let caller = Arc::new(FailingCaller {
        status: 404,
        body: "not found".to_string(),
    });
    let tools = synthesize_tools(&document(sample_spec()), caller);
    let tool = tools.iter().find(|t| t.name == "get_site").unwrap();

    let output = tool.invoke(arguments(json!({"siteId": "missing"}))).await;

    assert_eq!(output, "Error: API call failed: 404 - not found");
}

#[tokio::test]
async fn test_registry_executes_by_name() {
    let caller = Arc::new(RecordingCaller::default());
    let registry = ToolRegistry::new(synthesize_tools(&document(sample_spec()), caller.clone()));

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.llm_tools().len(), 5);

    let output = registry
        .execute("get_job_status", json!({"jobId": 3}))
        .await
        .unwrap();
    assert!(output.contains("/jobs/3/status"));

    // Null arguments mean "no arguments"
    registry.execute("list_sites", Value::Null).await.unwrap();
    assert_eq!(caller.calls().last().unwrap().1, "/sites");
}

#[tokio::test]
async fn test_registry_rejects_bad_calls() {
    let registry = ToolRegistry::new(synthesize_tools(
        &document(sample_spec()),
        Arc::new(RecordingCaller::default()),
    ));

    let unknown = registry.execute("get-site", json!({})).await.unwrap_err();
    assert!(unknown.to_string().contains("not found"));

    let not_object = registry.execute("get_site", json!(["s1"])).await.unwrap_err();
    assert!(not_object.to_string().contains("JSON object"));
}

#[test]
fn test_llm_tool_definitions() {
    let registry = ToolRegistry::new(synthesize_tools(
        &document(sample_spec()),
        Arc::new(RecordingCaller::default()),
    ));

    let get_site = registry
        .llm_tools()
        .into_iter()
        .find(|t| t.name() == "get_site")
        .unwrap();
    assert_eq!(get_site.function.description.as_deref(), Some("Get a site"));
    assert_eq!(get_site.function.parameters["properties"]["siteId"]["type"], "string");
}
