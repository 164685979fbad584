use mockito::Matcher;
use sitecore_llm::{AzureOpenAIClient, ChatClient, ChatOptions, ChatRequest, Message, Tool, ToolChoice};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> AzureOpenAIClient {
    AzureOpenAIClient::builder()
        .api_key("test-key")
        .endpoint(server.url())
        .api_version("2024-10-21")
        .build()
        .unwrap()
}

#[test]
fn test_azure_client_builder_missing_api_key() {
    let result = AzureOpenAIClient::builder()
        .endpoint("https://test-resource.openai.azure.com")
        .api_version("2024-10-21")
        .build();

    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("API key"));
}

#[test]
fn test_azure_client_builder_missing_endpoint() {
    let result = AzureOpenAIClient::builder()
        .api_key("test-key")
        .api_version("2024-10-21")
        .build();

    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("Endpoint"));
}

#[test]
fn test_azure_client_builder_missing_api_version() {
    let result = AzureOpenAIClient::builder()
        .api_key("test-key")
        .endpoint("https://test-resource.openai.azure.com")
        .build();

    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("API version"));
}

#[tokio::test]
async fn test_chat_parses_text_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/openai/deployments/chat-deploy/chat/completions")
        .match_query(Matcher::UrlEncoded("api-version".into(), "2024-10-21".into()))
        .match_header("api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-4o",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi there"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = client_for(&server)
        .chat(ChatRequest::new("chat-deploy", vec![Message::human("Hello")]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("Hi there"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert!(!response.has_tool_calls());
    assert_eq!(response.usage.unwrap().total_tokens, 7);
}

#[tokio::test]
async fn test_chat_parses_tool_calls() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/openai/deployments/chat-deploy/chat/completions")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "tools": [{"type": "function", "function": {"name": "get_item"}}],
            "tool_choice": "auto"
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "chatcmpl-2",
                "model": "gpt-4o",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "get_item", "arguments": "{\"id\":\"42\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let options = ChatOptions::new()
        .tools(vec![Tool::new("get_item", "Get an item", json!({"type": "object"}))])
        .tool_choice(ToolChoice::auto());
    let response = client_for(&server)
        .chat(ChatRequest::new("chat-deploy", vec![Message::human("item 42?")]).with_options(options))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.has_tool_calls());
    let calls = response.tool_calls.unwrap();
    assert_eq!(calls[0].function.name, "get_item");
    assert_eq!(calls[0].arguments_value().unwrap()["id"], "42");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_chat_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/openai/deployments/chat-deploy/chat/completions")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Access denied due to invalid subscription key")
        .create_async()
        .await;

    let err = client_for(&server)
        .chat(ChatRequest::new("chat-deploy", vec![Message::human("Hello")]))
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("401"));
    assert!(msg.contains("invalid subscription key"));
}
