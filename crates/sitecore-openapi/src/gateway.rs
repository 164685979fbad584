//! Authenticated calls against the Sitecore Agent API.

use crate::credentials::BearerToken;
use crate::error::{Result, SitecoreError};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://edge-platform.sitecorecloud.io/stream/ai-agent-api";

/// Issues one API request for a fully resolved path.
///
/// Tools only depend on this trait, so tests can record the calls a tool makes.
#[async_trait]
pub trait ApiCaller: Send + Sync {
    async fn call_api(&self, method: &str, path: &str) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ApiGatewayClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<BearerToken>,
}

impl ApiGatewayClient {
    pub fn new(base_url: impl Into<String>, token: Arc<BearerToken>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiCaller for ApiGatewayClient {
    async fn call_api(&self, method: &str, path: &str) -> Result<Value> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| SitecoreError::InvalidMethod(method.to_string()))?;
        let url = self.url_for(path);

        tracing::debug!(%method, %url, "calling Sitecore API");

        let response = self
            .http
            .request(method, &url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The platform answers 200 on success; anything else (201/204 included) is a failure
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), %url, "Sitecore API call failed");
            return Err(SitecoreError::ApiCall {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_plain_concatenation() {
        let client = ApiGatewayClient::new(DEFAULT_BASE_URL, Arc::new(BearerToken::new("t")));
        assert_eq!(
            client.url_for("/sites/abc"),
            "https://edge-platform.sitecorecloud.io/stream/ai-agent-api/sites/abc"
        );
    }

    #[tokio::test]
    async fn test_invalid_method_is_rejected() {
        let client = ApiGatewayClient::new("http://127.0.0.1:1", Arc::new(BearerToken::new("t")));
        let err = client.call_api("NOT A METHOD", "/x").await.unwrap_err();
        assert!(matches!(err, SitecoreError::InvalidMethod(_)));
    }
}
