// Azure OpenAI connection settings and client construction

use crate::azure_openai::AzureOpenAIClient;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Configuration for the Azure OpenAI provider
#[derive(Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    pub api_key: String,
    /// Resource base URL (already normalized, see [`normalize_endpoint`])
    pub endpoint: String,
    pub api_version: String,
    /// Chat deployment name, sent as the request model
    pub deployment: String,
}

impl AzureConfig {
    /// Create a config from a raw endpoint as found in `AZURE_OPENAI_ENDPOINT`
    ///
    /// Portal endpoints often include the full deployment path
    /// (`https://res.openai.azure.com/openai/deployments/x/...`); everything
    /// from `/openai` onward is dropped.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl AsRef<str>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: normalize_endpoint(endpoint.as_ref()),
            api_version: DEFAULT_API_VERSION.to_string(),
            deployment: deployment.into(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn build_client(&self) -> Result<AzureOpenAIClient> {
        AzureOpenAIClient::builder()
            .api_key(self.api_key.clone())
            .endpoint(self.endpoint.clone())
            .api_version(self.api_version.clone())
            .build()
    }
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .finish()
    }
}

/// Keep only the part of an Azure endpoint before `/openai`
pub fn normalize_endpoint(raw: &str) -> String {
    let base = match raw.find("/openai") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    base.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_openai_suffix() {
        assert_eq!(
            normalize_endpoint(
                "https://my-resource.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
            ),
            "https://my-resource.openai.azure.com"
        );
    }

    #[test]
    fn test_normalize_plain_endpoint() {
        assert_eq!(
            normalize_endpoint("https://my-resource.openai.azure.com/"),
            "https://my-resource.openai.azure.com"
        );
        assert_eq!(
            normalize_endpoint("https://my-resource.openai.azure.com"),
            "https://my-resource.openai.azure.com"
        );
    }

    #[test]
    fn test_azure_config_defaults() {
        let config = AzureConfig::new(
            "test-key",
            "https://my-resource.openai.azure.com/openai/v1",
            "gpt-4o",
        );
        assert_eq!(config.endpoint, "https://my-resource.openai.azure.com");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.deployment, "gpt-4o");
        assert!(!format!("{:?}", config).contains("test-key"));
    }

    #[test]
    fn test_build_client() {
        let config = AzureConfig::new("test-key", "https://my-resource.openai.azure.com", "gpt-4o")
            .with_api_version("2024-02-15-preview");
        let client = config.build_client().unwrap();
        assert_eq!(client.endpoint(), "https://my-resource.openai.azure.com");
    }
}
