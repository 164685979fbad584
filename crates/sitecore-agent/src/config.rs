use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use sitecore_graph::LLMConfig;
use sitecore_llm::{AzureConfig, DEFAULT_API_VERSION};
use sitecore_openapi::credentials::{DEFAULT_AUDIENCE, DEFAULT_TOKEN_URL};
use sitecore_openapi::gateway::DEFAULT_BASE_URL;
use sitecore_openapi::spec::{DEFAULT_FALLBACK_PATH, DEFAULT_SPEC_URL};
use sitecore_openapi::{ClientCredentials, SitecoreError};

/// Process configuration, keyed by the environment variable names
/// (lowercased by the loader).
#[derive(Clone, Deserialize)]
pub struct Config {
    // Secrets (from ENV only)
    #[serde(default)]
    pub sitecore_client_id: Option<String>,
    #[serde(default)]
    pub sitecore_client_secret: Option<String>,
    #[serde(default)]
    pub azure_openai_api_key: Option<String>,

    #[serde(default)]
    pub azure_openai_endpoint: Option<String>,
    #[serde(default)]
    pub azure_openai_chat_deployment_name: Option<String>,
    pub azure_openai_api_version: String,

    #[serde(default)]
    pub llm_temperature: Option<f32>,
    #[serde(default)]
    pub llm_max_tokens: Option<u32>,

    pub sitecore_token_url: String,
    pub sitecore_audience: String,
    pub sitecore_api_base_url: String,
    pub sitecore_spec_url: String,
    pub sitecore_spec_fallback: String,

    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. built-in defaults
    /// 2. config/default.toml
    /// 3. environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    /// Same layering as [`Config::load`] with a caller-supplied environment source
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("azure_openai_api_version", DEFAULT_API_VERSION)?
            .set_default("sitecore_token_url", DEFAULT_TOKEN_URL)?
            .set_default("sitecore_audience", DEFAULT_AUDIENCE)?
            .set_default("sitecore_api_base_url", DEFAULT_BASE_URL)?
            .set_default("sitecore_spec_url", DEFAULT_SPEC_URL)?
            .set_default("sitecore_spec_fallback", DEFAULT_FALLBACK_PATH)?
            .set_default("log_level", "warn")?
            .set_default("log_format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(environment.try_parsing(false))
            .build()?;

        config.try_deserialize()
    }

    /// Client credentials, validated before any network activity
    pub fn sitecore_credentials(&self) -> Result<ClientCredentials, SitecoreError> {
        ClientCredentials::new(
            self.sitecore_client_id.clone(),
            self.sitecore_client_secret.clone(),
        )
    }

    pub fn azure_config(&self) -> Result<AzureConfig, SitecoreError> {
        let endpoint = required(&self.azure_openai_endpoint, "AZURE_OPENAI_ENDPOINT")?;
        let api_key = required(&self.azure_openai_api_key, "AZURE_OPENAI_API_KEY")?;
        let deployment = required(
            &self.azure_openai_chat_deployment_name,
            "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME",
        )?;

        Ok(AzureConfig::new(api_key, endpoint, deployment)
            .with_api_version(self.azure_openai_api_version.clone()))
    }

    /// Sampling settings for the given deployment; unset values are left to the service
    pub fn llm_config(&self, deployment: &str) -> LLMConfig {
        let mut config = LLMConfig::new(deployment);
        if let Some(temp) = self.llm_temperature {
            config = config.with_temperature(temp);
        }
        if let Some(tokens) = self.llm_max_tokens {
            config = config.with_max_tokens(tokens);
        }
        config
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, SitecoreError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SitecoreError::Configuration(format!("{name} must be set")))
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("sitecore_client_id", &self.sitecore_client_id)
            .field("azure_openai_endpoint", &self.azure_openai_endpoint)
            .field(
                "azure_openai_chat_deployment_name",
                &self.azure_openai_chat_deployment_name,
            )
            .field("azure_openai_api_version", &self.azure_openai_api_version)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("sitecore_token_url", &self.sitecore_token_url)
            .field("sitecore_audience", &self.sitecore_audience)
            .field("sitecore_api_base_url", &self.sitecore_api_base_url)
            .field("sitecore_spec_url", &self.sitecore_spec_url)
            .field("sitecore_spec_fallback", &self.sitecore_spec_fallback)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_environment(Environment::default().source(Some(map))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_vars(&[]);
        assert_eq!(config.sitecore_token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.sitecore_audience, DEFAULT_AUDIENCE);
        assert_eq!(config.sitecore_api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.sitecore_spec_url, DEFAULT_SPEC_URL);
        assert_eq!(config.sitecore_spec_fallback, "index.json");
        assert_eq!(config.azure_openai_api_version, "2024-10-21");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, "pretty");
        assert!(config.sitecore_client_id.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = from_vars(&[
            ("SITECORE_CLIENT_ID", "id"),
            ("SITECORE_CLIENT_SECRET", "secret"),
            ("SITECORE_API_BASE_URL", "http://localhost:9000"),
            ("LOG_FORMAT", "json"),
        ]);
        assert_eq!(config.sitecore_api_base_url, "http://localhost:9000");
        assert_eq!(config.log_format, "json");
        assert_eq!(config.sitecore_credentials().unwrap().client_id(), "id");
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let config = from_vars(&[("SITECORE_CLIENT_SECRET", "secret")]);
        let err = config.sitecore_credentials().unwrap_err();
        assert!(matches!(err, SitecoreError::Configuration(_)));
    }

    #[test]
    fn test_azure_config() {
        let config = from_vars(&[
            (
                "AZURE_OPENAI_ENDPOINT",
                "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions",
            ),
            ("AZURE_OPENAI_API_KEY", "key"),
            ("AZURE_OPENAI_CHAT_DEPLOYMENT_NAME", "gpt-4o"),
            ("AZURE_OPENAI_API_VERSION", "2024-06-01"),
        ]);
        let azure = config.azure_config().unwrap();
        assert_eq!(azure.endpoint, "https://res.openai.azure.com");
        assert_eq!(azure.deployment, "gpt-4o");
        assert_eq!(azure.api_version, "2024-06-01");
    }

    #[test]
    fn test_azure_config_requires_values() {
        let config = from_vars(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "  "),
        ]);
        let err = config.azure_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: AZURE_OPENAI_API_KEY must be set"
        );
    }

    #[test]
    fn test_llm_config() {
        let config = from_vars(&[]);
        let llm = config.llm_config("gpt-4o");
        assert_eq!(llm.model, "gpt-4o");
        assert_eq!(llm.temperature, None);
        assert_eq!(llm.max_tokens, None);

        let config = from_vars(&[("LLM_TEMPERATURE", "0.2"), ("LLM_MAX_TOKENS", "800")]);
        let llm = config.llm_config("gpt-4o");
        assert_eq!(llm.temperature, Some(0.2));
        assert_eq!(llm.max_tokens, Some(800));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = from_vars(&[
            ("SITECORE_CLIENT_SECRET", "s3cr3t"),
            ("AZURE_OPENAI_API_KEY", "k3y"),
        ]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cr3t"));
        assert!(!rendered.contains("k3y"));
    }
}
