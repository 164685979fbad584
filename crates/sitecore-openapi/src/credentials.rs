//! OAuth2 client-credentials exchange for the Sitecore cloud.

use crate::error::{Result, SitecoreError};
use reqwest::StatusCode;
use serde::Deserialize;

pub const DEFAULT_TOKEN_URL: &str = "https://auth.sitecorecloud.io/oauth/token";
pub const DEFAULT_AUDIENCE: &str = "https://api.sitecorecloud.io";

pub const CLIENT_ID_ENV: &str = "SITECORE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SITECORE_CLIENT_SECRET";

/// Validated client id/secret pair.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Both values must be present and non-blank.
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Result<Self> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (non_blank(client_id), non_blank(client_secret)) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id,
                client_secret,
            }),
            _ => Err(SitecoreError::Configuration(format!(
                "{CLIENT_ID_ENV} and {CLIENT_SECRET_ENV} must be set"
            ))),
        }
    }

    /// Read the pair from `SITECORE_CLIENT_ID` / `SITECORE_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(CLIENT_ID_ENV).ok(),
            std::env::var(CLIENT_SECRET_ENV).ok(),
        )
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token, obtained once per process.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges client credentials for a bearer token.
#[derive(Debug, Clone)]
pub struct CredentialProvider {
    http: reqwest::Client,
    token_url: String,
    audience: String,
}

impl Default for CredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_URL, DEFAULT_AUDIENCE)
    }
}

impl CredentialProvider {
    pub fn new(token_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            audience: audience.into(),
        }
    }

    /// Single POST with the `client_credentials` grant, no retry.
    pub async fn obtain_token(&self, credentials: &ClientCredentials) -> Result<BearerToken> {
        tracing::debug!(
            token_url = %self.token_url,
            client_id = %credentials.client_id,
            "requesting access token"
        );

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("audience", self.audience.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(SitecoreError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SitecoreError::Authentication {
                status: status.as_u16(),
                body: format!("malformed token response: {e}"),
            })?;

        tracing::info!("obtained Sitecore access token");
        Ok(BearerToken::new(token.access_token))
    }
}
