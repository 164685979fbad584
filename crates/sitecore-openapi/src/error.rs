use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitecoreError {
    /// Missing or empty required settings (credentials, endpoints).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token endpoint answered with a non-200 status or an unusable body.
    #[error("Auth failed: {status} - {body}")]
    Authentication { status: u16, body: String },

    /// Neither the remote spec nor the local fallback could be loaded.
    #[error("Failed to load OpenAPI spec from fallback '{fallback}': {message}")]
    SpecLoad { fallback: String, message: String },

    /// Gateway answered with anything other than 200.
    #[error("API call failed: {status} - {body}")]
    ApiCall { status: u16, body: String },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SitecoreError {
    /// HTTP status carried by auth and API call failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::ApiCall { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SitecoreError>;
