//! OpenAPI document model and loader with a local-file fallback.

use crate::error::{Result, SitecoreError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub const DEFAULT_SPEC_URL: &str =
    "https://api-docs.sitecore.com/_spec/ai-capabilities/agent-api/index.json?download";
pub const DEFAULT_FALLBACK_PATH: &str = "index.json";

/// The parts of an OpenAPI document the tool synthesizer reads.
///
/// `paths` stays raw JSON: path items may hold non-operation keys
/// (`parameters`, `summary`, vendor extensions) that are skipped later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub paths: Map<String, Value>,
}

/// One HTTP-method-bound endpoint of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub operation_id: String,
    pub summary: String,
    /// Uppercase HTTP verb
    pub method: String,
    pub path: String,
    pub path_params: Vec<PathParam>,
}

/// Path parameter declared on an operation or its path item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    pub name: String,
    pub description: Option<String>,
}

impl OpenApiDocument {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Every entry under `paths.*.*` that is an object with a string `operationId`.
    pub fn operations(&self) -> Vec<Operation> {
        let mut operations = Vec::new();

        for (path, methods) in &self.paths {
            let Some(methods) = methods.as_object() else {
                continue;
            };
            let shared_params = methods.get("parameters");

            for (method, operation) in methods {
                let Some(operation) = operation.as_object() else {
                    continue;
                };
                let Some(operation_id) = operation.get("operationId").and_then(Value::as_str)
                else {
                    continue;
                };

                let summary = operation
                    .get("summary")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                let mut path_params = path_params_of(operation.get("parameters"));
                for shared in path_params_of(shared_params) {
                    if !path_params.iter().any(|p| p.name == shared.name) {
                        path_params.push(shared);
                    }
                }

                operations.push(Operation {
                    operation_id: operation_id.to_string(),
                    summary,
                    method: method.to_ascii_uppercase(),
                    path: path.clone(),
                    path_params,
                });
            }
        }

        operations
    }
}

fn path_params_of(parameters: Option<&Value>) -> Vec<PathParam> {
    parameters
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|p| p.get("in").and_then(Value::as_str) == Some("path"))
        .filter_map(|p| {
            Some(PathParam {
                name: p.get("name")?.as_str()?.to_string(),
                description: p
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}

/// Fetches the spec from a URL, falling back to a local copy on any failure.
#[derive(Debug, Clone)]
pub struct SpecLoader {
    http: reqwest::Client,
    url: String,
    fallback_path: PathBuf,
}

impl Default for SpecLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SPEC_URL, DEFAULT_FALLBACK_PATH)
    }
}

impl SpecLoader {
    pub fn new(url: impl Into<String>, fallback_path: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// At most two attempts: remote, then the fallback file.
    pub async fn load(&self) -> Result<OpenApiDocument> {
        match self.fetch_remote().await {
            Ok(doc) => {
                tracing::info!(url = %self.url, "loaded OpenAPI spec");
                Ok(doc)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to download spec, using local {}: {}",
                    self.fallback_path.display(),
                    e
                );
                self.load_fallback().await
            }
        }
    }

    async fn fetch_remote(&self) -> Result<OpenApiDocument> {
        let body = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        OpenApiDocument::from_json_str(&body)
    }

    async fn load_fallback(&self) -> Result<OpenApiDocument> {
        let fallback = self.fallback_path.display().to_string();

        let content = tokio::fs::read_to_string(&self.fallback_path)
            .await
            .map_err(|e| SitecoreError::SpecLoad {
                fallback: fallback.clone(),
                message: e.to_string(),
            })?;

        let doc = OpenApiDocument::from_json_str(&content).map_err(|e| SitecoreError::SpecLoad {
            fallback,
            message: e.to_string(),
        })?;

        tracing::info!(path = %self.fallback_path.display(), "loaded OpenAPI spec from fallback");
        Ok(doc)
    }
}
