#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use sitecore_openapi::{ApiCaller, Result, SitecoreError};
use std::sync::Mutex;

/// Records every (method, path) it receives and echoes them back as JSON.
#[derive(Default)]
pub struct RecordingCaller {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingCaller {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiCaller for RecordingCaller {
    async fn call_api(&self, method: &str, path: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), path.to_string()));
        Ok(json!({"method": method, "path": path}))
    }
}

/// Always fails with the configured status and body.
pub struct FailingCaller {
    pub status: u16,
    pub body: String,
}

#[async_trait]
impl ApiCaller for FailingCaller {
    async fn call_api(&self, _method: &str, _path: &str) -> Result<Value> {
        Err(SitecoreError::ApiCall {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

pub fn sample_spec() -> Value {
    json!({
        "openapi": "3.0.1",
        "paths": {
            "/sites": {
                "get": {"operationId": "list-sites", "summary": "List all sites"},
                "post": {"operationId": "create-site", "summary": "Create a site"}
            },
            "/sites/{siteId}": {
                "parameters": [{"name": "siteId", "in": "path", "required": true}],
                "get": {"operationId": "get-site", "summary": "Get a site"},
                "delete": {"operationId": "delete-site"}
            },
            "/jobs/{jobId}/status": {
                "get": {"operationId": "get-job-status", "summary": "Job status"},
                "x-internal": true,
                "put": {"summary": "missing operation id"}
            }
        }
    })
}
