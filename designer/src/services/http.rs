//! reqwest backend for every service trait, against one API base URL.
//!
//! Routes:
//! - `GET  {base}/api/workspaces/{id}/sheets`
//! - `GET  {base}/api/workspaces/{id}/drawing-folders`
//! - `POST {base}/api/generate`
//! - `PUT  {base}/api/settings/{output_id}` / `GET` the same path

use std::time::Duration;

use canvas::codec::GenerationRequest;
use reqwest::StatusCode;
use serde_json::Value;

use super::{
    DrawingFolder, DrawingFolders, GeneratedArtifact, Generator, ServiceError, SettingsStore, SheetInfo,
    SpreadsheetMetadata,
};
use crate::config::DesignerConfig;

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a backend from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &DesignerConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ServiceError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body text of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, String), ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        Ok((status, text))
    }

    async fn get_ok(&self, path: &str) -> Result<String, ServiceError> {
        let (status, text) = self.send(self.http.get(self.url(path))).await?;
        ensure_success(status, text)
    }
}

fn ensure_success(status: StatusCode, body: String) -> Result<String, ServiceError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(ServiceError::Status { status: status.as_u16(), body })
    }
}

/// `/api/workspaces/{id}/{leaf}` with the id percent-encoded.
pub(crate) fn workspace_path(workspace_id: &str, leaf: &str) -> String {
    format!("/api/workspaces/{}/{leaf}", urlencoding::encode(workspace_id))
}

pub(crate) fn settings_path(output_id: &str) -> String {
    format!("/api/settings/{}", urlencoding::encode(output_id))
}

#[async_trait::async_trait]
impl SpreadsheetMetadata for HttpBackend {
    async fn sheets(&self, workspace_id: &str) -> Result<Vec<SheetInfo>, ServiceError> {
        let path = workspace_path(workspace_id, "sheets");
        let text = self.get_ok(&path).await?;
        parse_sheets(&text)
    }
}

#[async_trait::async_trait]
impl DrawingFolders for HttpBackend {
    async fn folders(&self, workspace_id: &str) -> Result<Vec<DrawingFolder>, ServiceError> {
        let path = workspace_path(workspace_id, "drawing-folders");
        let text = self.get_ok(&path).await?;
        parse_folders(&text)
    }
}

#[async_trait::async_trait]
impl Generator for HttpBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, ServiceError> {
        let (status, text) = self
            .send(self.http.post(self.url("/api/generate")).json(request))
            .await?;
        let text = ensure_success(status, text)?;
        parse_artifact(&text)
    }
}

#[async_trait::async_trait]
impl SettingsStore for HttpBackend {
    async fn save(&self, output_id: &str, payload: &Value) -> Result<(), ServiceError> {
        let path = settings_path(output_id);
        let (status, text) = self.send(self.http.put(self.url(&path)).json(payload)).await?;
        ensure_success(status, text).map(|_| ())
    }

    async fn load(&self, output_id: &str) -> Result<Value, ServiceError> {
        let path = settings_path(output_id);
        let (status, text) = self.send(self.http.get(self.url(&path))).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(output_id.to_owned()));
        }
        let text = ensure_success(status, text)?;
        parse_settings(&text)
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

fn parse_root(json_text: &str) -> Result<Value, ServiceError> {
    serde_json::from_str(json_text).map_err(|e| ServiceError::Parse(e.to_string()))
}

/// The list under `key`, or the root itself when it is already a list.
fn list_at<'a>(root: &'a Value, key: &str) -> Result<&'a Vec<Value>, ServiceError> {
    root.as_array()
        .or_else(|| root.get(key).and_then(Value::as_array))
        .ok_or_else(|| ServiceError::Parse(format!("expected a list or an object with `{key}`")))
}

/// A string field, or a number rendered as a string.
fn string_or_number(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_sheets(json_text: &str) -> Result<Vec<SheetInfo>, ServiceError> {
    let root = parse_root(json_text)?;
    let mut sheets = Vec::new();
    for item in list_at(&root, "sheets")? {
        let Some(sheet_name) = item.get("sheetName").and_then(Value::as_str) else {
            return Err(ServiceError::Parse("sheet entry without sheetName".to_owned()));
        };
        let columns = item
            .get("columns")
            .and_then(Value::as_array)
            .map(|cols| {
                cols.iter()
                    .filter_map(Value::as_str)
                    .filter(|c| !c.trim().is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        sheets.push(SheetInfo { sheet_name: sheet_name.to_owned(), columns });
    }
    Ok(sheets)
}

pub(crate) fn parse_folders(json_text: &str) -> Result<Vec<DrawingFolder>, ServiceError> {
    let root = parse_root(json_text)?;
    let mut folders = Vec::new();
    for item in list_at(&root, "folders")? {
        let Some(folder_id) = string_or_number(item, "folderId") else {
            return Err(ServiceError::Parse("folder entry without folderId".to_owned()));
        };
        folders.push(DrawingFolder {
            folder_id,
            description: item
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            image_count: item
                .get("imageCount")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        });
    }
    Ok(folders)
}

pub(crate) fn parse_artifact(json_text: &str) -> Result<GeneratedArtifact, ServiceError> {
    let root = parse_root(json_text)?;
    let field = |key: &'static str| {
        string_or_number(&root, key).ok_or_else(|| ServiceError::Parse(format!("generation response missing `{key}`")))
    };
    Ok(GeneratedArtifact {
        artifact_id: field("artifactId")?,
        download_url: field("downloadUrl")?,
        created_at: field("createdAt")?,
    })
}

/// Saved settings are returned as-is; the codec does the tolerant decoding.
pub(crate) fn parse_settings(json_text: &str) -> Result<Value, ServiceError> {
    let root = parse_root(json_text)?;
    match root {
        Value::Object(_) => Ok(root),
        other => Err(ServiceError::Parse(format!("expected a settings object, got {other}"))),
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
