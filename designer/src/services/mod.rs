//! Services: the external collaborators a design session talks to.
//!
//! DESIGN
//! ======
//! Each collaborator is an async trait so the session can run against the
//! reqwest backend in [`http`] or an in-memory double in tests. None of them
//! know about editing state; they move metadata and payloads only.

pub mod http;

use canvas::codec::GenerationRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

/// One sheet of the workspace spreadsheet and its column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub sheet_name: String,
    pub columns: Vec<String>,
}

/// A folder of drawings an extra-image element can bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingFolder {
    pub folder_id: String,
    pub description: String,
    pub image_count: u64,
}

/// Result of a successful generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub artifact_id: String,
    pub download_url: String,
    /// Creation timestamp exactly as reported by the service.
    pub created_at: String,
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by service backends.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// Nothing is stored under the requested identifier.
    #[error("nothing saved for {0:?}")]
    NotFound(String),

    /// The response body was not in the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_SERVICE_REQUEST",
            Self::Status { .. } => "E_SERVICE_STATUS",
            Self::NotFound(_) => "E_SERVICE_NOT_FOUND",
            Self::Parse(_) => "E_SERVICE_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Enumerates sheets and their columns.
#[async_trait::async_trait]
pub trait SpreadsheetMetadata: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails or the response is malformed.
    async fn sheets(&self, workspace_id: &str) -> Result<Vec<SheetInfo>, ServiceError>;
}

/// Enumerates drawing folders.
#[async_trait::async_trait]
pub trait DrawingFolders: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails or the response is malformed.
    async fn folders(&self, workspace_id: &str) -> Result<Vec<DrawingFolder>, ServiceError>;
}

/// Renders a layout into a presentation artifact.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails or the response is malformed.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact, ServiceError>;
}

/// Persists layout payloads by output identifier.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store `payload` under `output_id`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails.
    async fn save(&self, output_id: &str, payload: &Value) -> Result<(), ServiceError>;

    /// Fetch the payload stored under `output_id`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] when nothing is stored; otherwise any
    /// request or parse failure.
    async fn load(&self, output_id: &str) -> Result<Value, ServiceError>;
}
