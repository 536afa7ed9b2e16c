use serde_json::json;

use super::*;
use crate::error::ErrorCode;

// ===== sheets =====

#[test]
fn sheets_from_bare_list() {
    let text = json!([
        { "sheetName": "Runs", "columns": ["Sample", "RunId", ""] },
        { "sheetName": "Empty" }
    ])
    .to_string();
    let sheets = parse_sheets(&text).unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].columns, vec!["Sample".to_owned(), "RunId".to_owned()]);
    assert!(sheets[1].columns.is_empty());
}

#[test]
fn sheets_from_envelope() {
    let text = json!({ "sheets": [{ "sheetName": "Runs", "columns": ["A", 3, "B"] }] }).to_string();
    let sheets = parse_sheets(&text).unwrap();
    assert_eq!(sheets[0], SheetInfo { sheet_name: "Runs".to_owned(), columns: vec!["A".to_owned(), "B".to_owned()] });
}

#[test]
fn sheets_without_name_is_an_error() {
    let text = json!([{ "columns": [] }]).to_string();
    assert!(matches!(parse_sheets(&text), Err(ServiceError::Parse(_))));
}

#[test]
fn sheets_invalid_json() {
    let err = parse_sheets("<html>").unwrap_err();
    assert_eq!(err.error_code(), "E_SERVICE_PARSE");
    assert!(!err.retryable());
}

// ===== folders =====

#[test]
fn folders_accept_numeric_ids() {
    let text = json!({ "folders": [
        { "folderId": 12, "description": "Fixtures", "imageCount": 40 },
        { "folderId": "abc" }
    ]})
    .to_string();
    let folders = parse_folders(&text).unwrap();
    assert_eq!(
        folders[0],
        DrawingFolder { folder_id: "12".to_owned(), description: "Fixtures".to_owned(), image_count: 40 }
    );
    assert_eq!(folders[1].description, "");
    assert_eq!(folders[1].image_count, 0);
}

#[test]
fn folders_without_id_is_an_error() {
    let text = json!([{ "description": "x" }]).to_string();
    assert!(parse_folders(&text).is_err());
}

#[test]
fn folders_wrong_shape() {
    let text = json!({ "items": [] }).to_string();
    assert!(matches!(parse_folders(&text), Err(ServiceError::Parse(msg)) if msg.contains("folders")));
}

// ===== generation =====

#[test]
fn artifact_parses_all_fields() {
    let text = json!({
        "artifactId": "art-1",
        "downloadUrl": "https://files.example.test/art-1.pptx",
        "createdAt": "2026-03-01T12:00:00Z"
    })
    .to_string();
    let artifact = parse_artifact(&text).unwrap();
    assert_eq!(artifact.artifact_id, "art-1");
    assert_eq!(artifact.created_at, "2026-03-01T12:00:00Z");
}

#[test]
fn artifact_missing_field() {
    let text = json!({ "artifactId": 5, "downloadUrl": "u" }).to_string();
    let err = parse_artifact(&text).unwrap_err();
    assert!(err.to_string().contains("createdAt"));
}

// ===== settings =====

#[test]
fn settings_must_be_an_object() {
    assert!(parse_settings(&json!({ "elements": [] }).to_string()).is_ok());
    assert!(parse_settings("[1, 2]").is_err());
    assert!(parse_settings("null").is_err());
}

// ===== plumbing =====

#[test]
fn path_segments_are_percent_encoded() {
    assert_eq!(workspace_path("ws-1_a.b~c", "sheets"), "/api/workspaces/ws-1_a.b~c/sheets");
    assert_eq!(workspace_path("a b/c", "drawing-folders"), "/api/workspaces/a%20b%2Fc/drawing-folders");
    assert_eq!(settings_path("é"), "/api/settings/%C3%A9");
    assert_eq!(settings_path("out?id=1"), "/api/settings/out%3Fid%3D1");
}

#[test]
fn backend_keeps_configured_base_url() {
    let config = DesignerConfig { api_base_url: "http://localhost:9".to_owned(), ..DesignerConfig::default() };
    let backend = HttpBackend::new(&config).unwrap();
    assert_eq!(backend.base_url(), "http://localhost:9");
    assert_eq!(backend.url("/api/generate"), "http://localhost:9/api/generate");
}

#[test]
fn status_errors_are_retryable_for_server_faults() {
    assert!(ServiceError::Status { status: 503, body: String::new() }.retryable());
    assert!(ServiceError::Status { status: 429, body: String::new() }.retryable());
    assert!(!ServiceError::Status { status: 400, body: String::new() }.retryable());
    assert!(!ServiceError::NotFound("x".to_owned()).retryable());
}
