//! Design session: one layout document plus the metadata needed to bind it.
//!
//! DESIGN
//! ======
//! The session owns an [`EngineCore`] and forwards editing to it. It adds
//! what the engine cannot know: which sheets, columns, and drawing folders
//! exist, and how to reach the generation and settings services.
//!
//! Every boundary call is all-or-nothing with respect to the document. A
//! failed fetch, generation, save, or load logs a warning, returns a
//! [`SessionError`] whose message is suitable for a user notification, and
//! leaves the document exactly as it was.

use std::sync::Arc;

use canvas::codec::{CodecError, GenerationRequest, from_transport_payload, to_json};
use canvas::doc::{BindingChoices, DocumentBindings, ElementId, ElementKind, LayoutDocument, StoreError};
use canvas::engine::{Action, EngineCore};
use canvas::geometry::CanvasBounds;

use crate::error::ErrorCode;
use crate::services::http::HttpBackend;
use crate::services::{
    DrawingFolder, DrawingFolders, GeneratedArtifact, Generator, ServiceError, SettingsStore, SheetInfo,
    SpreadsheetMetadata,
};

// =============================================================================
// ERROR
// =============================================================================

/// Session-level failures. `Display` is the user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("could not {operation}: {source}")]
    Service {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("sheet {0:?} does not exist in this workspace")]
    UnknownSheet(String),

    #[error("column {column:?} does not exist in sheet {sheet:?}")]
    UnknownColumn { sheet: String, column: String },

    #[error("select a sheet first")]
    NoSheetSelected,
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.error_code(),
            Self::Codec(e) => e.error_code(),
            Self::Service { source, .. } => source.error_code(),
            Self::UnknownSheet(_) => "E_UNKNOWN_SHEET",
            Self::UnknownColumn { .. } => "E_UNKNOWN_COLUMN",
            Self::NoSheetSelected => "E_NO_SHEET_SELECTED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Service { source, .. } => source.retryable(),
            _ => false,
        }
    }
}

fn service_error(operation: &'static str) -> impl FnOnce(ServiceError) -> SessionError {
    move |source| {
        tracing::warn!(error = %source, code = source.error_code(), operation, "service call failed");
        SessionError::Service { operation, source }
    }
}

// =============================================================================
// SERVICES
// =============================================================================

/// The four collaborators, shareable across sessions.
#[derive(Clone)]
pub struct Services {
    pub metadata: Arc<dyn SpreadsheetMetadata>,
    pub folders: Arc<dyn DrawingFolders>,
    pub generator: Arc<dyn Generator>,
    pub settings: Arc<dyn SettingsStore>,
}

impl Services {
    /// Route every collaborator through one HTTP backend.
    #[must_use]
    pub fn http(backend: Arc<HttpBackend>) -> Self {
        Self { metadata: backend.clone(), folders: backend.clone(), generator: backend.clone(), settings: backend }
    }
}

/// Result of [`DesignSession::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A saved layout replaced the document.
    Loaded(Vec<Action>),
    /// Nothing was saved for this output; the document is unchanged.
    NothingSaved,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct DesignSession {
    workspace_id: String,
    output_id: String,
    services: Services,
    engine: EngineCore,
    sheets: Vec<SheetInfo>,
    folders: Vec<DrawingFolder>,
}

impl DesignSession {
    /// Start a session over a freshly seeded document.
    #[must_use]
    pub fn new(
        workspace_id: impl Into<String>,
        output_id: impl Into<String>,
        services: Services,
        bounds: CanvasBounds,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            output_id: output_id.into(),
            services,
            engine: EngineCore::with_bounds(bounds),
            sheets: Vec::new(),
            folders: Vec::new(),
        }
    }

    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    #[must_use]
    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    /// Direct access for pointer and key events.
    pub fn engine_mut(&mut self) -> &mut EngineCore {
        &mut self.engine
    }

    #[must_use]
    pub fn document(&self) -> &LayoutDocument {
        self.engine.document()
    }

    #[must_use]
    pub fn sheets(&self) -> &[SheetInfo] {
        &self.sheets
    }

    #[must_use]
    pub fn folders(&self) -> &[DrawingFolder] {
        &self.folders
    }

    /// Columns of the selected sheet; empty when no sheet is selected.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.selected_sheet()
            .map_or(&[][..], |sheet| sheet.columns.as_slice())
    }

    fn selected_sheet(&self) -> Option<&SheetInfo> {
        let name = &self.document().bindings.sheet_name;
        self.sheets.iter().find(|sheet| &sheet.sheet_name == name)
    }

    // --- Metadata ---

    /// Fetch sheets and drawing folders.
    ///
    /// Both are fetched before either is stored, so a failure keeps the
    /// previous metadata.
    ///
    /// # Errors
    ///
    /// [`SessionError::Service`] when either fetch fails.
    pub async fn refresh_metadata(&mut self) -> Result<(), SessionError> {
        let sheets = self
            .services
            .metadata
            .sheets(&self.workspace_id)
            .await
            .map_err(service_error("load spreadsheet metadata"))?;
        let folders = self
            .services
            .folders
            .folders(&self.workspace_id)
            .await
            .map_err(service_error("load drawing folders"))?;
        tracing::debug!(
            workspace_id = %self.workspace_id,
            sheets = sheets.len(),
            folders = folders.len(),
            "metadata refreshed"
        );
        self.sheets = sheets;
        self.folders = folders;
        self.prune_bindings();
        Ok(())
    }

    /// Drop bindings the current metadata no longer backs. A vanished sheet
    /// clears every binding.
    fn prune_bindings(&mut self) {
        let bindings = &mut self.engine.doc.bindings;
        if bindings.sheet_name.is_empty() {
            return;
        }
        match self.sheets.iter().find(|s| s.sheet_name == bindings.sheet_name) {
            Some(sheet) => retain_sheet_columns(bindings, sheet),
            None => {
                tracing::info!(sheet = %bindings.sheet_name, "selected sheet no longer exists");
                *bindings = DocumentBindings::default();
            }
        }
    }

    // --- Document bindings ---

    /// Select the sheet whose columns feed the slide.
    ///
    /// Column bindings that do not exist in the new sheet are cleared.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSheet`] when the sheet is not in the metadata.
    pub fn select_sheet(&mut self, sheet_name: &str) -> Result<(), SessionError> {
        let Some(sheet) = self.sheets.iter().find(|s| s.sheet_name == sheet_name) else {
            return Err(SessionError::UnknownSheet(sheet_name.to_owned()));
        };
        let bindings = &mut self.engine.doc.bindings;
        retain_sheet_columns(bindings, sheet);
        bindings.sheet_name = sheet.sheet_name.clone();
        Ok(())
    }

    /// # Errors
    ///
    /// [`SessionError::NoSheetSelected`] or [`SessionError::UnknownColumn`].
    pub fn set_title_column(&mut self, column: &str) -> Result<(), SessionError> {
        self.check_column(column)?;
        self.engine.doc.bindings.title_column = column.to_owned();
        Ok(())
    }

    /// `None` removes the description binding.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSheetSelected`] or [`SessionError::UnknownColumn`].
    pub fn set_description_column(&mut self, column: Option<&str>) -> Result<(), SessionError> {
        if let Some(column) = column {
            self.check_column(column)?;
        }
        self.engine.doc.bindings.description_column = column.map(str::to_owned);
        Ok(())
    }

    /// # Errors
    ///
    /// [`SessionError::NoSheetSelected`] or [`SessionError::UnknownColumn`].
    pub fn set_match_column(&mut self, column: &str) -> Result<(), SessionError> {
        self.check_column(column)?;
        self.engine.doc.bindings.match_column = column.to_owned();
        Ok(())
    }

    fn check_column(&self, column: &str) -> Result<(), SessionError> {
        let sheet = self.selected_sheet().ok_or(SessionError::NoSheetSelected)?;
        if sheet.columns.iter().any(|c| c == column) {
            Ok(())
        } else {
            Err(SessionError::UnknownColumn { sheet: sheet.sheet_name.clone(), column: column.to_owned() })
        }
    }

    // --- Elements ---

    /// Add a free-text or extra-image element bound to the first available
    /// column or folder.
    ///
    /// # Errors
    ///
    /// [`SessionError::Store`] with [`StoreError::BindingUnavailable`] when
    /// there is nothing to bind to; the document is unchanged.
    pub fn add_element(&mut self, kind: ElementKind) -> Result<Vec<Action>, SessionError> {
        let folder_ids: Vec<String> = self.folders.iter().map(|f| f.folder_id.clone()).collect();
        let columns = self.columns().to_vec();
        let choices = BindingChoices { columns: &columns, folders: &folder_ids };
        self.engine.add_element(kind, &choices).map_err(|e| {
            tracing::warn!(error = %e, code = e.error_code(), %kind, "add element refused");
            SessionError::from(e)
        })
    }

    /// # Errors
    ///
    /// [`SessionError::Store`] for unknown ids and fixed kinds.
    pub fn remove_element(&mut self, id: &ElementId) -> Result<Vec<Action>, SessionError> {
        Ok(self.engine.remove_element(id)?)
    }

    // --- Boundary operations ---

    /// Submit the current layout for generation.
    ///
    /// # Errors
    ///
    /// [`SessionError::Codec`] when a required binding is missing, or
    /// [`SessionError::Service`] when the generator fails.
    pub async fn generate(&self) -> Result<GeneratedArtifact, SessionError> {
        let request = GenerationRequest::from_document(self.document())?;
        let artifact = self
            .services
            .generator
            .generate(&request)
            .await
            .map_err(service_error("generate the presentation"))?;
        tracing::info!(
            output_id = %self.output_id,
            artifact_id = %artifact.artifact_id,
            elements = request.payload().elements.len(),
            "presentation generated"
        );
        Ok(artifact)
    }

    /// Persist the current layout under this session's output id.
    ///
    /// # Errors
    ///
    /// [`SessionError::Codec`] if serialization fails or
    /// [`SessionError::Service`] when the store rejects the payload.
    pub async fn save(&self) -> Result<(), SessionError> {
        let payload = to_json(self.document())?;
        self.services
            .settings
            .save(&self.output_id, &payload)
            .await
            .map_err(service_error("save the layout"))?;
        tracing::info!(output_id = %self.output_id, "layout saved");
        Ok(())
    }

    /// Replace the document with the layout saved for this output.
    ///
    /// # Errors
    ///
    /// [`SessionError::Service`] for any failure other than "nothing saved".
    pub async fn load(&mut self) -> Result<LoadOutcome, SessionError> {
        let payload = match self.services.settings.load(&self.output_id).await {
            Ok(payload) => payload,
            Err(ServiceError::NotFound(_)) => {
                tracing::info!(output_id = %self.output_id, "no saved layout");
                return Ok(LoadOutcome::NothingSaved);
            }
            Err(e) => return Err(service_error("load the saved layout")(e)),
        };
        let doc = from_transport_payload(&payload);
        tracing::info!(output_id = %self.output_id, elements = doc.elements.len(), "layout loaded");
        Ok(LoadOutcome::Loaded(self.engine.load_document(doc)))
    }
}

/// Clear column bindings that `sheet` does not have.
fn retain_sheet_columns(bindings: &mut DocumentBindings, sheet: &SheetInfo) {
    let has = |column: &str| sheet.columns.iter().any(|c| c == column);
    if !has(&bindings.title_column) {
        bindings.title_column.clear();
    }
    if !has(&bindings.match_column) {
        bindings.match_column.clear();
    }
    if bindings.description_column.as_deref().is_some_and(|c| !has(c)) {
        bindings.description_column = None;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
