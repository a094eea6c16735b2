//! Seams toward the host editor and the completion backend
//!
//! The engine never talks to an editor or a network directly. It receives an
//! owned [`DocumentSnapshot`] plus cursor offset, and reaches the outside
//! world only through the traits defined here.

use crate::domain::ModelType;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Read-only snapshot of the document being completed.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// Stable identity of the document (editor URI).
    pub uri: String,
    /// Editor language identifier, e.g. `typescript` or `python`.
    pub language_id: String,
    /// Filesystem path backing the document, used for import resolution.
    pub path: PathBuf,
    /// Full document text at trigger time.
    pub text: String,
}

/// Everything one completion trigger carries into the pipeline.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub document: DocumentSnapshot,
    /// Byte offset of the cursor into `document.text`.
    pub cursor: usize,
    /// Paths of the other files currently open in the editor.
    pub open_files: Vec<PathBuf>,
    /// Workspace root for VCS queries, when known.
    pub workspace_root: Option<PathBuf>,
}

impl CompletionRequest {
    /// Clamp the cursor to a char boundary inside the document text.
    pub fn cursor_clamped(&self) -> usize {
        let text = &self.document.text;
        let mut offset = self.cursor.min(text.len());
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Zero-based line number of the cursor.
    pub fn cursor_line(&self) -> usize {
        let offset = self.cursor_clamped();
        self.document.text[..offset].matches('\n').count()
    }

    /// Text on the cursor's line strictly before the cursor.
    pub fn typed_line_prefix(&self) -> &str {
        let offset = self.cursor_clamped();
        let text = &self.document.text;
        let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
        &text[start..offset]
    }

    /// Character directly at the cursor, if any.
    pub fn char_at_cursor(&self) -> Option<char> {
        self.document.text[self.cursor_clamped()..].chars().next()
    }
}

/// Decides whether a trigger event should start the pipeline at all.
pub trait TriggerFilter: Send + Sync {
    fn should_trigger(&self, request: &CompletionRequest) -> bool;
}

/// Default heuristic: never complete mid-word. A word character directly at
/// the cursor means the user is still typing an identifier.
pub struct WordBoundaryFilter;

impl TriggerFilter for WordBoundaryFilter {
    fn should_trigger(&self, request: &CompletionRequest) -> bool {
        match request.char_at_cursor() {
            Some(c) => !(c.is_alphanumeric() || c == '_'),
            None => true,
        }
    }
}

/// Failures a completion backend may surface.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend transport failed: {0}")]
    Transport(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    /// Missing credentials or model name. Requires user action, so the
    /// orchestrator reports it once as a user-visible notice.
    #[error("completion backend is not configured: {0}")]
    Configuration(String),
}

/// A completion backend accepts one prompt string and a model-type tag and
/// asynchronously returns raw text. Transport and credentials are its own
/// concern.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, model: ModelType) -> Result<String, BackendError>;
}

/// Channel for the rare user-facing notice (configuration problems).
pub trait UserNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default notifier: logs at error level.
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::error!("{message}");
    }
}
