//! Sibling open-files provider
//!
//! One bounded snippet per other open file, labeled with its path.
//! Unreadable files are skipped without failing the call.

use crate::domain::ContextSnippet;
use crate::editor::CompletionRequest;
use crate::providers::ContextProvider;
use async_trait::async_trait;

pub const OPEN_FILES_PRIORITY: i32 = 50;

pub struct OpenFilesProvider {
    snippet_chars: usize,
}

impl OpenFilesProvider {
    pub fn new(snippet_chars: usize) -> Self {
        Self { snippet_chars }
    }
}

#[async_trait]
impl ContextProvider for OpenFilesProvider {
    fn name(&self) -> &'static str {
        "open-files"
    }

    async fn provide(&self, request: &CompletionRequest) -> Vec<ContextSnippet> {
        let mut snippets = Vec::new();
        for path in &request.open_files {
            if *path == request.document.path {
                continue;
            }
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping unreadable open file");
                    continue;
                }
            };
            let content = String::from_utf8_lossy(&bytes);
            let bounded: String = content.chars().take(self.snippet_chars).collect();
            snippets.push(ContextSnippet::new(
                format!("File: {}\n{}", path.display(), bounded),
                OPEN_FILES_PRIORITY,
            ));
        }
        snippets
    }
}
