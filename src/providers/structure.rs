//! Structural-summary provider
//!
//! Wraps the summarizer's rendering of the current document for languages
//! it supports; contributes nothing otherwise.

use crate::domain::{ContextSnippet, FidelityMode};
use crate::editor::CompletionRequest;
use crate::providers::ContextProvider;
use crate::summary::{SourceLanguage, Summarizer};
use async_trait::async_trait;

pub const STRUCTURE_PRIORITY: i32 = 70;

pub struct StructureProvider {
    summarizer: Summarizer,
}

impl StructureProvider {
    pub fn new(mode: FidelityMode, privacy_prefix: String) -> Self {
        Self { summarizer: Summarizer::new(mode, privacy_prefix) }
    }
}

#[async_trait]
impl ContextProvider for StructureProvider {
    fn name(&self) -> &'static str {
        "structure"
    }

    async fn provide(&self, request: &CompletionRequest) -> Vec<ContextSnippet> {
        let document = &request.document;
        let language = SourceLanguage::from_language_id(&document.language_id)
            .or_else(|| SourceLanguage::from_path(&document.path));
        let Some(language) = language else {
            return Vec::new();
        };

        let summary = self.summarizer.summarize_as(&document.path, &document.text, language);
        vec![ContextSnippet::new(
            format!("Structure of the current file and its imports:\n{summary}"),
            STRUCTURE_PRIORITY,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::DocumentSnapshot;
    use std::path::PathBuf;

    fn request(language_id: &str, path: &str, text: &str) -> CompletionRequest {
        CompletionRequest {
            document: DocumentSnapshot {
                uri: format!("file://{path}"),
                language_id: language_id.to_string(),
                path: PathBuf::from(path),
                text: text.to_string(),
            },
            cursor: 0,
            open_files: Vec::new(),
            workspace_root: None,
        }
    }

    #[tokio::test]
    async fn supported_language_gets_summary_snippet() {
        let provider = StructureProvider::new(FidelityMode::Full, "_".to_string());
        let snippets = provider
            .provide(&request("typescript", "/tmp/x.ts", "function f(): number {\n  return 2;\n}\n"))
            .await;
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].content.contains("function f(): number"));
        assert_eq!(snippets[0].priority, STRUCTURE_PRIORITY);
    }

    #[tokio::test]
    async fn unsupported_language_contributes_nothing() {
        let provider = StructureProvider::new(FidelityMode::Full, "_".to_string());
        let snippets = provider.provide(&request("markdown", "/tmp/x.md", "# heading\n")).await;
        assert!(snippets.is_empty());
    }
}
