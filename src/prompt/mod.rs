//! Prompt aggregation
//!
//! Runs every provider concurrently, merges their snippets into one
//! deterministic order, isolates the mandatory prefix snippet, and renders
//! the model-family template.

pub mod template;

pub use template::{render_prompt, PromptArgs};

use std::cmp::Reverse;

use futures::future::join_all;
use thiserror::Error;

use crate::domain::{unwrap_prefix, ContextSnippet, ModelType};
use crate::editor::CompletionRequest;
use crate::providers::ContextProvider;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Provider-contract violation: the window provider must always supply
    /// a prefix-marked snippet.
    #[error("no provider supplied the mandatory prefix snippet")]
    MissingPrefix,
}

/// Gather snippets from all providers and render the prompt for `model`.
///
/// Providers run concurrently and are jointly awaited; merge order depends
/// only on priority and provider scan order, never on completion timing.
pub async fn build_prompt(
    providers: &[Box<dyn ContextProvider>],
    request: &CompletionRequest,
    model: ModelType,
) -> Result<String, PromptError> {
    let results = join_all(providers.iter().map(|p| p.provide(request))).await;
    let mut snippets: Vec<ContextSnippet> = results.into_iter().flatten().collect();
    tracing::debug!(count = snippets.len(), "collected context snippets");

    merge_and_render(&mut snippets, request, model)
}

/// Deterministic merge + render over already-collected snippets.
fn merge_and_render(
    snippets: &mut Vec<ContextSnippet>,
    request: &CompletionRequest,
    model: ModelType,
) -> Result<String, PromptError> {
    // Stable sort: ties keep provider scan order.
    snippets.sort_by_key(|s| Reverse(s.priority));

    let prefix = snippets
        .iter()
        .find_map(|s| unwrap_prefix(&s.content))
        .ok_or(PromptError::MissingPrefix)?
        .to_string();

    let high_level_context = high_level_context(snippets);

    let file_name = request
        .document
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&request.document.uri);

    Ok(render_prompt(&PromptArgs {
        prefix: &prefix,
        suffix: "",
        high_level_context: &high_level_context,
        model,
        language_id: &request.document.language_id,
        file_name,
    }))
}

/// Concatenation of every snippet except those exposing the prefix or
/// suffix markers, in sorted order, blank-line separated.
fn high_level_context(snippets: &[ContextSnippet]) -> String {
    snippets
        .iter()
        .filter(|s| !s.is_prefix() && !s.is_suffix())
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
