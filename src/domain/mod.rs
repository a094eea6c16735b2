//! Core data types shared across the engine

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One prioritized unit of contextual text contributed by a provider.
///
/// Higher priority sorts earlier in the merged prompt context. Content is
/// self-delimited: the reserved prefix/suffix markers can be detected by
/// substring match and stripped back to the identical wrapped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnippet {
    pub content: String,
    pub priority: i32,
}

impl ContextSnippet {
    pub fn new(content: impl Into<String>, priority: i32) -> Self {
        Self { content: content.into(), priority }
    }

    pub fn is_prefix(&self) -> bool {
        self.content.contains(PREFIX_OPEN)
    }

    pub fn is_suffix(&self) -> bool {
        self.content.contains(SUFFIX_OPEN)
    }
}

/// Reserved marker wrapping the mandatory cursor-prefix snippet.
pub const PREFIX_OPEN: &str = "<|prefix|>";
pub const PREFIX_CLOSE: &str = "<|/prefix|>";

/// Reserved marker wrapping the cursor-suffix snippet.
pub const SUFFIX_OPEN: &str = "<|suffix|>";
pub const SUFFIX_CLOSE: &str = "<|/suffix|>";

pub fn wrap_prefix(text: &str) -> String {
    format!("{PREFIX_OPEN}{text}{PREFIX_CLOSE}")
}

pub fn wrap_suffix(text: &str) -> String {
    format!("{SUFFIX_OPEN}{text}{SUFFIX_CLOSE}")
}

/// Strip the prefix markers, returning the exact original wrapped text.
/// Returns `None` when the content is not a prefix-marked snippet.
pub fn unwrap_prefix(content: &str) -> Option<&str> {
    content.strip_prefix(PREFIX_OPEN)?.strip_suffix(PREFIX_CLOSE)
}

pub fn unwrap_suffix(content: &str) -> Option<&str> {
    content.strip_prefix(SUFFIX_OPEN)?.strip_suffix(SUFFIX_CLOSE)
}

/// Pruning policy controlling how much declaration detail a structural
/// summary retains for imported modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum FidelityMode {
    /// Keep only declarations matching the names imported at the call site,
    /// recursively.
    Pruned,
    /// Keep declarations whose identifier does not look private.
    #[default]
    Intelligent,
    /// Keep everything, unpruned, at every level.
    Full,
}

/// Model family tag selecting the prompt template and stop behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// `<fim_prefix>`-style fill-in-the-middle tokens.
    #[default]
    Starcoder,
    /// ` <PRE>`/`<SUF>`/`<MID>` fill-in-the-middle tokens.
    Codellama,
    /// `<｜fim▁begin｜>`-style fill-in-the-middle tokens.
    Deepseek,
    /// Instruction-following backend fed an XML-tagged file-context block.
    Instruct,
    /// Few-shot hole-filler prompt ending in an open completion tag.
    Holefiller,
}

impl ModelType {
    /// Stop sequence the backend should be told to honor, when the template
    /// relies on one.
    pub fn stop_token(self) -> Option<&'static str> {
        match self {
            ModelType::Holefiller => Some("</COMPLETION>"),
            _ => None,
        }
    }
}
