//! Response cleanup and suggestion filtering
//!
//! Cleanup strips model-specific wrapper tags, markdown fences, and
//! conversational preambles from the raw backend text. The suggestion
//! filter then removes whatever the user already typed on the current line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ModelType;

/// Tokens that terminate a completion; everything from the first occurrence
/// onward is dropped.
const END_TOKENS: &[&str] = &[
    "</COMPLETION>",
    "<EOT>",
    "<|endoftext|>",
    "<fim_prefix>",
    "<fim_suffix>",
    "<｜fim▁begin｜>",
    "<｜end▁of▁sentence｜>",
];

/// Leading wrapper tokens some backends echo back.
const LEAD_TOKENS: &[&str] = &["<COMPLETION>", "<fim_middle>", "<MID>", " <MID>"];

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_+-]*\r?\n(.*?)\r?\n?```\s*$").expect("fence regex"));

static CHATTY_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(here|sure|certainly|okay|of course)\b[^\n]*:\s*$").expect("opener regex"));

/// Strips transport/framing noise from a raw backend response.
pub trait ResponseCleaner: Send + Sync {
    fn clean(&self, raw: &str, model: ModelType) -> String;
}

pub struct DefaultCleaner;

impl ResponseCleaner for DefaultCleaner {
    fn clean(&self, raw: &str, _model: ModelType) -> String {
        let mut text = raw;

        for token in LEAD_TOKENS {
            if let Some(stripped) = text.strip_prefix(token) {
                text = stripped;
            }
        }
        if let Some(cut) = END_TOKENS.iter().filter_map(|t| text.find(t)).min() {
            text = &text[..cut];
        }

        let trimmed = text.trim();
        if let Some(captures) = FENCED_BLOCK.captures(trimmed) {
            return captures[1].to_string();
        }

        // Drop a conversational opener line like "Here is the completion:".
        if let Some((first, rest)) = text.split_once('\n') {
            if CHATTY_OPENER.is_match(first.trim()) {
                return rest.to_string();
            }
        }

        text.to_string()
    }
}

/// Strip the portion of `suggestion` duplicating what the user already
/// typed on the current line. Returns `None` when nothing useful remains.
pub fn filter_typed_prefix(suggestion: &str, typed_prefix: &str) -> Option<String> {
    let remainder = if typed_prefix.trim().is_empty() {
        suggestion
    } else if let Some(idx) = suggestion.find(typed_prefix) {
        &suggestion[idx + typed_prefix.len()..]
    } else {
        // The model completed from the cursor instead of re-typing the line.
        suggestion
    };

    if remainder.trim().is_empty() {
        None
    } else {
        Some(remainder.to_string())
    }
}
