//! Cursor window provider
//!
//! Emits exactly two snippets: the bounded text before the cursor wrapped in
//! prefix markers, and the bounded text after wrapped in suffix markers. The
//! prefix snippet is mandatory downstream; its absence fails the prompt
//! build.

use crate::domain::{wrap_prefix, wrap_suffix, ContextSnippet};
use crate::editor::CompletionRequest;
use crate::providers::ContextProvider;
use async_trait::async_trait;

pub const WINDOW_PRIORITY: i32 = 100;

pub struct WindowProvider {
    window_chars: usize,
}

impl WindowProvider {
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars }
    }
}

#[async_trait]
impl ContextProvider for WindowProvider {
    fn name(&self) -> &'static str {
        "window"
    }

    async fn provide(&self, request: &CompletionRequest) -> Vec<ContextSnippet> {
        let text = &request.document.text;
        let cursor = request.cursor_clamped();
        let before = tail_chars(&text[..cursor], self.window_chars);
        let after = head_chars(&text[cursor..], self.window_chars);
        vec![
            ContextSnippet::new(wrap_prefix(before), WINDOW_PRIORITY),
            ContextSnippet::new(wrap_suffix(after), WINDOW_PRIORITY),
        ]
    }
}

/// Last `n` characters of `s`, on char boundaries.
fn tail_chars(s: &str, n: usize) -> &str {
    let len = s.chars().count();
    if len <= n {
        return s;
    }
    s.char_indices().nth(len - n).map_or(s, |(i, _)| &s[i..])
}

/// First `n` characters of `s`, on char boundaries.
fn head_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(i, _)| &s[..i])
}
