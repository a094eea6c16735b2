//! Per-line completion cache
//!
//! Remembers the last accepted suggestion for one document line. A later
//! keystroke whose typed prefix still prefixes the cached full line is
//! served the remaining tail without a backend call.

use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub uri: String,
    pub line: usize,
    /// Typed prefix concatenated with the accepted suggestion.
    pub full_line_text: String,
}

#[derive(Default)]
pub struct CompletionCache {
    entry: Mutex<Option<CacheEntry>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the cached tail for (`uri`, `line`) when `typed_prefix` still
    /// prefixes the cached line and the tail is non-empty. A same-line
    /// request that diverged from the cached text drops the stale entry;
    /// requests for other lines or documents leave it alone.
    pub fn lookup(&self, uri: &str, line: usize, typed_prefix: &str) -> Option<String> {
        let mut slot = self.entry.lock();
        let Some(entry) = slot.as_ref() else { return None };
        if entry.uri != uri || entry.line != line {
            return None;
        }
        if let Some(tail) = entry.full_line_text.strip_prefix(typed_prefix) {
            if !tail.is_empty() {
                return Some(tail.to_string());
            }
        }
        *slot = None;
        None
    }

    pub fn store(&self, entry: CacheEntry) {
        *self.entry.lock() = Some(entry);
    }

    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }
}
