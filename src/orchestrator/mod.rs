//! Completion orchestrator
//!
//! Drives one trigger event through the pipeline: pre-trigger filter,
//! per-line cache, debounce, prompt build, backend call, post-processing.
//! The observable contract is always a suggestion or `None`, never an
//! error. Each keystroke re-triggers the whole pipeline, which is the only
//! retry mechanism.

pub mod cache;
pub mod postprocess;

pub use cache::{CacheEntry, CompletionCache};
pub use postprocess::{filter_typed_prefix, DefaultCleaner, ResponseCleaner};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::domain::ModelType;
use crate::editor::{
    BackendError, CompletionBackend, CompletionRequest, LogNotifier, TriggerFilter, UserNotifier,
    WordBoundaryFilter,
};
use crate::prompt::build_prompt;
use crate::providers::{default_providers, ContextProvider};

pub struct CompletionOrchestrator {
    providers: Vec<Box<dyn ContextProvider>>,
    backend: Arc<dyn CompletionBackend>,
    trigger_filter: Box<dyn TriggerFilter>,
    cleaner: Box<dyn ResponseCleaner>,
    notifier: Box<dyn UserNotifier>,
    cache: CompletionCache,
    model: ModelType,
    debounce: Duration,
    /// Guard for the armed debounce timer; arming a new one always cancels
    /// the previous, so at most one trigger survives a burst.
    pending: Mutex<Option<CancellationToken>>,
    /// Configuration problems are reported to the user once, not per
    /// keystroke.
    config_error_notified: AtomicBool,
}

impl CompletionOrchestrator {
    pub fn new(config: &EngineConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            providers: default_providers(config),
            backend,
            trigger_filter: Box::new(WordBoundaryFilter),
            cleaner: Box::new(DefaultCleaner),
            notifier: Box::new(LogNotifier),
            cache: CompletionCache::new(),
            model: config.model_type,
            debounce: Duration::from_millis(config.debounce_ms),
            pending: Mutex::new(None),
            config_error_notified: AtomicBool::new(false),
        }
    }

    pub fn with_providers(mut self, providers: Vec<Box<dyn ContextProvider>>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_trigger_filter(mut self, filter: Box<dyn TriggerFilter>) -> Self {
        self.trigger_filter = filter;
        self
    }

    pub fn with_cleaner(mut self, cleaner: Box<dyn ResponseCleaner>) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn UserNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run one trigger through the pipeline. `cancel` is the caller's
    /// cancellation signal; it is checked at timer entry, after the prompt
    /// build, and after the backend returns. It never aborts an in-flight
    /// backend call, only discards its result.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Option<String> {
        if !self.trigger_filter.should_trigger(request) {
            debug!("trigger suppressed");
            self.cache.invalidate();
            return None;
        }

        let uri = request.document.uri.clone();
        let line = request.cursor_line();
        let typed_prefix = request.typed_line_prefix().to_string();

        if let Some(tail) = self.cache.lookup(&uri, line, &typed_prefix) {
            debug!(line, "completion cache hit");
            return Some(tail);
        }

        // Debounce: arm a fresh guard, disarming any previous timer.
        let guard = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(guard.clone()) {
            previous.cancel();
        }

        tokio::select! {
            _ = tokio::time::sleep(self.debounce) => {}
            _ = guard.cancelled() => {
                debug!("superseded by a newer trigger");
                self.cache.invalidate();
                return None;
            }
            _ = cancel.cancelled() => {
                self.cache.invalidate();
                return None;
            }
        }

        let prompt = match build_prompt(&self.providers, request, self.model).await {
            Ok(prompt) => prompt,
            Err(e) => {
                // A build failure is "no suggestion"; other lines' cached
                // completions stay valid.
                debug!(error = %e, "prompt build failed");
                return None;
            }
        };
        if cancel.is_cancelled() {
            self.cache.invalidate();
            return None;
        }

        let raw = match self.backend.complete(&prompt, self.model).await {
            Ok(raw) => raw,
            Err(e) => {
                if matches!(e, BackendError::Configuration(_))
                    && !self.config_error_notified.swap(true, Ordering::SeqCst)
                {
                    self.notifier.notify(&format!("Code completion is not configured: {e}"));
                }
                error!(error = %e, "completion backend failed");
                self.cache.invalidate();
                return None;
            }
        };
        if cancel.is_cancelled() {
            self.cache.invalidate();
            return None;
        }

        let cleaned = self.cleaner.clean(&raw, self.model);
        match filter_typed_prefix(&cleaned, &typed_prefix) {
            Some(suggestion) => {
                self.cache.store(CacheEntry {
                    uri,
                    line,
                    full_line_text: format!("{typed_prefix}{suggestion}"),
                });
                Some(suggestion)
            }
            None => {
                debug!("empty suggestion after filtering");
                self.cache.invalidate();
                None
            }
        }
    }
}
