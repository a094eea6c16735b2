//! Context providers
//!
//! Each provider exposes one capability: given a completion request, produce
//! a finite list of prioritized snippets. Providers are independent, absorb
//! their own failures (empty output), and are registered in a fixed scan
//! order; adding one means adding a variant and appending it to the list.

pub mod open_files;
pub mod structure;
pub mod vcs_diff;
pub mod window;

pub use open_files::OpenFilesProvider;
pub use structure::StructureProvider;
pub use vcs_diff::VcsDiffProvider;
pub use window::WindowProvider;

use crate::config::EngineConfig;
use crate::domain::ContextSnippet;
use crate::editor::CompletionRequest;
use async_trait::async_trait;

#[async_trait]
pub trait ContextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn provide(&self, request: &CompletionRequest) -> Vec<ContextSnippet>;
}

/// Build the standard provider list in scan order. The window provider is
/// always present; the rest follow the config toggles.
pub fn default_providers(config: &EngineConfig) -> Vec<Box<dyn ContextProvider>> {
    let mut providers: Vec<Box<dyn ContextProvider>> =
        vec![Box::new(WindowProvider::new(config.window_chars))];
    if config.enable_open_files {
        providers.push(Box::new(OpenFilesProvider::new(config.open_file_chars)));
    }
    if config.enable_vcs_diff {
        providers.push(Box::new(VcsDiffProvider::new()));
    }
    if config.enable_structure {
        providers.push(Box::new(StructureProvider::new(
            config.fidelity_mode,
            config.privacy_prefix.clone(),
        )));
    }
    providers
}
