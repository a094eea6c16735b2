//! Engine configuration
//!
//! Values the core consumes (fidelity mode, model type, debounce delay,
//! window sizes, provider toggles), loadable from a TOML or YAML file.

pub mod loader;

pub use loader::load_config;

use crate::domain::{FidelityMode, ModelType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pruning policy for imported-module summaries.
    pub fidelity_mode: FidelityMode,
    /// Prompt template family and backend stop behavior.
    pub model_type: ModelType,
    /// Debounce delay between a trigger burst and the backend call.
    pub debounce_ms: u64,
    /// Characters of document text taken on each side of the cursor.
    pub window_chars: usize,
    /// Characters taken from each other open file.
    pub open_file_chars: usize,
    /// Identifier prefix treated as private by `intelligent` pruning.
    pub privacy_prefix: String,
    pub enable_open_files: bool,
    pub enable_vcs_diff: bool,
    pub enable_structure: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fidelity_mode: FidelityMode::Intelligent,
            model_type: ModelType::Starcoder,
            debounce_ms: 300,
            window_chars: 2000,
            open_file_chars: 1000,
            privacy_prefix: "_".to_string(),
            enable_open_files: true,
            enable_vcs_diff: true,
            enable_structure: true,
        }
    }
}
