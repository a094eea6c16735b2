//! Fidelity-mode pruning
//!
//! Pruning is a view applied while rendering, never baked into the cached
//! structure: the same unpruned parse can serve a `pruned` render at one
//! import site and a `full` render at another.

use std::collections::BTreeSet;

use crate::domain::FidelityMode;
use crate::summary::ParsedImport;

/// Which declarations of a structure a render keeps.
#[derive(Debug, Clone)]
pub enum ViewFilter<'a> {
    /// Keep every declaration (top-level file, `full` mode).
    All,
    /// Keep declarations whose name does not start with the privacy prefix.
    Public { privacy_prefix: &'a str },
    /// Keep only declarations named in the importing call site.
    Names(&'a BTreeSet<String>),
}

impl ViewFilter<'_> {
    pub fn keeps(&self, name: &str) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Public { privacy_prefix } => {
                privacy_prefix.is_empty() || !name.starts_with(privacy_prefix)
            }
            ViewFilter::Names(names) => names.contains(name),
        }
    }
}

/// Filter an imported module's declarations get, given the mode and the
/// import site. `pruned` scopes to the names consumed by the importer;
/// an import with no statically-known bindings falls back to keeping all.
pub fn filter_for_import<'a>(
    mode: FidelityMode,
    privacy_prefix: &'a str,
    import: &'a ParsedImport,
) -> ViewFilter<'a> {
    match mode {
        FidelityMode::Full => ViewFilter::All,
        FidelityMode::Intelligent => ViewFilter::Public { privacy_prefix },
        FidelityMode::Pruned => match &import.bindings {
            Some(names) => ViewFilter::Names(names),
            None => ViewFilter::All,
        },
    }
}
