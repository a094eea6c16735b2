//! Import specifier resolution
//!
//! JS/TS: relative specifiers (`./`, `../`) are probed as `spec + ext` for
//! each supported extension, then `spec/index + ext`; the first existing
//! path wins. Python: `from m.n import x` probes `m/n.py` relative to the
//! importing file's directory. Anything else stays unexpanded.

use std::path::{Path, PathBuf};

use crate::summary::SourceLanguage;

/// Extensions probed for JS/TS relative imports, in priority order.
const JS_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// Resolve `specifier` against the importing file's directory. `None` means
/// the import is not locally resolvable; callers skip it silently.
pub fn resolve_import(
    base_dir: &Path,
    specifier: &str,
    language: SourceLanguage,
) -> Option<PathBuf> {
    if language.is_python() {
        resolve_python(base_dir, specifier)
    } else {
        resolve_relative_js(base_dir, specifier)
    }
}

fn resolve_relative_js(base_dir: &Path, specifier: &str) -> Option<PathBuf> {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return None;
    }

    for ext in JS_EXTENSIONS {
        let candidate = base_dir.join(format!("{specifier}{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    for ext in JS_EXTENSIONS {
        let candidate = base_dir.join(specifier).join(format!("index{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

fn resolve_python(base_dir: &Path, module: &str) -> Option<PathBuf> {
    // `from .mod import x` arrives as ".mod"; the leading dots just anchor
    // the lookup at the importing file's directory, which is where this
    // resolver starts anyway.
    let trimmed = module.trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }

    let relative: PathBuf = trimmed.split('.').collect();
    let candidate = base_dir.join(relative).with_extension("py");
    candidate.is_file().then_some(candidate)
}
