//! Structural source-code summarizer
//!
//! Parses a source file into its declarations (imports, top-level variables,
//! functions, classes), recursively resolves and summarizes locally-imported
//! modules, and renders a deterministic, LLM-readable text summary. A
//! fidelity mode controls how much declaration detail imported modules
//! retain; the file itself always renders unpruned.

pub mod parser;
pub mod prune;
pub mod render;
pub mod resolve;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::FidelityMode;
use prune::ViewFilter;

/// Languages the summarizer can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "javascript" | "javascriptreact" => Some(Self::JavaScript),
            "typescript" => Some(Self::TypeScript),
            "typescriptreact" => Some(Self::Tsx),
            "python" => Some(Self::Python),
            _ => None,
        }
    }

    /// Line-comment marker used for placeholder body comments.
    pub fn comment_marker(self) -> &'static str {
        match self {
            Self::Python => "#",
            _ => "//",
        }
    }

    pub fn is_python(self) -> bool {
        matches!(self, Self::Python)
    }
}

/// One top-level variable declaration.
#[derive(Debug, Clone)]
pub struct ParsedVariable {
    pub name: String,
    pub text: String,
}

/// One function declaration, reduced to what the renderer needs.
#[derive(Debug, Clone)]
pub struct ParsedFunction {
    pub name: String,
    /// Declaration text up to the body's opening brace (or the `def` header).
    pub signature: String,
    pub doc: Option<String>,
    /// Last return statement at the function's own nesting level.
    pub last_return: Option<String>,
}

/// A class constructor: signature plus direct self-assignments.
#[derive(Debug, Clone)]
pub struct ParsedConstructor {
    pub signature: String,
    pub doc: Option<String>,
    pub assignments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedClass {
    pub name: String,
    pub signature: String,
    pub doc: Option<String>,
    pub properties: Vec<String>,
    pub constructor: Option<ParsedConstructor>,
    pub methods: Vec<ParsedFunction>,
}

/// One import declaration, optionally expanded into the structure of the
/// module it resolves to. Resolved children are shared immutably: the parse
/// cache may hand the same child to several importers.
#[derive(Debug, Clone)]
pub struct ParsedImport {
    /// Raw import statement text.
    pub raw: String,
    /// Module specifier, when one could be extracted.
    pub specifier: Option<String>,
    /// Names imported at this call site, when statically known.
    pub bindings: Option<BTreeSet<String>>,
    pub resolved_path: Option<PathBuf>,
    pub resolved: Option<Arc<ParsedStructure>>,
}

/// Unpruned declaration summary of one source file.
#[derive(Debug, Clone)]
pub struct ParsedStructure {
    pub module_name: String,
    pub language: SourceLanguage,
    pub imports: Vec<ParsedImport>,
    pub variables: Vec<ParsedVariable>,
    pub functions: Vec<ParsedFunction>,
    pub classes: Vec<ParsedClass>,
}

/// Per-call parse state: memoization keyed by canonical absolute path plus
/// the set of paths currently on the recursion stack (explicit cycle break).
/// Created fresh for every top-level summarization, so edits between
/// requests can never serve stale structures.
struct CallState {
    cache: HashMap<PathBuf, Arc<ParsedStructure>>,
    visiting: HashSet<PathBuf>,
}

impl CallState {
    fn new() -> Self {
        Self { cache: HashMap::new(), visiting: HashSet::new() }
    }

    /// Parse `path` into its unpruned structure, recursively expanding
    /// resolvable imports. `content` is supplied for the top-level file
    /// (whose buffer may be dirtier than the file on disk) and read from
    /// disk otherwise. Returns `None` when the file cannot be read or
    /// parsed.
    fn parse(
        &mut self,
        path: PathBuf,
        content: Option<&str>,
        language: SourceLanguage,
    ) -> Option<Arc<ParsedStructure>> {
        if let Some(hit) = self.cache.get(&path) {
            return Some(Arc::clone(hit));
        }

        let owned;
        let source = match content {
            Some(text) => text,
            None => {
                owned = std::fs::read_to_string(&path).ok()?;
                &owned
            }
        };

        let module_name =
            path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string();
        let mut structure = parser::parse_source(language, module_name, source)?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for import in &mut structure.imports {
            let Some(specifier) = &import.specifier else { continue };
            let Some(target) = resolve::resolve_import(&base_dir, specifier, language) else {
                continue;
            };
            let canon = canonical(&target);
            let Some(child_language) = SourceLanguage::from_path(&canon) else { continue };
            if self.visiting.contains(&canon) {
                // Import cycle: leave this edge unexpanded.
                tracing::debug!(path = %canon.display(), "skipping cyclic import");
                continue;
            }
            self.visiting.insert(canon.clone());
            let child = self.parse(canon.clone(), None, child_language);
            self.visiting.remove(&canon);
            if child.is_some() {
                import.resolved_path = Some(canon);
                import.resolved = child;
            }
        }

        let arc = Arc::new(structure);
        self.cache.insert(path, Arc::clone(&arc));
        Some(arc)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Structural summarizer configured with a fidelity mode and the privacy
/// predicate used by `intelligent` pruning.
pub struct Summarizer {
    mode: FidelityMode,
    privacy_prefix: String,
}

impl Summarizer {
    pub fn new(mode: FidelityMode, privacy_prefix: impl Into<String>) -> Self {
        Self { mode, privacy_prefix: privacy_prefix.into() }
    }

    /// Summarize `content` as the current text of the file at `path`.
    ///
    /// Never fails: unsupported or unparsable input degrades to an
    /// explanatory placeholder string.
    pub fn summarize(&self, path: &Path, content: &str) -> String {
        let Some(language) = SourceLanguage::from_path(path) else {
            return format!(
                "Structure summary unavailable: unsupported file type for {}",
                path.display()
            );
        };
        self.summarize_as(path, content, language)
    }

    /// Like [`summarize`](Self::summarize) with an explicit language, for
    /// callers that know the editor language id but not a useful extension.
    pub fn summarize_as(&self, path: &Path, content: &str, language: SourceLanguage) -> String {
        let mut call = CallState::new();
        let top = canonical(path);
        call.visiting.insert(top.clone());
        let Some(structure) = call.parse(top, Some(content), language) else {
            return format!("Structure summary unavailable: could not parse {}", path.display());
        };
        // The top-level file renders unpruned; the mode scopes imported
        // context only.
        render::render_structure(&structure, self.mode, &self.privacy_prefix, &ViewFilter::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }

    const HELPER_TS: &str = "\
export function shared(a: number): number {\n  return a + 1;\n}\n\
export function other(b: number): number {\n  return b - 1;\n}\n\
export function _internal(): void {\n}\n";

    const MAIN_TS: &str = "\
import { shared } from \"./helper\";\n\n\
const limit = 10;\n\n\
function run(x: number): number {\n  return shared(x) * limit;\n}\n";

    #[test]
    fn summary_without_imports_has_no_imported_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = write(tmp.path(), "solo.ts", "function one(): number {\n  return 1;\n}\n");
        let out = Summarizer::new(FidelityMode::Full, "_")
            .summarize(&path, "function one(): number {\n  return 1;\n}\n");
        assert!(out.contains("solo.ts"));
        assert!(out.contains("function one(): number"));
        assert!(!out.contains("Imported files content"));
    }

    #[test]
    fn resolved_import_is_inlined() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.ts", HELPER_TS);
        let main = write(tmp.path(), "main.ts", MAIN_TS);

        let out = Summarizer::new(FidelityMode::Full, "_").summarize(&main, MAIN_TS);
        assert!(out.contains("Imported files content"));
        assert!(out.contains("helper.ts"));
        assert!(out.contains("function shared(a: number): number"));
    }

    #[test]
    fn pruned_mode_keeps_only_consumed_names() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.ts", HELPER_TS);
        let main = write(tmp.path(), "main.ts", MAIN_TS);

        let out = Summarizer::new(FidelityMode::Pruned, "_").summarize(&main, MAIN_TS);
        assert!(out.contains("function shared"));
        assert!(!out.contains("function other"));
        assert!(!out.contains("_internal"));
        // The importing file itself is never pruned.
        assert!(out.contains("function run"));
        assert!(out.contains("const limit = 10;"));
    }

    #[test]
    fn intelligent_mode_drops_privacy_prefixed_names() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.ts", HELPER_TS);
        let main = write(tmp.path(), "main.ts", MAIN_TS);

        let out = Summarizer::new(FidelityMode::Intelligent, "_").summarize(&main, MAIN_TS);
        assert!(out.contains("function shared"));
        assert!(out.contains("function other"));
        assert!(!out.contains("_internal"));
    }

    #[test]
    fn full_output_is_superset_of_other_modes() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.ts", HELPER_TS);
        let main = write(tmp.path(), "main.ts", MAIN_TS);

        let full = Summarizer::new(FidelityMode::Full, "_").summarize(&main, MAIN_TS);
        for name in ["shared", "other", "_internal", "run", "limit"] {
            assert!(full.contains(name), "full output should mention {name}");
        }
    }

    #[test]
    fn summarize_is_idempotent_across_calls() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.ts", HELPER_TS);
        let main = write(tmp.path(), "main.ts", MAIN_TS);

        let summarizer = Summarizer::new(FidelityMode::Intelligent, "_");
        let first = summarizer.summarize(&main, MAIN_TS);
        let second = summarizer.summarize(&main, MAIN_TS);
        similar_asserts::assert_eq!(first, second);
    }

    #[test]
    fn import_cycles_terminate() {
        let tmp = TempDir::new().expect("tmp");
        let a_src = "import { b } from \"./b\";\nexport function a(): number {\n  return 1;\n}\n";
        let b_src = "import { a } from \"./a\";\nexport function b(): number {\n  return 2;\n}\n";
        write(tmp.path(), "b.ts", b_src);
        let a_path = write(tmp.path(), "a.ts", a_src);

        let out = Summarizer::new(FidelityMode::Full, "_").summarize(&a_path, a_src);
        assert!(out.contains("function a(): number"));
        assert!(out.contains("function b(): number"));
    }

    #[test]
    fn unresolvable_import_is_skipped_silently() {
        let tmp = TempDir::new().expect("tmp");
        let src = "import { x } from \"./missing\";\nfunction go(): void {\n}\n";
        let path = write(tmp.path(), "main.ts", src);

        let out = Summarizer::new(FidelityMode::Full, "_").summarize(&path, src);
        assert!(out.contains("import { x } from \"./missing\";"));
        assert!(out.contains("function go(): void"));
        assert!(!out.contains("Imported files content"));
    }

    #[test]
    fn unsupported_language_yields_placeholder() {
        let out = Summarizer::new(FidelityMode::Full, "_")
            .summarize(Path::new("/tmp/data.csv"), "a,b,c\n1,2,3\n");
        assert!(out.contains("unsupported file type"));
    }

    #[test]
    fn shared_import_is_parsed_once_and_rendered_for_each_importer() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "shared.ts", "export const common = 1;\n");
        write(
            tmp.path(),
            "left.ts",
            "import { common } from \"./shared\";\nexport function left(): number {\n  return common;\n}\n",
        );
        let main_src = "import { left } from \"./left\";\nimport { common } from \"./shared\";\nfunction top(): number {\n  return left() + common;\n}\n";
        let main = write(tmp.path(), "main.ts", main_src);

        let out = Summarizer::new(FidelityMode::Full, "_").summarize(&main, main_src);
        assert!(out.contains("left.ts"));
        assert!(out.contains("shared.ts"));
        assert!(out.contains("const common = 1;"));
    }

    #[test]
    fn python_imports_resolve_like_the_python_engine() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "helper.py", "def shared(a):\n    return a + 1\n\ndef other(b):\n    return b\n");
        let src = "from helper import shared\n\ndef run(x):\n    return shared(x)\n";
        let main = write(tmp.path(), "main.py", src);

        let out = Summarizer::new(FidelityMode::Pruned, "_").summarize(&main, src);
        assert!(out.contains("helper.py"));
        assert!(out.contains("def shared(a):"));
        assert!(!out.contains("def other"));
    }
}
