//! Deterministic text rendering of parsed structures
//!
//! Output order is fixed: module heading, raw imports, variables,
//! functions, classes, then a recursive "Imported files content" block for
//! every resolved import in declaration order (deduplicated by resolved
//! path). Same structure and mode always render byte-identical text.

use std::collections::HashSet;

use crate::domain::FidelityMode;
use crate::summary::prune::{filter_for_import, ViewFilter};
use crate::summary::{ParsedClass, ParsedFunction, ParsedStructure};

const INDENT: &str = "    ";

pub fn render_structure(
    structure: &ParsedStructure,
    mode: FidelityMode,
    privacy_prefix: &str,
    filter: &ViewFilter<'_>,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let marker = structure.language.comment_marker();

    lines.push(structure.module_name.clone());
    lines.push("=".repeat(structure.module_name.len()));

    if !structure.imports.is_empty() {
        for import in &structure.imports {
            lines.push(import.raw.clone());
        }
        lines.push(String::new());
    }

    let variables: Vec<_> =
        structure.variables.iter().filter(|v| filter.keeps(&v.name)).collect();
    if !variables.is_empty() {
        for variable in variables {
            lines.push(variable.text.clone());
        }
        lines.push(String::new());
    }

    for function in structure.functions.iter().filter(|f| filter.keeps(&f.name)) {
        render_function(function, marker, "", &mut lines);
        lines.push(String::new());
    }

    for class in structure.classes.iter().filter(|c| filter.keeps(&c.name)) {
        render_class(class, marker, &mut lines);
        lines.push(String::new());
    }

    let imported = render_imported_files(structure, mode, privacy_prefix);
    if !imported.is_empty() {
        lines.push("Imported files content".to_string());
        lines.push("======================".to_string());
        lines.extend(imported);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

fn render_imported_files(
    structure: &ParsedStructure,
    mode: FidelityMode,
    privacy_prefix: &str,
) -> Vec<String> {
    let mut rendered = Vec::new();
    let mut seen = HashSet::new();

    for import in &structure.imports {
        let (Some(path), Some(child)) = (&import.resolved_path, &import.resolved) else {
            continue;
        };
        if !seen.insert(path.clone()) {
            continue;
        }
        let child_filter = filter_for_import(mode, privacy_prefix, import);
        rendered.push(render_structure(child, mode, privacy_prefix, &child_filter));
        rendered.push(String::new());
    }

    rendered
}

fn push_indented(text: &str, indent: &str, lines: &mut Vec<String>) {
    for line in text.lines() {
        lines.push(format!("{indent}{line}"));
    }
}

fn render_function(function: &ParsedFunction, marker: &str, indent: &str, lines: &mut Vec<String>) {
    push_indented(&function.signature, indent, lines);
    if let Some(doc) = &function.doc {
        push_indented(doc, &format!("{indent}{INDENT}"), lines);
    }
    lines.push(format!("{indent}{INDENT}{marker} some code lines"));
    if let Some(last_return) = &function.last_return {
        lines.push(format!("{indent}{INDENT}{last_return}"));
    }
}

fn render_class(class: &ParsedClass, marker: &str, lines: &mut Vec<String>) {
    push_indented(&class.signature, "", lines);
    if let Some(doc) = &class.doc {
        push_indented(doc, INDENT, lines);
    }
    for property in &class.properties {
        push_indented(property, INDENT, lines);
    }
    if let Some(ctor) = &class.constructor {
        push_indented(&ctor.signature, INDENT, lines);
        if let Some(doc) = &ctor.doc {
            push_indented(doc, &format!("{INDENT}{INDENT}"), lines);
        }
        for assignment in &ctor.assignments {
            lines.push(format!("{INDENT}{INDENT}{assignment}"));
        }
        lines.push(format!("{INDENT}{INDENT}{marker} initialization"));
    }
    for method in &class.methods {
        render_function(method, marker, INDENT, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::parser::parse_source;
    use crate::summary::SourceLanguage;

    fn render_ts(source: &str) -> String {
        let structure =
            parse_source(SourceLanguage::TypeScript, "mod.ts".to_string(), source).expect("parse");
        render_structure(&structure, FidelityMode::Full, "_", &ViewFilter::All)
    }

    #[test]
    fn heading_is_underlined_to_name_length() {
        let out = render_ts("const a = 1;\n");
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("mod.ts"));
        assert_eq!(lines.next(), Some("======"));
    }

    #[test]
    fn function_renders_signature_placeholder_and_return() {
        let out = render_ts("/** Doubles. */\nfunction twice(n: number): number {\n  const k = 2;\n  return n * k;\n}\n");
        let expected = "\
mod.ts
======
function twice(n: number): number
    /** Doubles. */
    // some code lines
    return n * k;";
        similar_asserts::assert_eq!(out, expected);
    }

    #[test]
    fn class_renders_properties_constructor_and_methods() {
        let out = render_ts(
            "class Timer {\n  delay = 300;\n  constructor(clock: Clock) {\n    this.clock = clock;\n  }\n  remaining(): number {\n    return this.delay;\n  }\n}\n",
        );
        let expected = "\
mod.ts
======
class Timer
    delay = 300;
    constructor(clock: Clock)
        this.clock = clock;
        // initialization
    remaining(): number
        // some code lines
        return this.delay;";
        similar_asserts::assert_eq!(out, expected);
    }

    #[test]
    fn python_placeholder_uses_hash_marker() {
        let structure = parse_source(
            SourceLanguage::Python,
            "mod.py".to_string(),
            "def go():\n    return 1\n",
        )
        .expect("parse");
        let out = render_structure(&structure, FidelityMode::Full, "_", &ViewFilter::All);
        assert!(out.contains("# some code lines"));
        assert!(!out.contains("//"));
    }

    #[test]
    fn sections_appear_in_declaration_order() {
        let out = render_ts(
            "import { x } from \"./x\";\nconst first = 1;\nfunction mid(): void {\n}\nclass Last {\n}\n",
        );
        let import_pos = out.find("import { x }").expect("import");
        let var_pos = out.find("const first").expect("var");
        let fn_pos = out.find("function mid").expect("fn");
        let class_pos = out.find("class Last").expect("class");
        assert!(import_pos < var_pos && var_pos < fn_pos && fn_pos < class_pos);
    }
}
