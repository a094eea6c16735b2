//! Declaration extraction via tree-sitter
//!
//! Walks a file's top-level statements and classifies them into imports,
//! variables, functions, and classes. Anything else (expressions, TS
//! interfaces, type aliases) is ignored.

use std::collections::BTreeSet;

use tree_sitter::{Language, Node, Parser};

use crate::summary::{
    ParsedClass, ParsedConstructor, ParsedFunction, ParsedImport, ParsedStructure, ParsedVariable,
    SourceLanguage,
};

/// Node kinds the last-return walk must not descend into: a return inside a
/// nested closure is not the enclosing function's return.
const JS_FUNCTION_LIKE: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
    "class_declaration",
    "class",
];

const PY_FUNCTION_LIKE: &[&str] =
    &["function_definition", "class_definition", "decorated_definition", "lambda"];

fn grammar(language: SourceLanguage) -> Language {
    match language {
        SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        SourceLanguage::Python => tree_sitter_python::LANGUAGE.into(),
    }
}

/// Parse `source` into an unpruned structure with unresolved imports.
/// Returns `None` when tree-sitter cannot produce a tree.
pub fn parse_source(
    language: SourceLanguage,
    module_name: String,
    source: &str,
) -> Option<ParsedStructure> {
    let mut parser = Parser::new();
    parser.set_language(&grammar(language)).ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();

    let mut structure = ParsedStructure {
        module_name,
        language,
        imports: Vec::new(),
        variables: Vec::new(),
        functions: Vec::new(),
        classes: Vec::new(),
    };

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if language.is_python() {
            classify_py(child, source, &mut structure);
        } else {
            classify_js(child, child, source, &mut structure);
        }
    }

    Some(structure)
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim_end().to_string()
}

/// Declaration text from the node start up to its body, i.e. everything
/// before the body's opening brace (or the Python block).
fn signature_before(node: Node, body: Option<Node>, source: &str) -> String {
    match body {
        Some(body) => source[node.start_byte()..body.start_byte()].trim_end().to_string(),
        None => first_line(text(node, source)),
    }
}

/// Attached documentation comment: the comment node directly preceding the
/// declaration (or its `export` wrapper).
fn doc_comment(anchor: Node, source: &str) -> Option<String> {
    let prev = anchor.prev_named_sibling()?;
    if prev.kind() == "comment" {
        Some(text(prev, source).trim_end().to_string())
    } else {
        None
    }
}

fn last_return(body: Node, source: &str, barriers: &[&str]) -> Option<String> {
    let mut found = None;
    collect_last_return(body, source, barriers, &mut found);
    found
}

fn collect_last_return(node: Node, source: &str, barriers: &[&str], found: &mut Option<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if barriers.contains(&child.kind()) {
            continue;
        }
        if child.kind() == "return_statement" {
            *found = Some(text(child, source).trim().to_string());
        }
        collect_last_return(child, source, barriers, found);
    }
}

// --- JavaScript / TypeScript ---

/// `node` is the statement to classify; `doc_anchor` is where to look for a
/// preceding doc comment (the `export` wrapper when there is one).
fn classify_js(node: Node, doc_anchor: Node, source: &str, out: &mut ParsedStructure) {
    match node.kind() {
        "import_statement" => out.imports.push(parse_js_import(node, source)),
        "export_statement" => {
            if let Some(declaration) = node.child_by_field_name("declaration") {
                classify_js(declaration, node, source, out);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let stmt_text = first_line(text(node, source));
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    out.variables.push(ParsedVariable {
                        name: text(name, source).to_string(),
                        text: stmt_text.clone(),
                    });
                }
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            out.functions.push(parse_js_function(node, doc_anchor, source));
        }
        "class_declaration" | "abstract_class_declaration" => {
            out.classes.push(parse_js_class(node, doc_anchor, source));
        }
        _ => {}
    }
}

fn parse_js_import(node: Node, source: &str) -> ParsedImport {
    let raw = text(node, source).trim_end().to_string();
    let specifier = node
        .child_by_field_name("source")
        .map(|s| text(s, source).trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string());

    let mut bindings = Some(BTreeSet::new());
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "import_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for part in child.named_children(&mut clause_cursor) {
            match part.kind() {
                // `import * as ns` consumes an unknowable set of names.
                "namespace_import" => bindings = None,
                "identifier" => {
                    if let Some(set) = bindings.as_mut() {
                        set.insert(text(part, source).to_string());
                    }
                }
                "named_imports" => {
                    let mut spec_cursor = part.walk();
                    for spec in part.named_children(&mut spec_cursor) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        // Prune by the exporting module's name, not the
                        // local alias.
                        if let Some(name) = spec.child_by_field_name("name") {
                            if let Some(set) = bindings.as_mut() {
                                set.insert(text(name, source).to_string());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    ParsedImport { raw, specifier, bindings, resolved_path: None, resolved: None }
}

fn parse_js_function(node: Node, doc_anchor: Node, source: &str) -> ParsedFunction {
    let name = node.child_by_field_name("name").map(|n| text(n, source).to_string());
    let body = node.child_by_field_name("body");
    ParsedFunction {
        name: name.unwrap_or_default(),
        signature: signature_before(node, body, source),
        doc: doc_comment(doc_anchor, source),
        last_return: body.and_then(|b| last_return(b, source, JS_FUNCTION_LIKE)),
    }
}

fn parse_js_class(node: Node, doc_anchor: Node, source: &str) -> ParsedClass {
    let name =
        node.child_by_field_name("name").map(|n| text(n, source).to_string()).unwrap_or_default();
    let body = node.child_by_field_name("body");
    let mut class = ParsedClass {
        name,
        signature: signature_before(node, body, source),
        doc: doc_comment(doc_anchor, source),
        properties: Vec::new(),
        constructor: None,
        methods: Vec::new(),
    };

    let Some(body) = body else { return class };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "field_definition" | "public_field_definition" => {
                class.properties.push(text(member, source).trim_end().to_string());
            }
            "method_definition" => {
                let method_name = member
                    .child_by_field_name("name")
                    .map(|n| text(n, source).to_string())
                    .unwrap_or_default();
                if method_name == "constructor" {
                    class.constructor = Some(parse_js_constructor(member, source));
                } else {
                    class.methods.push(parse_js_function(member, member, source));
                }
            }
            _ => {}
        }
    }
    class
}

fn parse_js_constructor(node: Node, source: &str) -> ParsedConstructor {
    let body = node.child_by_field_name("body");
    let mut assignments = Vec::new();
    if let Some(body) = body {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(expr) = statement.named_child(0) else { continue };
            if expr.kind() != "assignment_expression" {
                continue;
            }
            let is_this_assignment = expr
                .child_by_field_name("left")
                .filter(|left| left.kind() == "member_expression")
                .and_then(|left| left.child_by_field_name("object"))
                .is_some_and(|object| object.kind() == "this");
            if is_this_assignment {
                assignments.push(text(statement, source).trim().to_string());
            }
        }
    }
    ParsedConstructor {
        signature: signature_before(node, body, source),
        doc: doc_comment(node, source),
        assignments,
    }
}

// --- Python ---

fn classify_py(node: Node, source: &str, out: &mut ParsedStructure) {
    match node.kind() {
        "import_statement" => {
            // Plain `import x` is recorded but never resolved, matching the
            // engine's from-import-only expansion.
            out.imports.push(ParsedImport {
                raw: text(node, source).trim_end().to_string(),
                specifier: None,
                bindings: None,
                resolved_path: None,
                resolved: None,
            });
        }
        "import_from_statement" => out.imports.push(parse_py_import_from(node, source)),
        "expression_statement" => {
            if let Some(assignment) = node.named_child(0).filter(|n| n.kind() == "assignment") {
                if let Some(left) = assignment
                    .child_by_field_name("left")
                    .filter(|left| left.kind() == "identifier")
                {
                    out.variables.push(ParsedVariable {
                        name: text(left, source).to_string(),
                        text: first_line(text(node, source)),
                    });
                }
            }
        }
        "function_definition" => out.functions.push(parse_py_function(node, node, source)),
        "class_definition" => out.classes.push(parse_py_class(node, node, source)),
        "decorated_definition" => {
            if let Some(definition) = node.child_by_field_name("definition") {
                match definition.kind() {
                    "function_definition" => {
                        out.functions.push(parse_py_function(node, definition, source));
                    }
                    "class_definition" => {
                        out.classes.push(parse_py_class(node, definition, source));
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn parse_py_import_from(node: Node, source: &str) -> ParsedImport {
    let raw = text(node, source).trim_end().to_string();
    let specifier = node.child_by_field_name("module_name").map(|m| text(m, source).to_string());

    let mut bindings = Some(BTreeSet::new());
    let mut has_wildcard = false;
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" | "identifier" => {
                if let Some(set) = bindings.as_mut() {
                    set.insert(text(name, source).to_string());
                }
            }
            "aliased_import" => {
                if let Some(original) = name.child_by_field_name("name") {
                    if let Some(set) = bindings.as_mut() {
                        set.insert(text(original, source).to_string());
                    }
                }
            }
            _ => {}
        }
    }
    let mut wc_cursor = node.walk();
    for child in node.named_children(&mut wc_cursor) {
        if child.kind() == "wildcard_import" {
            has_wildcard = true;
        }
    }
    if has_wildcard {
        bindings = None;
    }

    ParsedImport { raw, specifier, bindings, resolved_path: None, resolved: None }
}

/// `outer` includes decorators when the definition is decorated; `def_node`
/// is the `function_definition` itself.
fn parse_py_function(outer: Node, def_node: Node, source: &str) -> ParsedFunction {
    let body = def_node.child_by_field_name("body");
    ParsedFunction {
        name: def_node
            .child_by_field_name("name")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default(),
        signature: signature_before(outer, body, source),
        doc: body.and_then(|b| py_docstring(b, source)),
        last_return: body.and_then(|b| last_return(b, source, PY_FUNCTION_LIKE)),
    }
}

fn py_docstring(body: Node, source: &str) -> Option<String> {
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let inner = first.named_child(0)?;
    if inner.kind() == "string" {
        Some(text(inner, source).to_string())
    } else {
        None
    }
}

fn parse_py_class(outer: Node, def_node: Node, source: &str) -> ParsedClass {
    let body = def_node.child_by_field_name("body");
    let mut class = ParsedClass {
        name: def_node
            .child_by_field_name("name")
            .map(|n| text(n, source).to_string())
            .unwrap_or_default(),
        signature: signature_before(outer, body, source),
        doc: body.and_then(|b| py_docstring(b, source)),
        properties: Vec::new(),
        constructor: None,
        methods: Vec::new(),
    };

    let Some(body) = body else { return class };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "expression_statement" => {
                if let Some(assignment) =
                    member.named_child(0).filter(|n| n.kind() == "assignment")
                {
                    let is_name_target = assignment
                        .child_by_field_name("left")
                        .is_some_and(|left| left.kind() == "identifier");
                    if is_name_target {
                        class.properties.push(text(member, source).trim_end().to_string());
                    }
                }
            }
            "function_definition" => add_py_method(&mut class, member, member, source),
            "decorated_definition" => {
                if let Some(definition) = member
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition")
                {
                    add_py_method(&mut class, member, definition, source);
                }
            }
            _ => {}
        }
    }
    class
}

fn add_py_method(class: &mut ParsedClass, outer: Node, def_node: Node, source: &str) {
    let name = def_node.child_by_field_name("name").map(|n| text(n, source)).unwrap_or("");
    if name == "__init__" {
        class.constructor = Some(parse_py_constructor(outer, def_node, source));
    } else {
        class.methods.push(parse_py_function(outer, def_node, source));
    }
}

fn parse_py_constructor(outer: Node, def_node: Node, source: &str) -> ParsedConstructor {
    let body = def_node.child_by_field_name("body");
    let mut assignments = Vec::new();
    if let Some(body) = body {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(assignment) =
                statement.named_child(0).filter(|n| n.kind() == "assignment")
            else {
                continue;
            };
            let is_self_assignment = assignment
                .child_by_field_name("left")
                .filter(|left| left.kind() == "attribute")
                .and_then(|left| left.child_by_field_name("object"))
                .is_some_and(|object| {
                    object.kind() == "identifier" && text(object, source) == "self"
                });
            if is_self_assignment {
                assignments.push(text(statement, source).trim().to_string());
            }
        }
    }
    ParsedConstructor {
        signature: signature_before(outer, body, source),
        doc: body.and_then(|b| py_docstring(b, source)),
        assignments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ts(source: &str) -> ParsedStructure {
        parse_source(SourceLanguage::TypeScript, "test.ts".to_string(), source).expect("parse")
    }

    fn parse_py(source: &str) -> ParsedStructure {
        parse_source(SourceLanguage::Python, "test.py".to_string(), source).expect("parse")
    }

    #[test]
    fn extracts_ts_imports_with_bindings() {
        let s = parse_ts(
            "import { a, b as c } from \"./x\";\nimport def from \"./y\";\nimport * as ns from \"./z\";\n",
        );
        assert_eq!(s.imports.len(), 3);

        let named = &s.imports[0];
        assert_eq!(named.specifier.as_deref(), Some("./x"));
        let bindings = named.bindings.as_ref().expect("bindings");
        assert!(bindings.contains("a"));
        // Alias `c` is local; pruning filters by the exporter's name `b`.
        assert!(bindings.contains("b"));
        assert!(!bindings.contains("c"));

        let default = &s.imports[1];
        assert!(default.bindings.as_ref().expect("bindings").contains("def"));

        // Namespace imports consume unknown names.
        assert!(s.imports[2].bindings.is_none());
    }

    #[test]
    fn extracts_ts_variables_functions_classes() {
        let s = parse_ts(
            "const limit = 10;\nexport let name = \"x\";\nfunction go(a: number): number {\n  return a;\n}\nclass Thing {\n}\n",
        );
        assert_eq!(s.variables.len(), 2);
        assert_eq!(s.variables[0].name, "limit");
        assert_eq!(s.variables[1].name, "name");
        assert_eq!(s.functions.len(), 1);
        assert_eq!(s.functions[0].signature, "function go(a: number): number");
        assert_eq!(s.classes.len(), 1);
        assert_eq!(s.classes[0].name, "Thing");
    }

    #[test]
    fn function_last_return_skips_nested_closures() {
        let s = parse_ts(
            "function outer(): number {\n  const inner = () => {\n    return 99;\n  };\n  if (true) {\n    return 1;\n  }\n  return inner();\n}\n",
        );
        assert_eq!(s.functions[0].last_return.as_deref(), Some("return inner();"));
    }

    #[test]
    fn function_without_return_has_none() {
        let s = parse_ts("function log(msg: string): void {\n  console.log(msg);\n}\n");
        assert_eq!(s.functions[0].last_return, None);
    }

    #[test]
    fn doc_comment_attaches_to_following_declaration() {
        let s = parse_ts("/** Adds one. */\nfunction addOne(n: number): number {\n  return n + 1;\n}\n");
        assert_eq!(s.functions[0].doc.as_deref(), Some("/** Adds one. */"));
    }

    #[test]
    fn exported_declarations_are_unwrapped() {
        let s = parse_ts("/** doc */\nexport function pub(): void {\n}\nexport class C {\n}\n");
        assert_eq!(s.functions.len(), 1);
        assert_eq!(s.functions[0].name, "pub");
        assert_eq!(s.functions[0].doc.as_deref(), Some("/** doc */"));
        assert_eq!(s.classes.len(), 1);
    }

    #[test]
    fn class_members_and_constructor_assignments() {
        let s = parse_ts(
            "class Runner {\n  count = 0;\n  constructor(opts: Opts) {\n    this.opts = opts;\n    this.count = 1;\n    validate(opts);\n  }\n  run(): number {\n    return this.count;\n  }\n}\n",
        );
        let class = &s.classes[0];
        assert_eq!(class.properties, vec!["count = 0;"]);
        let ctor = class.constructor.as_ref().expect("constructor");
        assert_eq!(ctor.assignments, vec!["this.opts = opts;", "this.count = 1;"]);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, "run");
    }

    #[test]
    fn python_from_import_bindings_use_original_names() {
        let s = parse_py("from helpers import shared, other as o\nimport os\n");
        assert_eq!(s.imports.len(), 2);
        let from_import = &s.imports[0];
        assert_eq!(from_import.specifier.as_deref(), Some("helpers"));
        let bindings = from_import.bindings.as_ref().expect("bindings");
        assert!(bindings.contains("shared"));
        assert!(bindings.contains("other"));
        // Plain `import os` carries no resolvable specifier.
        assert!(s.imports[1].specifier.is_none());
    }

    #[test]
    fn python_function_docstring_and_return() {
        let s = parse_py("def area(r):\n    \"\"\"Circle area.\"\"\"\n    x = r * r\n    return 3.14 * x\n");
        let f = &s.functions[0];
        assert_eq!(f.signature, "def area(r):");
        assert_eq!(f.doc.as_deref(), Some("\"\"\"Circle area.\"\"\""));
        assert_eq!(f.last_return.as_deref(), Some("return 3.14 * x"));
    }

    #[test]
    fn python_class_with_init_assignments() {
        let s = parse_py(
            "class Widget:\n    kind = \"basic\"\n    def __init__(self, size):\n        self.size = size\n        helper()\n    def grow(self):\n        return self.size + 1\n",
        );
        let class = &s.classes[0];
        assert_eq!(class.signature, "class Widget:");
        assert_eq!(class.properties, vec!["kind = \"basic\""]);
        let ctor = class.constructor.as_ref().expect("constructor");
        assert_eq!(ctor.assignments, vec!["self.size = size"]);
        assert_eq!(class.methods.len(), 1);
    }

    #[test]
    fn python_decorated_function_signature_includes_decorator() {
        let s = parse_py("@cached\ndef heavy(x):\n    return x\n");
        assert_eq!(s.functions[0].signature, "@cached\ndef heavy(x):");
    }

    #[test]
    fn unclassified_statements_are_ignored() {
        let s = parse_ts("interface Shape {\n  area(): number;\n}\ntype Alias = string;\nconsole.log(1);\n");
        assert!(s.imports.is_empty());
        assert!(s.variables.is_empty());
        assert!(s.functions.is_empty());
        assert!(s.classes.is_empty());
    }
}
