//! Python function extraction with tree-sitter.
//!
//! Every `function_definition` node becomes one [`FunctionStat`]: plain and
//! `async def` functions, methods, nested functions and decorated ones. The
//! span runs from the `def` line to the last statement of the body;
//! decorators and comments trailing the last statement are not included.

use std::path::Path;

use log::debug;
use tree_sitter::{Node, Parser, Point, Tree};

use crate::data::stats::FunctionStat;
use crate::source::text::split_lines;

const FUNCTION_NODE: &str = "function_definition";

/// Python 2 statements the grammar still accepts but Python 3 rejects.
const LEGACY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Nodes whose end is the end of their last nested statement.
const COMPOUND_NODES: &[&str] = &[
    "block",
    "function_definition",
    "class_definition",
    "decorated_definition",
    "if_statement",
    "for_statement",
    "while_statement",
    "try_statement",
    "with_statement",
    "match_statement",
];

fn parse(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .ok()?;
    parser.parse(source, None)
}

/// Extract every function defined in a Python source.
///
/// A source that does not parse cleanly yields no functions.
///
/// # Example
///
/// ```rust
/// use codestatslib::data::functions::python;
///
/// let functions = python::analyze_source("m.py", "def f():\n    return 1\n");
/// assert_eq!(functions.len(), 1);
/// assert_eq!(functions[0].name, "f");
/// assert_eq!(functions[0].line_count, 2);
/// ```
pub fn analyze_source(path: impl AsRef<Path>, source: &str) -> Vec<FunctionStat> {
    let path = path.as_ref();

    // Rows are counted on `\n` only.
    let normalized;
    let source = if source.contains('\r') {
        normalized = split_lines(source).collect::<Vec<_>>().join("\n");
        normalized.as_str()
    } else {
        source
    };

    let Some(tree) = parse(source) else {
        debug!("tree-sitter could not parse {}", path.display());
        return Vec::new();
    };
    let root = tree.root_node();
    if root.has_error() {
        debug!("syntax errors in {}, skipping functions", path.display());
        return Vec::new();
    }
    if contains_legacy_statement(&root) {
        debug!("python 2 syntax in {}, skipping functions", path.display());
        return Vec::new();
    }

    let mut functions = Vec::new();
    collect_functions(&root, source, path, &mut functions);
    functions.sort_by_key(|f| f.start_line);
    functions
}

fn collect_functions(node: &Node, source: &str, path: &Path, out: &mut Vec<FunctionStat>) {
    if node.kind() == FUNCTION_NODE {
        out.push(function_stat(node, source, path));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_functions(&child, source, path, out);
    }
}

fn contains_legacy_statement(node: &Node) -> bool {
    if LEGACY_STATEMENTS.contains(&node.kind()) {
        return true;
    }
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| contains_legacy_statement(&child));
    found
}

/// End of the last statement under `node`, skipping trailing comments.
fn statement_end(node: &Node) -> Point {
    if !COMPOUND_NODES.contains(&node.kind()) && !node.kind().ends_with("_clause") {
        return node.end_position();
    }
    let mut cursor = node.walk();
    let last = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .last();
    match last {
        Some(child) => statement_end(&child),
        None => node.end_position(),
    }
}

fn function_stat(node: &Node, source: &str, path: &Path) -> FunctionStat {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .unwrap_or("<anonymous>");

    let start = node.start_position();
    let end = node
        .child_by_field_name("body")
        .map(|body| statement_end(&body))
        .unwrap_or_else(|| node.end_position());

    // A span ending at column 0 stops before that line's first character.
    let end_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };

    FunctionStat::new(name, path, start.row as u64 + 1, end_row as u64 + 1)
}
