//! Python grammar loading and fail-fast parsing
//!
//! tree-sitter always produces a tree, recovering around bad input with
//! `ERROR` and `MISSING` nodes. The analysis core never works on a recovered
//! tree: any error node turns the whole parse into a malformed-source error.
//!
//! The grammar is also more permissive than Python 3 itself. It accepts
//! Python 2 `print`/`exec` statements and the `<>` operator, and it does not
//! insist that a dedent lands on an indentation level that is still open.
//! Those are rejected after the parse, as is nesting deep enough that
//! CPython's own parser would give up.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::detectors::common::{line_of, max_depth, visit_all};
use crate::error::{Result, TestwrightError};
use crate::utils::truncate_with_ellipsis;

/// Deepest syntax tree accepted, in tree levels
pub const MAX_TREE_DEPTH: usize = 1000;

/// Get the tree-sitter Language for Python
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Create a parser with the Python grammar loaded
pub fn python_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| TestwrightError::LanguageSetup {
            message: format!("Failed to set language: {:?}", e),
        })?;
    Ok(parser)
}

/// Parse Python source, failing on any syntax error
pub fn parse_python(source: &str) -> Result<Tree> {
    let mut parser = python_parser()?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TestwrightError::MalformedSource {
            message: "Failed to parse source".to_string(),
            line: None,
        })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(recovery_error(&root, source));
    }

    if max_depth(&root) > MAX_TREE_DEPTH {
        return Err(TestwrightError::MalformedSource {
            message: format!("too deeply nested (over {} levels)", MAX_TREE_DEPTH),
            line: None,
        });
    }

    if let Some((line, what)) = legacy_syntax(&root) {
        return Err(TestwrightError::MalformedSource {
            message: format!("{} at line {} is not valid Python 3", what, line),
            line: Some(line),
        });
    }

    if let Some(line) = misaligned_statement(&root) {
        return Err(TestwrightError::MalformedSource {
            message: format!(
                "unindent at line {} does not match any outer indentation level",
                line
            ),
            line: Some(line),
        });
    }

    Ok(tree)
}

fn recovery_error(root: &Node, source: &str) -> TestwrightError {
    match first_error_node(root) {
        Some(node) => {
            let line = line_of(&node);
            let message = if node.is_missing() {
                format!("missing `{}` at line {}", node.kind(), line)
            } else {
                let text = node.utf8_text(source.as_bytes()).unwrap_or("");
                let text = text.lines().next().unwrap_or("").trim();
                format!(
                    "invalid syntax at line {} near `{}`",
                    line,
                    truncate_with_ellipsis(text, 40)
                )
            };
            TestwrightError::MalformedSource {
                message,
                line: Some(line),
            }
        }
        None => TestwrightError::MalformedSource {
            message: "invalid syntax".to_string(),
            line: None,
        },
    }
}

/// Find the first ERROR or MISSING node in depth-first order, skipping
/// subtrees that contain no error
fn first_error_node<'a>(root: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// First Python 2 construct in the tree, with its line
fn legacy_syntax(root: &Node) -> Option<(usize, &'static str)> {
    let mut found = None;
    visit_all(root, |node| {
        if found.is_some() {
            return;
        }
        let what = match node.kind() {
            "print_statement" => "`print` statement",
            "exec_statement" => "`exec` statement",
            "<>" if !node.is_named() => "`<>` operator",
            _ => return,
        };
        found = Some((line_of(node), what));
    });
    found
}

/// Line of the first statement that starts a line at a column other than
/// the one its enclosing block was opened at
fn misaligned_statement(root: &Node) -> Option<usize> {
    let mut found = None;
    visit_all(root, |node| {
        if found.is_none() && matches!(node.kind(), "module" | "block") {
            found = misaligned_in(node);
        }
    });
    found
}

fn misaligned_in(container: &Node) -> Option<usize> {
    let mut cursor = container.walk();
    let statements: Vec<Node> = container
        .named_children(&mut cursor)
        .filter(|stmt| stmt.kind() != "comment")
        .collect();

    let first = statements.first()?;
    let column = if container.kind() == "module" {
        0
    } else {
        first.start_position().column
    };

    let mut previous_end_row = None;
    for stmt in &statements {
        let start = stmt.start_position();
        // statements after `;` share a line and are not indentation
        let starts_line = previous_end_row.map_or(true, |row| start.row > row);
        if starts_line && start.column != column {
            return Some(start.row + 1);
        }
        previous_end_row = Some(stmt.end_position().row);
    }
    None
}
