//! Tree helpers shared by the extractor, the pattern matcher and the checkers

use tree_sitter::Node;

use crate::utils::clean_docstring;

/// Source text of a node, empty on invalid UTF-8
pub fn get_node_text(node: &Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

/// 1-based start line of a node
pub fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Visit every node in the subtree, depth-first pre-order, root included.
///
/// Walks with a `TreeCursor` so stack use stays flat however deep the tree.
pub fn visit_all<'a, F>(node: &Node<'a>, mut visitor: F)
where
    F: FnMut(&Node<'a>),
{
    let mut cursor = node.walk();
    loop {
        visitor(&cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Deepest level below the node, the node itself being level 0
pub fn max_depth(node: &Node) -> usize {
    let mut cursor = node.walk();
    let mut depth = 0;
    let mut deepest = 0;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            deepest = deepest.max(depth);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return deepest;
            }
            depth -= 1;
        }
    }
}

/// Collect every node of the given kind, depth-first pre-order
pub fn collect_kind<'a>(node: &Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    visit_all(node, |n| {
        if n.kind() == kind {
            found.push(*n);
        }
    });
    found
}

/// Count nodes of the given kind in the subtree
pub fn count_kind(node: &Node, kind: &str) -> usize {
    let mut count = 0;
    visit_all(node, |n| {
        if n.kind() == kind {
            count += 1;
        }
    });
    count
}

/// Name of a `function_definition` or `class_definition`
pub fn definition_name(node: &Node, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|name| get_node_text(&name, source))
}

/// Statements of a definition body, with decorated definitions unwrapped
/// and comments skipped
pub fn body_statements<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let Some(body) = node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|stmt| stmt.kind() != "comment")
        .map(|stmt| unwrap_decorated(&stmt))
        .collect()
}

/// The inner definition of a `decorated_definition`, or the node itself
pub fn unwrap_decorated<'a>(node: &Node<'a>) -> Node<'a> {
    if node.kind() == "decorated_definition" {
        if let Some(inner) = node.child_by_field_name("definition") {
            return inner;
        }
    }
    *node
}

/// Cleaned docstring of a function, `None` when absent or blank
pub fn docstring(node: &Node, source: &str) -> Option<String> {
    let first = body_statements(node).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let mut cursor = first.walk();
    let exprs: Vec<Node> = first.named_children(&mut cursor).collect();
    let [expr] = exprs.as_slice() else {
        return None;
    };

    let raw = match expr.kind() {
        "string" => plain_string_content(expr, source)?,
        "concatenated_string" => {
            let mut parts = String::new();
            let mut inner = expr.walk();
            for part in expr.named_children(&mut inner) {
                parts.push_str(&plain_string_content(&part, source)?);
            }
            parts
        }
        _ => return None,
    };

    let cleaned = clean_docstring(&raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Content of a plain string literal; `None` for f-strings and bytes
fn plain_string_content(node: &Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut content = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => {
                let prefix = get_node_text(&child, source).to_lowercase();
                if prefix.contains('f') || prefix.contains('b') {
                    return None;
                }
            }
            "interpolation" => return None,
            "string_content" => content.push_str(&get_node_text(&child, source)),
            _ => {}
        }
    }
    Some(content)
}
