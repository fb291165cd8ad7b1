//! Isolation rules: external calls without mocks, and shared state

use tree_sitter::Node;

use crate::detectors::common::{body_statements, get_node_text, line_of, visit_all};
use crate::schema::{IssueKind, ValidationIssue};

/// Call targets that construct or install a mock
pub const MOCK_CONSTRUCTORS: &[&str] = &["Mock", "patch", "MagicMock"];

/// Flag attribute-style calls (`obj.method()`) in a tree that never builds a mock
pub fn check_mock_usage(root: &Node, source: &str) -> Vec<ValidationIssue> {
    let mut has_mocks = false;
    let mut has_external_calls = false;

    visit_all(root, |node| {
        if node.kind() != "call" {
            return;
        }
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        match callee.kind() {
            "identifier" => {
                if MOCK_CONSTRUCTORS.contains(&get_node_text(&callee, source).as_str()) {
                    has_mocks = true;
                }
            }
            "attribute" => has_external_calls = true,
            _ => {}
        }
    });

    if has_external_calls && !has_mocks {
        vec![ValidationIssue::new(
            IssueKind::NoMocks,
            "Test makes external calls without using mocks",
            None,
            "Use mocks to isolate external dependencies",
        )]
    } else {
        Vec::new()
    }
}

/// Flag `global` declarations and class-level assignments to non-name targets
pub fn check_shared_state(root: &Node, _source: &str) -> Vec<ValidationIssue> {
    let mut first_line: Option<usize> = None;

    visit_all(root, |node| {
        if first_line.is_some() {
            return;
        }
        match node.kind() {
            "global_statement" => first_line = Some(line_of(node)),
            "class_definition" => first_line = shared_class_attribute(node),
            _ => {}
        }
    });

    match first_line {
        Some(line) => vec![ValidationIssue::new(
            IssueKind::SharedState,
            "Test uses shared state",
            Some(line),
            "Use fixtures or setup/teardown to manage state",
        )],
        None => Vec::new(),
    }
}

/// Line of the first class-body assignment whose target is not a plain name
fn shared_class_attribute(class: &Node) -> Option<usize> {
    for stmt in body_statements(class) {
        if stmt.kind() != "expression_statement" {
            continue;
        }
        let mut cursor = stmt.walk();
        for expr in stmt.named_children(&mut cursor) {
            if expr.kind() != "assignment" || expr.child_by_field_name("type").is_some() {
                continue;
            }
            let simple = expr
                .child_by_field_name("left")
                .is_some_and(|left| left.kind() == "identifier");
            if !simple {
                return Some(line_of(&expr));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parse_python;

    fn run(check: fn(&Node, &str) -> Vec<ValidationIssue>, source: &str) -> Vec<ValidationIssue> {
        let tree = parse_python(source).unwrap();
        check(&tree.root_node(), source)
    }

    #[test]
    fn test_external_call_without_mock() {
        let issues = run(check_mock_usage, "def test_a():\n    client.get('/x')\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::NoMocks);
    }

    #[test]
    fn test_mock_anywhere_clears_external_calls() {
        let src = "def test_a():\n    client = MagicMock()\n    client.get('/x')\n";
        assert!(run(check_mock_usage, src).is_empty());
    }

    #[test]
    fn test_plain_calls_are_not_external() {
        assert!(run(check_mock_usage, "def test_a():\n    assert add(1, 2) == 3\n").is_empty());
    }

    #[test]
    fn test_global_is_shared_state() {
        let src = "counter = 0\n\ndef test_a():\n    global counter\n    counter += 1\n";
        let issues = run(check_shared_state, src);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, Some(4));
    }

    #[test]
    fn test_class_attribute_target_is_shared_state() {
        let src = "class TestThing:\n    shared = []\n    a, b = 1, 2\n";
        let issues = run(check_shared_state, src);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, Some(3));
    }

    #[test]
    fn test_simple_class_attributes_are_fine() {
        let src = "class TestThing:\n    limit = 3\n    name: str = 'x'\n";
        assert!(run(check_shared_state, src).is_empty());
    }
}
