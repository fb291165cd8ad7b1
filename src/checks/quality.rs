//! Quality rules: naming, assertions, documentation

use tree_sitter::Node;

use crate::detectors::common::{collect_kind, count_kind, definition_name, docstring, line_of};
use crate::schema::{IssueKind, ValidationIssue, TEST_PREFIX};

/// One issue per function whose name lacks the test prefix
pub fn check_naming(root: &Node, source: &str) -> Vec<ValidationIssue> {
    collect_kind(root, "function_definition")
        .iter()
        .filter_map(|func| {
            let name = definition_name(func, source)?;
            (!name.starts_with(TEST_PREFIX)).then(|| {
                ValidationIssue::new(
                    IssueKind::NamingConvention,
                    format!("Function name '{}' does not follow the naming convention", name),
                    Some(line_of(func)),
                    format!("Test functions should start with '{}'", TEST_PREFIX),
                )
            })
        })
        .collect()
}

/// Flag a tree without a single `assert` statement
pub fn check_assertions(root: &Node, _source: &str) -> Vec<ValidationIssue> {
    if count_kind(root, "assert_statement") > 0 {
        return Vec::new();
    }
    vec![ValidationIssue::new(
        IssueKind::NoAssertions,
        "Test contains no assertions",
        None,
        "Add assertions to verify the expected behavior",
    )]
}

/// Flag a tree where no function carries a docstring
pub fn check_documentation(root: &Node, source: &str) -> Vec<ValidationIssue> {
    let documented = collect_kind(root, "function_definition")
        .iter()
        .any(|func| docstring(func, source).is_some());
    if documented {
        return Vec::new();
    }
    vec![ValidationIssue::new(
        IssueKind::NoDocstring,
        "Test has no docstring",
        None,
        "Add a docstring describing the purpose of the test",
    )]
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
    fn test_naming_flags_each_offender() {
        let src = "def helper():\n    pass\n\ndef test_ok():\n    pass\n\ndef check():\n    pass\n";
        let issues = run(check_naming, src);
        let lines: Vec<_> = issues.iter().map(|i| i.line_number).collect();
        assert_eq!(lines, vec![Some(1), Some(7)]);
        assert!(issues[0].description.contains("'helper'"));
    }

    #[test]
    fn test_assertions_anywhere_count() {
        assert!(run(check_assertions, "def test_a():\n    if x:\n        assert x\n").is_empty());
        assert_eq!(run(check_assertions, "def test_a():\n    pass\n").len(), 1);
    }

    #[test]
    fn test_one_docstring_is_enough() {
        let src = "def test_a():\n    '''Doc.'''\n\ndef test_b():\n    pass\n";
        assert!(run(check_documentation, src).is_empty());
        assert_eq!(run(check_documentation, "def test_b():\n    pass\n").len(), 1);
    }

    #[test]
    fn test_no_functions_means_no_docstring() {
        assert_eq!(run(check_documentation, "assert True\n").len(), 1);
    }
}
