//! Candidate-test validation
//!
//! Each rule is an independent pure function from a parsed tree to zero or
//! more issues. Validation runs every isolation rule, then every quality
//! rule, and scores the result. A candidate that does not parse gets a
//! single `syntax_error` issue and no other checks.
//!
//! Scoring counts every issue, isolation and quality alike, into both scores:
//! `max(0, 1 - 0.1 * issues)`.

pub mod isolation;
pub mod quality;

use std::collections::BTreeSet;

use tree_sitter::Node;
use tracing::debug;

use crate::detectors::common::{
    collect_kind, definition_name, docstring, get_node_text, visit_all,
};
use crate::error::TestwrightError;
use crate::lang::parse_python;
use crate::schema::{IssueKind, TestCase, ValidationIssue, ValidationReport, TEST_PREFIX};

/// A structural rule over a candidate test's tree
pub type Check = fn(&Node, &str) -> Vec<ValidationIssue>;

/// Isolation rules, in reporting order
pub const ISOLATION_CHECKS: &[Check] = &[isolation::check_mock_usage, isolation::check_shared_state];

/// Quality rules, in reporting order
pub const QUALITY_CHECKS: &[Check] = &[
    quality::check_naming,
    quality::check_assertions,
    quality::check_documentation,
];

const NO_DESCRIPTION: &str = "No description available";

/// Validate a candidate test.
///
/// The related source is accepted alongside the candidate for callers that
/// have it; none of the current rules read it.
pub fn validate(candidate: &str, _source: Option<&str>) -> ValidationReport {
    let tree = match parse_python(candidate) {
        Ok(tree) => tree,
        Err(err) => return syntax_failure(&err),
    };
    let root = tree.root_node();

    let issues: Vec<ValidationIssue> = ISOLATION_CHECKS
        .iter()
        .chain(QUALITY_CHECKS)
        .flat_map(|check| check(&root, candidate))
        .collect();

    let score = score(issues.len());
    let summary = summarize(&root, candidate);

    debug!(
        issues = issues.len(),
        score,
        summarized = summary.is_some(),
        "validated candidate test"
    );

    ValidationReport {
        is_valid: issues.is_empty(),
        issues,
        isolation_score: score,
        maintainability_score: score,
        summary,
    }
}

/// Linear decay of 0.1 per issue, floored at zero
pub fn score(issue_count: usize) -> f64 {
    let remaining = 10usize.saturating_sub(issue_count);
    remaining as f64 / 10.0
}

fn syntax_failure(err: &TestwrightError) -> ValidationReport {
    debug!(error = %err, "candidate test does not parse");
    ValidationReport {
        is_valid: false,
        issues: vec![ValidationIssue::new(
            IssueKind::SyntaxError,
            format!("Syntax error: {}", err),
            err.line(),
            "Fix the syntax of the code",
        )],
        isolation_score: 0.0,
        maintainability_score: 0.0,
        summary: None,
    }
}

/// Summarize the first test-prefixed function, if the tree has one
pub fn summarize(root: &Node, source: &str) -> Option<TestCase> {
    let func = collect_kind(root, "function_definition")
        .into_iter()
        .find(|f| {
            definition_name(f, source).is_some_and(|name| name.starts_with(TEST_PREFIX))
        })?;

    let assertions = collect_kind(&func, "assert_statement")
        .iter()
        .map(|a| get_node_text(a, source))
        .collect();

    Some(TestCase {
        name: definition_name(&func, source)?,
        description: docstring(&func, source).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        setup: None,
        body: get_node_text(&outer_definition(&func), source),
        assertions,
        dependencies: imported_modules(&func, source),
    })
}

/// The decorated wrapper of a definition when it has one, so the body text
/// keeps its decorators
fn outer_definition<'a>(func: &Node<'a>) -> Node<'a> {
    match func.parent() {
        Some(parent) if parent.kind() == "decorated_definition" => parent,
        _ => *func,
    }
}

/// Module names imported anywhere inside a node
fn imported_modules(node: &Node, source: &str) -> BTreeSet<String> {
    let mut modules = BTreeSet::new();
    visit_all(node, |n| match n.kind() {
        "import_statement" => {
            let mut cursor = n.walk();
            for name in n.children_by_field_name("name", &mut cursor) {
                let module = match name.kind() {
                    "aliased_import" => name.child_by_field_name("name"),
                    _ => Some(name),
                };
                if let Some(module) = module {
                    modules.insert(get_node_text(&module, source));
                }
            }
        }
        "import_from_statement" => {
            if let Some(module) = n.child_by_field_name("module_name") {
                modules.insert(get_node_text(&module, source));
            }
        }
        _ => {}
    });
    modules
}
