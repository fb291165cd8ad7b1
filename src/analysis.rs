//! Cyclomatic complexity for a single declaration
//!
//! Counted purely from syntax:
//! - base 1
//! - +1 for each `if`, `elif`, `for`, `while`, `except` and `except*`
//!   clause anywhere in the declaration, nested ones included
//! - +1 for each `and`/`or` operator node. tree-sitter nests an n-operand
//!   chain into n - 1 binary nodes, so this adds n - 1 per chain.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::detectors::common::visit_all;
use crate::extract::Extraction;
use crate::schema::UnitKind;

/// Node kinds that open an extra path through a declaration
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "except_clause",
    "except_group_clause",
    "boolean_operator",
];

/// Calculate the cyclomatic complexity of a declaration node
pub fn cyclomatic_complexity(node: &Node) -> u32 {
    let mut complexity = 1;
    visit_all(node, |n| {
        if BRANCH_KINDS.contains(&n.kind()) {
            complexity += 1;
        }
    });
    complexity
}

/// Get a human-readable rating for a complexity score
///
/// Thresholds:
/// - 1-5: simple
/// - 6-10: moderate
/// - 11-20: complex
/// - 21+: very complex
pub fn rating(complexity: u32) -> &'static str {
    match complexity {
        0..=5 => "simple",
        6..=10 => "moderate",
        11..=20 => "complex",
        _ => "very complex",
    }
}

/// Complexity of one extracted declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitComplexity {
    pub kind: UnitKind,
    pub name: String,
    pub line: usize,
    pub complexity: u32,
    pub rating: String,
}

/// Complexity of every class and function, in extraction order
pub fn complexity_report(extraction: &Extraction) -> Vec<UnitComplexity> {
    extraction
        .classes
        .iter()
        .chain(&extraction.functions)
        .map(|unit| UnitComplexity {
            kind: unit.kind,
            name: unit.name.clone(),
            line: unit.line,
            complexity: unit.complexity,
            rating: rating(unit.complexity).to_string(),
        })
        .collect()
}
