//! Learned test shapes and the suggestions they produce
//!
//! A [`Pattern`] remembers only the structural shape of an accepted test case:
//! whether it had setup code, how many assertions it made, and whether it
//! declared dependencies. Matching a pattern against new source is
//! conjunctive: every function in the tree has to satisfy it.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

use crate::detectors::common::{body_statements, collect_kind, count_kind, definition_name};
use crate::error::Result;
use crate::lang::parse_python;
use crate::schema::{TestCase, SETUP_METHOD};

/// Structural signature of an accepted test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternShape {
    pub has_setup: bool,
    pub assertion_count: usize,
    pub has_dependencies: bool,
}

/// A named, described shape learned from one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub shape: PatternShape,
}

impl Pattern {
    /// Derive a pattern from a test case's structure
    pub fn from_test_case(case: &TestCase) -> Self {
        Self {
            name: case.name.clone(),
            description: case.description.clone(),
            shape: PatternShape {
                has_setup: case.setup.as_deref().is_some_and(|s| !s.is_empty()),
                assertion_count: case.assertions.len(),
                has_dependencies: !case.dependencies.is_empty(),
            },
        }
    }

    /// Whether every function in the tree satisfies this pattern.
    ///
    /// Holds trivially for a tree without functions.
    pub fn matches(&self, tree: &Tree, source: &str) -> bool {
        collect_kind(&tree.root_node(), "function_definition")
            .iter()
            .all(|f| self.matches_function(f, source))
    }

    fn matches_function(&self, func: &Node, source: &str) -> bool {
        if self.shape.has_setup && !declares_setup(func, source) {
            return false;
        }
        count_kind(func, "assert_statement") >= self.shape.assertion_count
    }

    /// Suggestion text offered when this pattern matches
    pub fn suggestion(&self) -> String {
        format!(
            "Consider adding a test similar to '{}' to validate {}",
            self.name, self.description
        )
    }
}

/// Whether a function declares a setup routine directly in its body
fn declares_setup(func: &Node, source: &str) -> bool {
    body_statements(func).iter().any(|stmt| {
        stmt.kind() == "function_definition"
            && definition_name(stmt, source).as_deref() == Some(SETUP_METHOD)
    })
}

/// Ordered, name-unique collection of learned patterns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the shape of a case; returns false when a pattern with the same
    /// name is already stored
    pub fn learn(&mut self, case: &TestCase) -> bool {
        if self.patterns.iter().any(|p| p.name == case.name) {
            return false;
        }
        self.patterns.push(Pattern::from_test_case(case));
        true
    }

    /// Suggestions for source text, in pattern insertion order.
    ///
    /// Blank text never matches anything.
    pub fn suggestions(&self, source: &str) -> Result<Vec<String>> {
        if self.patterns.is_empty() || source.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tree = parse_python(source)?;
        Ok(self.suggestions_for_tree(&tree, source))
    }

    /// Suggestions for an already parsed tree of `source`
    pub fn suggestions_for_tree(&self, tree: &Tree, source: &str) -> Vec<String> {
        if source.trim().is_empty() {
            return Vec::new();
        }
        self.patterns
            .iter()
            .filter(|p| p.matches(tree, source))
            .map(Pattern::suggestion)
            .collect()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
