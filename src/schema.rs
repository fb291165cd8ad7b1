//! Data model shared by the extractor, synthesizer, checkers and session memory
//!
//! Everything here is a plain value: components hand each other clones and
//! never mutate a value they did not build.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name prefix every test function is expected to carry
pub const TEST_PREFIX: &str = "test_";

/// Method name a pattern with setup expects inside each function
pub const SETUP_METHOD: &str = "setUp";

// ============================================================================
// Source units
// ============================================================================

/// Kind of declaration found during extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Function,
    Class,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

/// Where a declaration sits relative to its enclosing declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum UnitScope {
    /// Declared directly in the module
    Module,
    /// Declared directly in a class body
    Method { class: String },
    /// Declared inside a function, or inside a class nested in a function
    Nested,
}

/// A declared function or class found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub kind: UnitKind,
    pub name: String,
    /// 1-based line of the `def`/`class` keyword
    pub line: usize,
    pub scope: UnitScope,
    /// Positional parameter names (functions only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    /// Methods declared directly in the class body (classes only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<SourceUnit>,
    /// Cyclomatic complexity of the whole declaration
    pub complexity: u32,
    /// Test-tooling identifiers referenced anywhere in the declaration
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tooling_refs: BTreeSet<String>,
}

impl SourceUnit {
    pub fn is_module_level(&self) -> bool {
        self.scope == UnitScope::Module
    }
}

// ============================================================================
// Test suite model
// ============================================================================

/// One proposed or extracted test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    /// Opaque test code; never interpreted, only composed and stored
    pub body: String,
    /// Assertion fragments in display order
    pub assertions: Vec<String>,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
}

impl TestCase {
    /// Whether the name follows the test-prefix convention
    pub fn follows_naming_convention(&self) -> bool {
        self.name.starts_with(TEST_PREFIX)
    }
}

/// A generated suite of test cases for one source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    pub class_name: String,
    pub description: String,
    /// Generation order, preserved for deterministic rendering
    pub test_cases: Vec<TestCase>,
    pub imports: BTreeSet<String>,
    pub fixtures: BTreeMap<String, String>,
}

impl TestSuite {
    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|c| c.name == name)
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.test_cases.iter().map(|c| c.name.as_str()).collect()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Fixed category of validation defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SyntaxError,
    NoMocks,
    SharedState,
    NamingConvention,
    NoAssertions,
    NoDocstring,
    Suggestion,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax_error",
            Self::NoMocks => "no_mocks",
            Self::SharedState => "shared_state",
            Self::NamingConvention => "naming_convention",
            Self::NoAssertions => "no_assertions",
            Self::NoDocstring => "no_docstring",
            Self::Suggestion => "suggestion",
        }
    }

    /// Advice recorded in session memory for this kind of issue
    pub fn improvement(&self) -> Option<&'static str> {
        match self {
            Self::NoMocks => Some("use mocks to isolate external dependencies"),
            Self::SharedState => Some("avoid shared state; use fixtures"),
            Self::NamingConvention => Some("follow the test_* naming convention"),
            Self::NoAssertions => Some("add assertions to verify expected behavior"),
            Self::NoDocstring => Some("document the test's purpose"),
            Self::SyntaxError | Self::Suggestion => None,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single defect found in a candidate test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    pub suggestion: String,
}

impl ValidationIssue {
    pub fn new(
        kind: IssueKind,
        description: impl Into<String>,
        line_number: Option<usize>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            line_number,
            suggestion: suggestion.into(),
        }
    }
}

/// Outcome of validating one candidate test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub isolation_score: f64,
    pub maintainability_score: f64,
    /// Summary of the first test-prefixed function, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<TestCase>,
}

impl ValidationReport {
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.count(kind) > 0
    }
}
