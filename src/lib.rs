//! testwright: rule-based Python test synthesis and test-quality validation
//!
//! This library reads Python source with tree-sitter, extracts its classes
//! and functions, and produces a deterministic pytest-style test suite for
//! them. It also validates candidate tests for isolation and quality
//! problems, and keeps per-session memory of learned test patterns so later
//! analyses can suggest tests similar to earlier successful ones.
//!
//! # Example
//!
//! ```ignore
//! use testwright::{analyze, validate, SessionMemory};
//!
//! let suite = analyze("def add(a, b):\n    return a + b\n")?;
//! assert_eq!(suite.class_name, "TestAdd");
//!
//! let report = validate("def test_add():\n    assert add(1, 2) == 3\n", None);
//! assert!(!report.is_valid); // no docstring
//!
//! let memory = SessionMemory::new();
//! let session = memory.open_session();
//! let suite = memory.analyze(&session, "class Cart:\n    pass\n")?;
//! ```

pub mod analysis;
pub mod checks;
pub mod cli;
pub mod detectors;
pub mod error;
pub mod extract;
pub mod lang;
pub mod patterns;
pub mod report;
pub mod schema;
pub mod session;
pub mod synth;
pub mod utils;

// Re-export commonly used types
pub use analysis::{complexity_report, cyclomatic_complexity, rating, UnitComplexity};
pub use checks::validate;
pub use cli::{Cli, Command, OutputFormat};
pub use error::{Result, TestwrightError};
pub use extract::{extract, Extraction};
pub use lang::parse_python;
pub use patterns::{Pattern, PatternShape, PatternStore};
pub use schema::{
    IssueKind, SourceUnit, TestCase, TestSuite, UnitKind, UnitScope, ValidationIssue,
    ValidationReport,
};
pub use session::{MemoryItem, SessionMemory};
pub use synth::{analyze, synthesize};
