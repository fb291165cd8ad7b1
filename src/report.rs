//! Text and JSON rendering of suites, validation reports and complexity

use serde::Serialize;

use crate::analysis::UnitComplexity;
use crate::error::{Result, TestwrightError};
use crate::schema::{TestSuite, ValidationReport};
use crate::utils::truncate_with_ellipsis;

const RULE_HEAVY: &str = "═══════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────\n";

/// Longest description shown on a single report line
const MAX_LINE_BYTES: usize = 100;

/// Pretty JSON for any report value
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| TestwrightError::Serialization {
        message: format!("JSON serialization failed: {}", e),
    })
}

fn header(output: &mut String, title: &str, target: &str) {
    output.push_str(RULE_HEAVY);
    output.push_str(&format!("  {}: {}\n", title, target));
    output.push_str(RULE_HEAVY);
    output.push('\n');
}

/// Render a generated suite as a readable report
pub fn format_suite(target: &str, suite: &TestSuite) -> String {
    let mut output = String::new();
    header(&mut output, "TEST SUITE", target);

    output.push_str(&format!("class: {}\n", suite.class_name));
    output.push_str(&format!(
        "description: {}\n",
        truncate_with_ellipsis(&suite.description, MAX_LINE_BYTES)
    ));
    output.push_str(&format!(
        "imports: {}\n",
        suite.imports.iter().cloned().collect::<Vec<_>>().join(", ")
    ));
    output.push_str(&format!(
        "fixtures: {}\n",
        suite.fixtures.keys().cloned().collect::<Vec<_>>().join(", ")
    ));
    output.push_str(&format!("cases: {}\n\n", suite.test_cases.len()));

    for case in &suite.test_cases {
        output.push_str(RULE_LIGHT);
        output.push_str(&format!("{}\n", case.name));
        output.push_str(&format!(
            "  {}\n",
            truncate_with_ellipsis(&case.description, MAX_LINE_BYTES)
        ));
        if let Some(setup) = &case.setup {
            output.push_str(&format!("  setup: {}\n", setup));
        }
        for line in case.body.lines() {
            output.push_str(&format!("    {}\n", line));
        }
    }

    output
}

/// Render a validation report as a readable report
pub fn format_validation(target: &str, report: &ValidationReport) -> String {
    let mut output = String::new();
    header(&mut output, "VALIDATION", target);

    output.push_str(&format!(
        "valid: {}\n",
        if report.is_valid { "yes" } else { "no" }
    ));
    output.push_str(&format!("isolation: {:.1}\n", report.isolation_score));
    output.push_str(&format!(
        "maintainability: {:.1}\n",
        report.maintainability_score
    ));
    if let Some(summary) = &report.summary {
        output.push_str(&format!(
            "test: {} ({} assertions)\n",
            summary.name,
            summary.assertions.len()
        ));
    }

    if report.issues.is_empty() {
        output.push_str("\nNo issues found.\n");
        return output;
    }

    output.push_str(&format!("\nissues[{}]:\n", report.issues.len()));
    for issue in &report.issues {
        let location = issue
            .line_number
            .map(|line| format!(" (line {})", line))
            .unwrap_or_default();
        output.push_str(&format!(
            "  - [{}]{} {}\n",
            issue.kind,
            location,
            truncate_with_ellipsis(&issue.description, MAX_LINE_BYTES)
        ));
        if issue.suggestion != issue.description {
            output.push_str(&format!(
                "    fix: {}\n",
                truncate_with_ellipsis(&issue.suggestion, MAX_LINE_BYTES)
            ));
        }
    }

    output
}

/// Render per-unit complexity as a readable report
pub fn format_complexity(target: &str, units: &[UnitComplexity]) -> String {
    let mut output = String::new();
    header(&mut output, "COMPLEXITY", target);

    if units.is_empty() {
        output.push_str("No classes or functions found.\n");
        return output;
    }

    for unit in units {
        output.push_str(&format!(
            "{:<8} {:<30} line {:<5} {:>3}  {}\n",
            unit.kind.as_str(),
            truncate_with_ellipsis(&unit.name, 30),
            unit.line,
            unit.complexity,
            unit.rating
        ));
    }

    output
}
