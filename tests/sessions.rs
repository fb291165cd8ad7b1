//! Session memory: isolation, learning and suggestion round trips

mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use testwright::{IssueKind, SessionMemory};

#[test]
fn test_pattern_matches_at_or_above_assertion_count() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    memory.learn_from_success("s", &case_with_shape("test_two_checks", 2, false));

    for asserts in 0..5 {
        let suggestions = memory
            .suggest("s", &function_with_asserts(asserts, false))
            .unwrap();
        assert_eq!(suggestions.len(), usize::from(asserts >= 2), "asserts = {}", asserts);
    }
}

#[test]
fn test_setup_pattern_needs_setup_in_every_function() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    memory.learn_from_success("s", &case_with_shape("test_with_setup", 0, true));

    assert!(memory
        .suggest("s", &function_with_asserts(1, false))
        .unwrap()
        .is_empty());
    // the nested setUp is itself a function without its own setUp
    assert!(memory
        .suggest("s", &function_with_asserts(1, true))
        .unwrap()
        .is_empty());
}

#[test]
fn test_empty_text_and_empty_store_suggest_nothing() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    assert!(memory.suggest("s", NO_PARAMS).unwrap().is_empty());

    memory.learn_from_success("s", &case_with_shape("test_any", 0, false));
    assert!(memory.suggest("s", "").unwrap().is_empty());
    assert_eq!(memory.suggest("s", NO_PARAMS).unwrap().len(), 1);
}

#[test]
fn test_duplicate_names_are_learned_once() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    memory.learn_from_success("s", &case_with_shape("test_same", 1, false));
    memory.learn_from_success("s", &case_with_shape("test_same", 3, true));

    let patterns = memory.patterns("s");
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].shape.assertion_count, 1);
}

#[test]
fn test_sessions_never_share_patterns_across_threads() {
    let memory = Arc::new(SessionMemory::new());
    let ids: Vec<String> = (0..8).map(|i| format!("session-{}", i)).collect();
    for id in &ids {
        memory.create_session(id);
    }

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, id)| {
            let memory = Arc::clone(&memory);
            thread::spawn(move || {
                for round in 0..20 {
                    let name = format!("test_{}_{}", id.replace('-', "_"), round);
                    memory.learn_from_success(&id, &case_with_shape(&name, 0, false));
                    let suggestions = memory.suggest(&id, NO_PARAMS).unwrap();
                    let own = format!("'test_{}_", id.replace('-', "_"));
                    assert!(suggestions.iter().all(|s| s.contains(&own)));
                }
                i
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for id in &ids {
        let prefix = format!("test_{}_", id.replace('-', "_"));
        let patterns = memory.patterns(id);
        assert_eq!(patterns.len(), 20);
        assert!(patterns.iter().all(|p| p.name.starts_with(&prefix)));
    }
}

#[test]
fn test_session_bound_analysis_feeds_later_suggestions() {
    let memory = SessionMemory::new();
    let first = memory.open_session();
    let second = memory.open_session();

    let suite = memory.analyze(&first, BARE_CLASS).unwrap();
    assert_eq!(suite.test_cases.len(), 1);

    // the learned init case has one assertion, which the function below meets
    let source = function_with_asserts(1, false);
    let suite = memory.analyze(&first, &source).unwrap();
    assert!(suite.case_names().iter().any(|n| n.starts_with("test_suggested_")));

    let isolated = memory.analyze(&second, &source).unwrap();
    assert!(isolated
        .case_names()
        .iter()
        .all(|n| !n.starts_with("test_suggested_")));
}

#[test]
fn test_session_bound_validation_records_memory() {
    let memory = SessionMemory::new();
    memory.create_session("s");

    let report = memory.validate("s", THREE_DEFECTS, None);
    assert!(!report.is_valid);

    let item = memory.memory("s", "test_fetch").unwrap();
    assert!(!item.passed);
    assert_eq!(
        item.improvements,
        vec![
            "use mocks to isolate external dependencies",
            "follow the test_* naming convention",
            "document the test's purpose",
        ]
    );
}

#[test]
fn test_valid_candidate_gets_suggestion_issues_without_losing_validity() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    memory.learn_from_success("s", &case_with_shape("test_one_check", 1, false));

    let report = memory.validate("s", GOOD_TEST, None);
    assert!(report.is_valid);
    assert_eq!(report.isolation_score, 1.0);
    assert_eq!(report.count(IssueKind::Suggestion), 1);
    assert!(memory.memory("s", "test_total_applies_discount").unwrap().passed);
}

#[test]
fn test_source_without_functions_matches_every_plain_pattern() {
    let memory = SessionMemory::new();
    memory.create_session("s");
    memory.learn_from_success("s", &case_with_shape("test_anything", 0, false));

    assert_eq!(memory.suggest("s", BARE_CLASS).unwrap().len(), 1);
    assert_eq!(memory.suggest("s", EMPTY_MODULE).unwrap().len(), 1);
    assert!(memory.suggest("s", "").unwrap().is_empty());

    let suite = memory.analyze("s", BARE_CLASS).unwrap();
    assert_eq!(
        suite.case_names(),
        vec!["test_widget_initialization", "test_suggested_1"]
    );
}
