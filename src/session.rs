//! Session memory: per-session pattern stores and validation history
//!
//! Every operation names its session explicitly. The registry lock is only
//! held long enough to look a session up or insert it; the work itself runs
//! under that session's own lock, so requests for different sessions never
//! contend and never see each other's state.
//!
//! Operations on an unknown session id are silent no-ops (suggestions come
//! back empty), matching the request-scoped convenience of the service layer.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::checks::validate;
use crate::error::Result;
use crate::patterns::{Pattern, PatternStore};
use crate::schema::{IssueKind, TestCase, TestSuite, ValidationIssue, ValidationReport};
use crate::synth::synthesize;

/// A test case paired with its latest validation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub test_case: TestCase,
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
    /// Advice derived from the issue kinds
    pub improvements: Vec<String>,
}

impl MemoryItem {
    pub fn new(test_case: TestCase, passed: bool, issues: Vec<ValidationIssue>) -> Self {
        let improvements = issues
            .iter()
            .filter_map(|issue| issue.kind.improvement())
            .map(str::to_string)
            .collect();
        Self {
            test_case,
            passed,
            issues,
            improvements,
        }
    }
}

/// State owned by one session
#[derive(Debug, Default)]
pub struct Session {
    patterns: PatternStore,
    memories: HashMap<String, MemoryItem>,
}

impl Session {
    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn memory(&self, name: &str) -> Option<&MemoryItem> {
        self.memories.get(name)
    }

    /// Record an outcome under the case's name, replacing any earlier one
    fn record(&mut self, id: &str, case: TestCase, passed: bool, issues: Vec<ValidationIssue>) {
        let name = case.name.clone();
        self.memories
            .insert(name.clone(), MemoryItem::new(case, passed, issues));
        debug!(session = id, test = %name, passed, "stored test result");
    }
}

/// Registry of independently locked sessions
#[derive(Debug, Default)]
pub struct SessionMemory {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session if it does not exist yet; existing state is kept
    pub fn create_session(&self, id: &str) {
        let mut sessions = self.sessions.write();
        if !sessions.contains_key(id) {
            sessions.insert(id.to_string(), Arc::new(Mutex::new(Session::default())));
            info!(session = id, "created session");
        }
    }

    /// Mint a fresh session id and create its session
    pub fn open_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.create_session(&id);
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn session(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let found = self.sessions.read().get(id).cloned();
        if found.is_none() {
            debug!(session = id, "no such session, skipping");
        }
        found
    }

    /// Learn the shape of a successful test case
    pub fn learn_from_success(&self, id: &str, case: &TestCase) {
        if let Some(session) = self.session(id) {
            if session.lock().patterns.learn(case) {
                debug!(session = id, pattern = %case.name, "learned pattern");
            }
        }
    }

    /// Suggestions from the session's learned patterns for the given source
    pub fn suggest(&self, id: &str, source: &str) -> Result<Vec<String>> {
        let Some(session) = self.session(id) else {
            return Ok(Vec::new());
        };
        let suggestions = session.lock().patterns.suggestions(source);
        suggestions
    }

    /// Record a validation outcome, replacing any earlier one for the same name
    pub fn store_test_result(
        &self,
        id: &str,
        case: TestCase,
        passed: bool,
        issues: Vec<ValidationIssue>,
    ) {
        if let Some(session) = self.session(id) {
            session.lock().record(id, case, passed, issues);
        }
    }

    /// Generate a suite, reading suggestions from and learning into the session.
    ///
    /// An unknown session behaves like a fresh, empty one that is thrown away.
    pub fn analyze(&self, id: &str, source: &str) -> Result<TestSuite> {
        match self.session(id) {
            Some(session) => {
                let mut guard = session.lock();
                synthesize(source, Some(&mut guard.patterns))
            }
            None => synthesize(source, None),
        }
    }

    /// Validate a candidate test and record the outcome in the session.
    ///
    /// When the candidate is valid, each pattern suggestion for it is appended
    /// as a `suggestion` issue. Validity and scores are settled before that
    /// and are not affected.
    pub fn validate(&self, id: &str, candidate: &str, source: Option<&str>) -> ValidationReport {
        let mut report = validate(candidate, source);
        let Some(session) = self.session(id) else {
            return report;
        };
        let mut session = session.lock();

        if let Some(summary) = report.summary.clone() {
            session.record(id, summary, report.is_valid, report.issues.clone());
        }

        if report.is_valid {
            // a valid candidate always parsed, so suggestions cannot fail here
            let suggestions = session.patterns.suggestions(candidate).unwrap_or_default();
            report.issues.extend(suggestions.into_iter().map(|text| {
                ValidationIssue::new(IssueKind::Suggestion, text.clone(), None, text)
            }));
        }

        report
    }

    /// Snapshot of the session's learned patterns
    pub fn patterns(&self, id: &str) -> Vec<Pattern> {
        let Some(session) = self.session(id) else {
            return Vec::new();
        };
        let patterns = session.lock().patterns.patterns().to_vec();
        patterns
    }

    /// Snapshot of the stored outcome for one test name
    pub fn memory(&self, id: &str, name: &str) -> Option<MemoryItem> {
        let session = self.session(id)?;
        let item = session.lock().memory(name).cloned();
        item
    }
}
