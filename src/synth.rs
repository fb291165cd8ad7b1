//! Rule-based test synthesis
//!
//! Every case follows a fixed template keyed to the kind of declaration, so a
//! suite is fully determined by the source text and the pattern store
//! contents at the start of the call.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::error::Result;
use crate::extract::{extract_from_tree, Extraction};
use crate::lang::parse_python;
use crate::patterns::PatternStore;
use crate::schema::{SourceUnit, TestCase, TestSuite, TEST_PREFIX};
use crate::utils::capitalize;

/// Imports every generated suite starts with
pub const BASE_IMPORTS: &[&str] = &["pytest", "unittest.mock"];

/// Key of the single fixture attached to every suite
pub const MOCK_FIXTURE_NAME: &str = "mock_dependencies";

const MOCK_FIXTURE_BODY: &str = "\
@pytest.fixture
def mock_dependencies():
    # Setup mocks
    yield
    # Teardown
";

/// Suite name used when the source declares nothing
pub const FALLBACK_SUITE_NAME: &str = "TestSuite";

const STRING_PLACEHOLDER: &str = "'test'";
const NUMBER_PLACEHOLDER: &str = "42";

/// Body of a suggested case nobody has written yet
pub const PENDING_BODY: &str = "raise NotImplementedError(\"suggested test not written yet\")";

const PLAIN_RESULT_ASSERTION: &str = "assert isinstance(result, (str, int, float, bool, list, dict))";

/// Generate a suite without any session state
pub fn analyze(source: &str) -> Result<TestSuite> {
    synthesize(source, None)
}

/// Generate a suite, consulting and feeding the given pattern store.
///
/// Suggestions are read before any generated case is learned, so a suite
/// never suggests tests learned from itself.
pub fn synthesize(source: &str, mut store: Option<&mut PatternStore>) -> Result<TestSuite> {
    let tree = parse_python(source)?;
    let extraction = extract_from_tree(&tree, source);

    let suggestions = store
        .as_deref()
        .map(|s| s.suggestions_for_tree(&tree, source))
        .unwrap_or_default();

    let mut cases = CaseList::default();

    for class in &extraction.classes {
        cases.push_learned(class_init_case(class), store.as_deref_mut());
        for method in &class.methods {
            for case in function_cases(method, Some(&class.name)) {
                cases.push_learned(case, store.as_deref_mut());
            }
        }
    }

    for func in extraction.module_functions() {
        for case in function_cases(func, None) {
            cases.push_learned(case, store.as_deref_mut());
        }
    }

    let suggested = suggestions.len();
    for suggestion in suggestions {
        let name = format!("{}suggested_{}", TEST_PREFIX, cases.len());
        cases.push(TestCase {
            name,
            description: suggestion,
            setup: None,
            body: PENDING_BODY.to_string(),
            assertions: Vec::new(),
            dependencies: BTreeSet::new(),
        });
    }

    let suite = TestSuite {
        class_name: suite_name(&extraction),
        description: suite_description(&extraction),
        test_cases: cases.into_cases(),
        imports: suite_imports(&extraction),
        fixtures: BTreeMap::from([(
            MOCK_FIXTURE_NAME.to_string(),
            MOCK_FIXTURE_BODY.to_string(),
        )]),
    };

    debug!(
        suite = %suite.class_name,
        classes = extraction.classes.len(),
        functions = extraction.functions.len(),
        cases = suite.test_cases.len(),
        suggested,
        "synthesized test suite"
    );

    Ok(suite)
}

/// Cases in generation order with names kept unique
#[derive(Default)]
struct CaseList {
    cases: Vec<TestCase>,
    names: HashSet<String>,
}

impl CaseList {
    fn len(&self) -> usize {
        self.cases.len()
    }

    fn push(&mut self, mut case: TestCase) {
        if self.names.contains(&case.name) {
            let base = case.name.clone();
            let mut n = 2;
            while self.names.contains(&format!("{}_{}", base, n)) {
                n += 1;
            }
            case.name = format!("{}_{}", base, n);
        }
        self.names.insert(case.name.clone());
        self.cases.push(case);
    }

    fn push_learned(&mut self, case: TestCase, store: Option<&mut PatternStore>) {
        self.push(case);
        if let (Some(store), Some(last)) = (store, self.cases.last()) {
            store.learn(last);
        }
    }

    fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }
}

fn class_init_case(class: &SourceUnit) -> TestCase {
    TestCase {
        name: format!("{}{}_initialization", TEST_PREFIX, class.name.to_lowercase()),
        description: format!("Tests initialization of class {}", class.name),
        setup: None,
        body: format!(
            "# Arrange\n# Act\ninstance = {}()\n# Assert\nassert instance is not None",
            class.name
        ),
        assertions: vec!["assert instance is not None".to_string()],
        dependencies: BTreeSet::new(),
    }
}

/// The basic-functionality and edge-case pair for a function or method
fn function_cases(func: &SourceUnit, owner: Option<&str>) -> [TestCase; 2] {
    let (stem, display, callee, setup, params) = match owner {
        Some(class) => {
            let params = match func.params.first().map(String::as_str) {
                Some("self") | Some("cls") => &func.params[1..],
                _ => &func.params[..],
            };
            (
                format!("{}_{}", class.to_lowercase(), func.name),
                format!("{}.{}", class, func.name),
                format!("instance.{}", func.name),
                Some(format!("instance = {}()", class)),
                params,
            )
        }
        None => (
            func.name.clone(),
            func.name.clone(),
            func.name.clone(),
            None,
            &func.params[..],
        ),
    };

    let args = placeholder_args(params.len());

    let mut basic_description = format!("Tests the basic functionality of {}", display);
    if func.complexity > 1 {
        basic_description.push_str(&format!(" (cyclomatic complexity {})", func.complexity));
    }

    let basic = TestCase {
        name: format!("{}{}_basic_functionality", TEST_PREFIX, stem),
        description: basic_description,
        setup: setup.clone(),
        body: format!(
            "# Arrange\n# Act\nresult = {}({})\n# Assert\nassert result is not None\n{}",
            callee, args, PLAIN_RESULT_ASSERTION
        ),
        assertions: vec![
            "assert result is not None".to_string(),
            PLAIN_RESULT_ASSERTION.to_string(),
        ],
        dependencies: BTreeSet::new(),
    };

    let edge = TestCase {
        name: format!("{}{}_edge_cases", TEST_PREFIX, stem),
        description: format!("Tests edge cases for {}", display),
        setup,
        body: format!(
            "# Arrange\nwith pytest.raises(Exception):\n    # Act\n    {}(None)",
            callee
        ),
        assertions: vec!["pytest.raises(Exception)".to_string()],
        dependencies: BTreeSet::new(),
    };

    [basic, edge]
}

/// First argument a string placeholder, every later one a number
fn placeholder_args(count: usize) -> String {
    (0..count)
        .map(|i| if i == 0 { STRING_PLACEHOLDER } else { NUMBER_PLACEHOLDER })
        .collect::<Vec<_>>()
        .join(", ")
}

fn suite_name(extraction: &Extraction) -> String {
    if let Some(class) = extraction.classes.first() {
        format!("Test{}", class.name)
    } else if let Some(func) = extraction.functions.first() {
        format!("Test{}", capitalize(&func.name))
    } else {
        FALLBACK_SUITE_NAME.to_string()
    }
}

fn suite_description(extraction: &Extraction) -> String {
    if extraction.is_empty() {
        return "Test suite for an empty module".to_string();
    }
    let elements: Vec<String> = extraction
        .classes
        .iter()
        .chain(&extraction.functions)
        .map(|unit| format!("{} {}", unit.kind.as_str(), unit.name))
        .collect();
    format!("Test suite for {}", elements.join(", "))
}

fn suite_imports(extraction: &Extraction) -> BTreeSet<String> {
    let mut imports: BTreeSet<String> = BASE_IMPORTS.iter().map(|s| s.to_string()).collect();
    for unit in extraction.classes.iter().chain(&extraction.functions) {
        imports.extend(unit.tooling_refs.iter().cloned());
    }
    imports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_args() {
        assert_eq!(placeholder_args(0), "");
        assert_eq!(placeholder_args(1), "'test'");
        assert_eq!(placeholder_args(3), "'test', 42, 42");
    }

    #[test]
    fn test_function_pair_invokes_positionally() {
        let suite = analyze("def add(a, b):\n    return a + b\n").unwrap();
        let basic = suite.case("test_add_basic_functionality").unwrap();
        assert!(basic.body.contains("result = add('test', 42)"));
        assert_eq!(basic.assertions.len(), 2);

        let edge = suite.case("test_add_edge_cases").unwrap();
        assert!(edge.body.contains("add(None)"));
        assert!(edge.body.contains("pytest.raises(Exception)"));
    }

    #[test]
    fn test_method_cases_drop_self_and_use_setup() {
        let src = "class Cart:\n    def add(self, item, qty):\n        pass\n";
        let suite = analyze(src).unwrap();
        assert_eq!(
            suite.case_names(),
            vec![
                "test_cart_initialization",
                "test_cart_add_basic_functionality",
                "test_cart_add_edge_cases",
            ]
        );
        let basic = suite.case("test_cart_add_basic_functionality").unwrap();
        assert_eq!(basic.setup.as_deref(), Some("instance = Cart()"));
        assert!(basic.body.contains("result = instance.add('test', 42)"));
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let src = "def run():\n    pass\n\ndef run():\n    pass\n";
        let suite = analyze(src).unwrap();
        assert_eq!(
            suite.case_names(),
            vec![
                "test_run_basic_functionality",
                "test_run_edge_cases",
                "test_run_basic_functionality_2",
                "test_run_edge_cases_2",
            ]
        );
    }

    #[test]
    fn test_complexity_annotates_description() {
        let src = "def pick(a):\n    if a:\n        return 1\n    return 2\n";
        let suite = analyze(src).unwrap();
        let basic = suite.case("test_pick_basic_functionality").unwrap();
        assert!(basic.description.ends_with("(cyclomatic complexity 2)"));
    }

    #[test]
    fn test_suite_name_capitalizes_function() {
        let suite = analyze("def parse_HTML(doc):\n    return doc\n").unwrap();
        assert_eq!(suite.class_name, "TestParse_html");
    }

    #[test]
    fn test_description_lists_units() {
        let src = "class A:\n    def m(self):\n        pass\n\ndef f():\n    pass\n";
        let suite = analyze(src).unwrap();
        assert_eq!(suite.description, "Test suite for class A, function m, function f");
    }
}
