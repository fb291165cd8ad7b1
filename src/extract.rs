//! Structural extraction of testable units
//!
//! Walks a parsed Python tree depth-first and yields every class and every
//! function declaration, nested ones included, in the order they are first
//! reached. Input that does not parse fails before any unit is produced.

use std::collections::BTreeSet;

use tree_sitter::{Node, Tree};

use crate::analysis::cyclomatic_complexity;
use crate::detectors::common::{body_statements, definition_name, get_node_text, line_of, visit_all};
use crate::error::Result;
use crate::lang::parse_python;
use crate::schema::{SourceUnit, UnitKind, UnitScope};

/// Identifiers that mark a unit as relying on test tooling
pub const TOOLING_NAMES: &[&str] = &["pytest", "mock", "patch"];

/// Classes and functions found in one source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub classes: Vec<SourceUnit>,
    /// Every function declaration, methods and nested functions included
    pub functions: Vec<SourceUnit>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }

    /// Functions declared directly in the module
    pub fn module_functions(&self) -> impl Iterator<Item = &SourceUnit> {
        self.functions.iter().filter(|f| f.is_module_level())
    }
}

/// Parse source text and extract its units
pub fn extract(source: &str) -> Result<Extraction> {
    let tree = parse_python(source)?;
    Ok(extract_from_tree(&tree, source))
}

/// Extract units from an already parsed tree
pub fn extract_from_tree(tree: &Tree, source: &str) -> Extraction {
    let mut extraction = Extraction::default();

    visit_all(&tree.root_node(), |node| match node.kind() {
        "class_definition" => {
            if let Some(unit) = class_unit(node, source) {
                extraction.classes.push(unit);
            }
        }
        "function_definition" => {
            if let Some(unit) = function_unit(node, source) {
                extraction.functions.push(unit);
            }
        }
        _ => {}
    });

    extraction
}

fn class_unit(node: &Node, source: &str) -> Option<SourceUnit> {
    let name = definition_name(node, source)?;

    let methods = body_statements(node)
        .iter()
        .filter(|stmt| stmt.kind() == "function_definition")
        .filter_map(|stmt| function_unit(stmt, source))
        .collect();

    Some(SourceUnit {
        kind: UnitKind::Class,
        name,
        line: line_of(node),
        scope: scope_of(node, source),
        params: Vec::new(),
        methods,
        complexity: cyclomatic_complexity(node),
        tooling_refs: tooling_refs(node, source),
    })
}

fn function_unit(node: &Node, source: &str) -> Option<SourceUnit> {
    Some(SourceUnit {
        kind: UnitKind::Function,
        name: definition_name(node, source)?,
        line: line_of(node),
        scope: scope_of(node, source),
        params: positional_params(node, source),
        methods: Vec::new(),
        complexity: cyclomatic_complexity(node),
        tooling_refs: tooling_refs(node, source),
    })
}

/// Classify a definition by its nearest enclosing definition.
///
/// Module-level `if`/`try`/`with` blocks do not count, so a fallback `def`
/// under `except ImportError:` is still module level.
fn scope_of(node: &Node, source: &str) -> UnitScope {
    let mut ancestor = node.parent();
    while let Some(current) = ancestor {
        match current.kind() {
            "function_definition" => return UnitScope::Nested,
            "class_definition" => {
                return UnitScope::Method {
                    class: definition_name(&current, source).unwrap_or_default(),
                }
            }
            _ => ancestor = current.parent(),
        }
    }
    UnitScope::Module
}

/// Positional parameter names, stopping at `*args`, bare `*` or `**kwargs`
fn positional_params(node: &Node, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let name = match param.kind() {
            "identifier" => Some(param),
            "default_parameter" | "typed_default_parameter" => param.child_by_field_name("name"),
            "typed_parameter" => {
                let mut inner = param.walk();
                let first = param.named_children(&mut inner).next();
                first
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => continue,
        };

        match name {
            Some(n) if n.kind() == "identifier" => names.push(get_node_text(&n, source)),
            _ => break,
        }
    }
    names
}

/// Whitelisted tooling names used as plain name references inside a unit
fn tooling_refs(node: &Node, source: &str) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    visit_all(node, |n| {
        if n.kind() == "identifier" && is_name_reference(n) {
            let text = get_node_text(n, source);
            if TOOLING_NAMES.contains(&text.as_str()) {
                refs.insert(text);
            }
        }
    });
    refs
}

/// Whether an identifier is read as a variable rather than declaring one,
/// naming an attribute, or spelling an import path
fn is_name_reference(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    let is_field = |field: &str| parent.child_by_field_name(field) == Some(*node);

    match parent.kind() {
        "dotted_name" | "aliased_import" | "parameters" | "typed_parameter" => false,
        "attribute" => !is_field("attribute"),
        "function_definition" | "class_definition" | "default_parameter"
        | "typed_default_parameter" | "keyword_argument" => !is_field("name"),
        _ => true,
    }
}
