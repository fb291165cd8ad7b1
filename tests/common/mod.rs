//! Python fixtures and helpers shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;

use testwright::TestCase;

/// A module with no declarations at all
pub const EMPTY_MODULE: &str = "import os\n\nVALUE = 3\n";

/// One class without methods
pub const BARE_CLASS: &str = "class Widget:\n    pass\n";

/// A class with an initializer, an instance method and a class method
pub const SHOPPING_CART: &str = r#"
import pytest
from unittest.mock import patch


class ShoppingCart:
    """A cart of priced items."""

    def __init__(self):
        self.items = []

    def add_item(self, name, price):
        if price < 0:
            raise ValueError("negative price")
        self.items.append((name, price))

    @classmethod
    def from_items(cls, items):
        cart = cls()
        for name, price in items:
            cart.add_item(name, price)
        return cart


def total(cart, discount):
    subtotal = sum(price for _, price in cart.items)
    if discount and subtotal > 100:
        return subtotal * 0.9
    return subtotal


def send_receipt(cart):
    with patch("smtplib.SMTP"):
        return len(cart.items)
"#;

/// A module-level function with no parameters
pub const NO_PARAMS: &str = "def ping():\n    return 'pong'\n";

/// A well-formed, documented, isolated test
pub const GOOD_TEST: &str = r#"
from unittest.mock import MagicMock

def test_total_applies_discount():
    """Totals over 100 get ten percent off."""
    cart = MagicMock()
    cart.items = [("a", 60), ("b", 60)]
    assert total(cart, True) == 108.0
"#;

/// A test with three defects: external call without mocks, a non-test
/// helper, and no docstring anywhere
pub const THREE_DEFECTS: &str = r#"
def helper():
    return 1

def test_fetch():
    response = client.get("/items")
    assert response.status == helper()
"#;

/// Text that does not parse
pub const BROKEN: &str = "def test_broken(:\n    assert True\n";

/// Build a candidate test with `count` functions that break the naming
/// convention, giving exactly `count` naming issues plus missing asserts and
/// docstrings
pub fn misnamed_functions(count: usize) -> String {
    (0..count)
        .map(|i| format!("def helper_{}():\n    pass\n", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A function body with `asserts` assertions, optionally declaring setUp
pub fn function_with_asserts(asserts: usize, with_setup: bool) -> String {
    let mut source = String::from("def check(value):\n");
    if with_setup {
        source.push_str("    def setUp():\n        pass\n");
    }
    for i in 0..asserts {
        source.push_str(&format!("    assert value != {}\n", i));
    }
    if asserts == 0 && !with_setup {
        source.push_str("    return value\n");
    }
    source
}

/// A learned-from case with the given shape
pub fn case_with_shape(name: &str, assertions: usize, setup: bool) -> TestCase {
    TestCase {
        name: name.to_string(),
        description: format!("the behavior covered by {}", name),
        setup: setup.then(|| "instance = Thing()".to_string()),
        body: "pass".to_string(),
        assertions: (0..assertions).map(|i| format!("assert x != {}", i)).collect(),
        dependencies: BTreeSet::new(),
    }
}
