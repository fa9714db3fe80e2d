//! Unit tests for the component registry.

use rstest::{fixture, rstest};

use super::*;
use crate::error::CelError;

#[fixture]
fn populated_registry() -> ComponentRegistry {
    let mut r = ComponentRegistry::new();
    r.register(ComponentConfig::new("Store"))
        .expect("register Store");
    r.register(ComponentConfig::new("Cart").depends_on("Store"))
        .expect("register Cart");
    r.register(ComponentConfig::new("Header").depends_on("Store"))
        .expect("register Header");
    r
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn new_registry_is_empty() {
    let r = ComponentRegistry::new();
    assert!(r.is_empty());
    assert_eq!(r.len(), 0);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn register_returns_handle_for_lookup() {
    let mut r = ComponentRegistry::new();
    let handle = r
        .register(ComponentConfig::new("Store"))
        .expect("register");
    assert_eq!(r.len(), 1);
    let found = r.get("Store").expect("get Store");
    assert!(found.ptr_eq(&handle));
}

#[test]
fn register_rejects_duplicate() {
    let mut r = ComponentRegistry::new();
    r.register(ComponentConfig::new("Store"))
        .expect("first register");
    let err = r
        .register(ComponentConfig::new("Store"))
        .expect_err("duplicate should fail");
    assert!(matches!(err, CelError::DuplicateComponent { .. }));
    assert!(err.to_string().contains("already registered"));
    assert_eq!(r.len(), 1);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn register_rejects_blank_name(#[case] name: &str) {
    let mut r = ComponentRegistry::new();
    let err = r
        .register(ComponentConfig::new(name))
        .expect_err("blank name should fail");
    assert!(matches!(err, CelError::InvalidName { .. }));
    assert!(r.is_empty());
}

// ---------------------------------------------------------------------------
// Ordering and lookup
// ---------------------------------------------------------------------------

#[rstest]
fn iteration_follows_registration_order(populated_registry: ComponentRegistry) {
    let names: Vec<&str> = populated_registry.iter().map(|h| h.name()).collect();
    assert_eq!(names, ["Store", "Cart", "Header"]);
    let via_into_iter: Vec<&str> = (&populated_registry).into_iter().map(|h| h.name()).collect();
    assert_eq!(names, via_into_iter);
}

#[rstest]
fn get_returns_none_for_missing(populated_registry: ComponentRegistry) {
    assert!(populated_registry.get("Footer").is_none());
}

#[rstest]
fn len_reflects_registration_count(populated_registry: ComponentRegistry) {
    assert_eq!(populated_registry.len(), 3);
    assert_eq!(populated_registry.handles().len(), 3);
    assert!(!populated_registry.is_empty());
}

#[rstest]
fn failed_registration_keeps_existing_entries(mut populated_registry: ComponentRegistry) {
    populated_registry
        .register(ComponentConfig::new("Cart"))
        .expect_err("duplicate should fail");
    let names: Vec<&str> = populated_registry.iter().map(|h| h.name()).collect();
    assert_eq!(names, ["Store", "Cart", "Header"]);
}

#[rstest]
#[case::one(1)]
#[case::five(5)]
fn registry_holds_one_entry_per_construction(#[case] count: usize) {
    let mut r = ComponentRegistry::new();
    for i in 0..count {
        r.register(ComponentConfig::new(format!("C{i}")))
            .expect("register");
    }
    let names: Vec<String> = r.iter().map(|h| h.name().to_owned()).collect();
    let expected: Vec<String> = (0..count).map(|i| format!("C{i}")).collect();
    assert_eq!(names, expected);
}
