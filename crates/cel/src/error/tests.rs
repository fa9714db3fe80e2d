//! Unit tests for error types.

use rstest::rstest;

use super::*;

#[test]
fn duplicate_component_message_includes_name() {
    let error = CelError::DuplicateComponent {
        name: "Widget".into(),
    };
    let message = error.to_string();
    assert!(
        message.contains("Widget"),
        "expected name in message: {message}"
    );
    assert!(
        message.contains("already registered"),
        "expected reason in message: {message}"
    );
}

#[test]
fn dependency_cycle_message_joins_path() {
    let error = CelError::DependencyCycle {
        path: vec!["A".into(), "B".into(), "A".into()],
    };
    assert_eq!(error.to_string(), "dependency cycle detected: A -> B -> A");
}

#[test]
fn initialization_error_exposes_source() {
    use std::error::Error as _;

    let error = CelError::Initialization {
        component: "Store".into(),
        source: ComponentError::Busy {
            component: "Store".into(),
        },
    };
    let source = error.source().expect("source should be present");
    assert!(source.to_string().contains("busy"));
}

#[rstest]
#[case::missing_dependency(
    CelError::MissingDependency {
        component: "Cart".into(),
        dependency: "Store".into(),
    },
    "Store"
)]
#[case::namespace_conflict(
    CelError::NamespaceConflict {
        route: "APP.Widget".into(),
    },
    "APP.Widget"
)]
#[case::invalid_route(
    CelError::InvalidRoute {
        route: "APP..Widget".into(),
    },
    "APP..Widget"
)]
fn error_message_includes_subject(#[case] error: CelError, #[case] expected: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected),
        "expected {expected} in message: {message}"
    );
}

#[rstest]
#[case::unresolved(
    RouteError::Unresolved {
        route: "APP.Missing".into(),
        segment: "Missing".into(),
    },
    "no entry for 'Missing'"
)]
#[case::not_a_scope(
    RouteError::NotAScope {
        route: "Widget.init".into(),
        segment: "Widget".into(),
    },
    "not a scope"
)]
#[case::not_a_target(
    RouteError::NotATarget {
        route: "APP".into(),
    },
    "names a scope"
)]
fn route_error_messages_explain_failure(#[case] error: RouteError, #[case] expected: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected),
        "expected {expected} in message: {message}"
    );
}
