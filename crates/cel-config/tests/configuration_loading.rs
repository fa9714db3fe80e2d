//! Loading and validation tests for `CelConfig`.

use std::str::FromStr;

use cel_config::{CelConfig, ConfigError, DependencyPolicy, LogFormat};
use rstest::rstest;

#[test]
fn empty_document_yields_defaults() {
    let config = CelConfig::from_json_str("{}").expect("empty object is valid");
    assert_eq!(config, CelConfig::default());
    assert_eq!(config.route_attribute(), "data-action");
    assert_eq!(config.dependency_policy(), DependencyPolicy::Strict);
    assert_eq!(config.log_filter(), "info");
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[test]
fn explicit_fields_override_defaults() {
    let config = CelConfig::from_json_str(
        r#"{
            "route_attribute": "data-component",
            "dependency_policy": "lenient",
            "log_filter": "cel=debug",
            "log_format": "json"
        }"#,
    )
    .expect("valid configuration");
    assert_eq!(config.route_attribute(), "data-component");
    assert_eq!(config.dependency_policy(), DependencyPolicy::Lenient);
    assert_eq!(config.log_filter(), "cel=debug");
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = CelConfig::from_json_str(r#"{ "namespace": "APP" }"#)
        .expect_err("unknown field should fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[rstest]
#[case::empty("")]
#[case::inner_space("data action")]
#[case::trailing_tab("data-action\t")]
fn invalid_route_attributes_are_rejected(#[case] attribute: &str) {
    let err = CelConfig::default()
        .with_route_attribute(attribute)
        .validate()
        .expect_err("attribute should be rejected");
    assert!(matches!(err, ConfigError::InvalidRouteAttribute { .. }));
}

#[test]
fn blank_log_filter_is_rejected() {
    let err = CelConfig::default()
        .with_log_filter("   ")
        .validate()
        .expect_err("blank filter should be rejected");
    assert!(matches!(err, ConfigError::EmptyLogFilter));
}

#[rstest]
#[case::lower("strict", DependencyPolicy::Strict)]
#[case::upper("LENIENT", DependencyPolicy::Lenient)]
fn dependency_policy_parses_case_insensitively(
    #[case] text: &str,
    #[case] expected: DependencyPolicy,
) {
    assert_eq!(DependencyPolicy::from_str(text).expect("parse"), expected);
}

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::compact("Compact", LogFormat::Compact)]
fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
    assert_eq!(LogFormat::from_str(text).expect("parse"), expected);
}

#[test]
fn builder_overrides_round_trip_through_accessors() {
    let config = CelConfig::default()
        .with_dependency_policy(DependencyPolicy::Lenient)
        .with_log_format(LogFormat::Json);
    assert!(!config.dependency_policy().is_strict());
    assert_eq!(config.log_format().to_string(), "json");
}
