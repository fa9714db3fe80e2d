use crate::logging::LogFormat;
use crate::policy::DependencyPolicy;

/// Attribute that opts an element into routing.
pub const DEFAULT_ROUTE_ATTRIBUTE: &str = "data-action";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default routing attribute.
#[must_use]
pub fn default_route_attribute() -> String {
    DEFAULT_ROUTE_ATTRIBUTE.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default dependency policy.
#[must_use]
pub fn default_dependency_policy() -> DependencyPolicy {
    DependencyPolicy::Strict
}
