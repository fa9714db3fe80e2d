//! Shared configuration for the Cel component framework.
//!
//! [`CelConfig`] carries the settings the bootstrapper and telemetry layer
//! read at start-up: the attribute that opts elements into routing, how the
//! dependency resolver reacts to unresolved names, and the log filter and
//! output format. Every field has a default, so an empty JSON object is a
//! valid configuration.
//!
//! ```
//! use cel_config::{CelConfig, DependencyPolicy};
//!
//! let config = CelConfig::from_json_str(r#"{ "dependency_policy": "lenient" }"#)
//!     .expect("valid configuration");
//! assert_eq!(config.route_attribute(), "data-action");
//! assert_eq!(config.dependency_policy(), DependencyPolicy::Lenient);
//! ```

mod defaults;
mod logging;
mod policy;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_ROUTE_ATTRIBUTE, default_dependency_policy, default_log_filter,
    default_log_format, default_route_attribute,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::DependencyPolicy;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document was not valid JSON for [`CelConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The routing attribute is empty or contains whitespace.
    #[error("invalid routing attribute '{value}': must be non-empty and contain no whitespace")]
    InvalidRouteAttribute {
        /// The rejected attribute name.
        value: String,
    },

    /// The log filter expression is empty.
    #[error("log filter must not be empty")]
    EmptyLogFilter,
}

/// Framework configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CelConfig {
    #[serde(default = "default_route_attribute")]
    route_attribute: String,
    #[serde(default = "default_dependency_policy")]
    dependency_policy: DependencyPolicy,
    #[serde(default = "default_log_filter")]
    log_filter: String,
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Default for CelConfig {
    fn default() -> Self {
        Self {
            route_attribute: default_route_attribute(),
            dependency_policy: default_dependency_policy(),
            log_filter: default_log_filter(),
            log_format: default_log_format(),
        }
    }
}

impl CelConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// and the validation errors described on [`CelConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRouteAttribute`] when the routing
    /// attribute is blank or contains whitespace, and
    /// [`ConfigError::EmptyLogFilter`] when the log filter is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let attribute = self.route_attribute.as_str();
        if attribute.is_empty() || attribute.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidRouteAttribute {
                value: self.route_attribute.clone(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }

    /// Overrides the routing attribute.
    #[must_use]
    pub fn with_route_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.route_attribute = attribute.into();
        self
    }

    /// Overrides the dependency policy.
    #[must_use]
    pub const fn with_dependency_policy(mut self, policy: DependencyPolicy) -> Self {
        self.dependency_policy = policy;
        self
    }

    /// Overrides the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log output format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Attribute that opts an element into routing.
    #[must_use]
    pub fn route_attribute(&self) -> &str {
        self.route_attribute.as_str()
    }

    /// Policy applied to unresolved dependencies.
    #[must_use]
    pub const fn dependency_policy(&self) -> DependencyPolicy {
        self.dependency_policy
    }

    /// Log filter expression understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
