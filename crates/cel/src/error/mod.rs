//! Domain errors raised by the framework.
//!
//! Errors are `thiserror`-derived enums with structured context so callers
//! can match on the failure. [`CelError`] covers registration, namespace
//! mounting, dependency resolution and bootstrap; [`ComponentError`] covers
//! operations on a single component; [`RouteError`] explains why a route
//! string did not resolve; [`SelectorError`] rejects selectors the document
//! boundary cannot evaluate.

use thiserror::Error;

/// Errors arising from registration, resolution and bootstrap.
#[derive(Debug, Error)]
pub enum CelError {
    /// A component was registered with a blank name.
    #[error("component name must not be blank, got '{name}'")]
    InvalidName {
        /// Name that was rejected.
        name: String,
    },

    /// A component with the same name is already registered.
    #[error("component '{name}' is already registered")]
    DuplicateComponent {
        /// Name that was registered twice.
        name: String,
    },

    /// A route used for mounting is empty or has an empty segment.
    #[error("invalid route '{route}'")]
    InvalidRoute {
        /// Route that was rejected.
        route: String,
    },

    /// Mounting would replace an existing target or descend through one.
    #[error("route '{route}' conflicts with an existing namespace entry")]
    NamespaceConflict {
        /// Route that could not be mounted.
        route: String,
    },

    /// Bootstrap was run without a namespace.
    #[error("bootstrap requires a namespace for component routes")]
    MissingNamespace,

    /// A declared dependency names no registered component.
    #[error("component '{component}' depends on unregistered component '{dependency}'")]
    MissingDependency {
        /// Component declaring the dependency.
        component: String,
        /// Dependency name that did not resolve.
        dependency: String,
    },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle detected: {}", .path.join(" -> "))]
    DependencyCycle {
        /// Component names along the cycle, starting and ending with the
        /// same name.
        path: Vec<String>,
    },

    /// A component failed while being initialized as a dependency.
    #[error("failed to initialise component '{component}': {source}")]
    Initialization {
        /// Component that failed.
        component: String,
        /// Underlying component error.
        #[source]
        source: ComponentError,
    },
}

/// Errors arising from operations on a single component.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComponentError {
    /// The method exists but is not listed as exposed.
    #[error("method '{method}' is not exposed by component '{component}'")]
    NotExposed {
        /// Component name.
        component: String,
        /// Method that was requested.
        method: String,
    },

    /// No method with this name is configured.
    #[error("component '{component}' has no method '{method}'")]
    UnknownMethod {
        /// Component name.
        component: String,
        /// Method that was requested.
        method: String,
    },

    /// The state key was not declared in the component configuration.
    #[error("component '{component}' has no state key '{key}'")]
    UnknownState {
        /// Component name.
        component: String,
        /// State key that was written.
        key: String,
    },

    /// The named element binding is unknown or matched no element.
    #[error("component '{component}' has no bound element '{elem}'")]
    UnboundElement {
        /// Component name.
        component: String,
        /// Element binding name.
        elem: String,
    },

    /// The component is already borrowed by a running method, handler or
    /// initialization.
    #[error("component '{component}' is busy")]
    Busy {
        /// Component name.
        component: String,
    },
}

/// Reasons a route string failed to resolve against a namespace.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A segment (or the flat key) has no entry.
    #[error("route '{route}' does not resolve: no entry for '{segment}'")]
    Unresolved {
        /// Full route string.
        route: String,
        /// First segment with no entry.
        segment: String,
    },

    /// Descent reached a target before the last segment.
    #[error("route '{route}' descends through '{segment}', which is not a scope")]
    NotAScope {
        /// Full route string.
        route: String,
        /// Segment naming a target rather than a scope.
        segment: String,
    },

    /// The route names a scope rather than an initializable target.
    #[error("route '{route}' names a scope, not a component")]
    NotATarget {
        /// Full route string.
        route: String,
    },
}

/// Errors raised while parsing a selector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector is blank.
    #[error("selector must not be empty")]
    Empty,

    /// The selector uses syntax outside the supported compound form.
    #[error("unsupported selector '{selector}'")]
    Unsupported {
        /// Selector text.
        selector: String,
    },
}

#[cfg(test)]
mod tests;
