//! Document router: initializes components named by element attributes.
//!
//! The router scans the document once, in document order, for elements
//! carrying the routing attribute (`data-action` by default). Each value is
//! parsed as a [`Route`] and resolved against the [`Namespace`]; the target
//! is initialized with the element. A route that fails to resolve is logged
//! and recorded, and the scan moves on to the next element.


use cel_config::CelConfig;
use tracing::{debug, warn};

use crate::dom::ElementRef;
use crate::error::{ComponentError, RouteError};
use crate::lifecycle::{Host, InitOutcome};
use crate::namespace::{Namespace, Route};

/// Tracing target for routing.
const ROUTER_TARGET: &str = "cel::router";

/// What happened to one routed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The target was initialized with this element.
    Initialized,
    /// The target had already been initialized by an earlier element.
    AlreadyInitialized,
    /// The attribute was present but empty.
    Skipped,
    /// The route did not name a target.
    Unresolved(RouteError),
    /// The target was found but its initialization failed.
    Failed(ComponentError),
}

/// A single routed element and its outcome.
#[derive(Debug, Clone)]
pub struct RouteVisit {
    element: ElementRef,
    route: String,
    outcome: RouteOutcome,
}

impl RouteVisit {
    /// Element carrying the routing attribute.
    #[must_use]
    pub const fn element(&self) -> &ElementRef {
        &self.element
    }

    /// Raw attribute value.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Result of resolving and initializing.
    #[must_use]
    pub const fn outcome(&self) -> &RouteOutcome {
        &self.outcome
    }
}

/// Visits produced by one routing pass, in document order.
#[derive(Debug, Clone, Default)]
pub struct RouteReport {
    visits: Vec<RouteVisit>,
}

impl RouteReport {
    /// All visits in document order.
    #[must_use]
    pub fn visits(&self) -> &[RouteVisit] {
        &self.visits
    }

    /// Number of elements whose target was initialized by this pass.
    #[must_use]
    pub fn initialized(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Initialized))
    }

    /// Number of elements whose route did not resolve.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Unresolved(_)))
    }

    /// Number of elements whose target failed to initialize.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&RouteOutcome) -> bool) -> usize {
        self.visits
            .iter()
            .filter(|visit| predicate(&visit.outcome))
            .count()
    }
}

/// Scans a document for routed elements.
#[derive(Debug, Clone)]
pub struct Router {
    attribute: String,
}

impl Router {
    /// Creates a router reading `attribute`.
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Creates a router reading the configured attribute.
    #[must_use]
    pub fn from_config(config: &CelConfig) -> Self {
        Self::new(config.route_attribute())
    }

    /// Attribute this router reads.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Visits every element carrying the routing attribute, in document
    /// order, and initializes its target with the element.
    ///
    /// Resolution and initialization failures are recorded in the report;
    /// they never stop the scan.
    pub fn route(&self, host: &Host<'_>, namespace: &Namespace) -> RouteReport {
        let visits = host
            .document()
            .elements_with_attribute(&self.attribute)
            .into_iter()
            .map(|element| self.visit(host, namespace, element))
            .collect::<Vec<_>>();
        debug!(
            target: ROUTER_TARGET,
            attribute = %self.attribute,
            visited = visits.len(),
            "routing pass complete"
        );
        RouteReport { visits }
    }

    fn visit(&self, host: &Host<'_>, namespace: &Namespace, element: ElementRef) -> RouteVisit {
        let route = element.attribute(&self.attribute).unwrap_or_default();
        let outcome = Self::dispatch(host, namespace, &element, &route);
        RouteVisit {
            element,
            route,
            outcome,
        }
    }

    fn dispatch(
        host: &Host<'_>,
        namespace: &Namespace,
        element: &ElementRef,
        route: &str,
    ) -> RouteOutcome {
        let Some(parsed) = Route::parse(route) else {
            debug!(target: ROUTER_TARGET, tag = element.tag(), "empty route skipped");
            return RouteOutcome::Skipped;
        };
        let target = match namespace.resolve(&parsed) {
            Ok(target) => target,
            Err(err) => {
                warn!(
                    target: ROUTER_TARGET,
                    route,
                    error = %err,
                    "route does not resolve; element skipped"
                );
                return RouteOutcome::Unresolved(err);
            }
        };
        match target.init(host, Some(element)) {
            Ok(InitOutcome::Initialized) => {
                debug!(target: ROUTER_TARGET, route, "routed target initialised");
                RouteOutcome::Initialized
            }
            Ok(InitOutcome::AlreadyInitialized) => RouteOutcome::AlreadyInitialized,
            Err(err) => {
                warn!(
                    target: ROUTER_TARGET,
                    route,
                    error = %err,
                    "routed target failed to initialise"
                );
                RouteOutcome::Failed(err)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::from_config(&CelConfig::default())
    }
}
