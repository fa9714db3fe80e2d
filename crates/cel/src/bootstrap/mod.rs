//! Bootstrap entry point: route the document, then wire dependencies.


use cel_config::CelConfig;
use tracing::{info, warn};

use crate::error::CelError;
use crate::lifecycle::Host;
use crate::namespace::Namespace;
use crate::registry::ComponentRegistry;
use crate::resolver::{DependencyResolver, ResolutionReport};
use crate::router::{RouteReport, Router};

/// Tracing target for bootstrap runs.
const BOOTSTRAP_TARGET: &str = "cel::bootstrap";

/// Combined result of a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    routes: RouteReport,
    resolution: ResolutionReport,
}

impl BootstrapReport {
    /// Routing pass over the document.
    #[must_use]
    pub const fn routes(&self) -> &RouteReport {
        &self.routes
    }

    /// Dependency resolution pass over the registry.
    #[must_use]
    pub const fn resolution(&self) -> &ResolutionReport {
        &self.resolution
    }
}

/// One-shot bootstrap of a page.
///
/// [`run`](Self::run) consumes the bootstrap, so a page is scanned at most
/// once per value. Elements added to the document afterwards are not
/// routed.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
///
/// use cel::dom::{ElementRef, MemoryDocument};
/// use cel::timing::ManualScheduler;
/// use cel::{Bootstrap, CelConfig, ComponentConfig, ComponentRegistry, Host, Namespace};
///
/// let mut registry = ComponentRegistry::new();
/// let store = registry.register(ComponentConfig::new("Store")).expect("register");
/// let cart = registry
///     .register(ComponentConfig::new("Cart").depends_on("Store"))
///     .expect("register");
///
/// let mut namespace = Namespace::new();
/// namespace.mount_component("APP.Cart", &cart).expect("mount");
///
/// let document = MemoryDocument::new(
///     ElementRef::new("body")
///         .with_child(ElementRef::new("div").with_attribute("data-action", "APP.Cart")),
/// );
/// let host = Host::new(&document, Rc::new(ManualScheduler::new()));
///
/// let report = Bootstrap::new(CelConfig::default())
///     .with_namespace(namespace)
///     .run(&host, &registry)
///     .expect("bootstrap succeeds");
///
/// assert_eq!(report.routes().initialized(), 1);
/// assert!(cart.dependency("Store").is_some_and(|dep| dep.ptr_eq(&store)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    config: CelConfig,
    namespace: Option<Namespace>,
}

impl Bootstrap {
    /// Creates a bootstrap with no namespace.
    #[must_use]
    pub const fn new(config: CelConfig) -> Self {
        Self {
            config,
            namespace: None,
        }
    }

    /// Supplies the namespace routes resolve against.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Configuration this bootstrap runs with.
    #[must_use]
    pub const fn config(&self) -> &CelConfig {
        &self.config
    }

    /// Routes the document, then resolves dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`CelError::MissingNamespace`] without touching the document
    /// when no namespace was supplied, and propagates resolver errors. A
    /// resolver error leaves routed components initialized and every
    /// resolvable dependency wired.
    pub fn run(
        self,
        host: &Host<'_>,
        registry: &ComponentRegistry,
    ) -> Result<BootstrapReport, CelError> {
        let Self { config, namespace } = self;
        let Some(namespace) = namespace else {
            warn!(
                target: BOOTSTRAP_TARGET,
                "no namespace supplied; components will not be routed"
            );
            return Err(CelError::MissingNamespace);
        };

        let routes = Router::from_config(&config).route(host, &namespace);
        let resolution = DependencyResolver::from_config(&config)
            .resolve(host, registry)
            .inspect_err(|error| {
                warn!(
                    target: BOOTSTRAP_TARGET,
                    routed = routes.visits().len(),
                    initialised = routes.initialized(),
                    unresolved_routes = routes.unresolved(),
                    %error,
                    "dependency resolution failed after routing"
                );
            })?;
        info!(
            target: BOOTSTRAP_TARGET,
            routed = routes.visits().len(),
            initialised = routes.initialized(),
            unresolved_routes = routes.unresolved(),
            wired = resolution.wired().len(),
            components = registry.len(),
            "bootstrap complete"
        );
        Ok(BootstrapReport { routes, resolution })
    }
}
