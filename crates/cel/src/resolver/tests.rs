//! Unit tests for dependency resolution.

use std::rc::Rc;

use rstest::{fixture, rstest};

use super::*;
use crate::component::{ComponentConfig, EventBinding};
use crate::dom::{ElementRef, MemoryDocument};
use crate::timing::ManualScheduler;

struct Page {
    document: MemoryDocument,
    scheduler: Rc<ManualScheduler>,
    button: ElementRef,
}

impl Page {
    fn host(&self) -> Host<'_> {
        Host::new(&self.document, self.scheduler.clone())
    }
}

#[fixture]
fn page() -> Page {
    let button = ElementRef::new("button").with_attribute("id", "refresh");
    Page {
        document: MemoryDocument::new(ElementRef::new("body").with_child(button.clone())),
        scheduler: Rc::new(ManualScheduler::new()),
        button,
    }
}

/// `Store` binds a click listener on init, so the listener count on the
/// button tells how many times it was initialized.
fn store() -> ComponentConfig {
    ComponentConfig::new("Store")
        .elem("refresh", "#refresh")
        .handler("onRefresh", |_, _| {})
        .event(EventBinding::new("refresh", "click", "onRefresh"))
}

#[fixture]
fn shop() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.register(store()).expect("register Store");
    registry
        .register(ComponentConfig::new("Cart").depends_on("Store"))
        .expect("register Cart");
    registry
        .register(ComponentConfig::new("Header").depends_on("Store"))
        .expect("register Header");
    registry
}

fn handle<'a>(registry: &'a ComponentRegistry, name: &str) -> &'a ComponentHandle {
    registry.get(name).expect("registered component")
}

fn edge_names(edges: &[DependencyEdge]) -> Vec<(&str, &str)> {
    edges
        .iter()
        .map(|edge| (edge.component(), edge.dependency()))
        .collect()
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

#[rstest]
fn shared_dependency_is_wired_and_initialized_once(page: Page, shop: ComponentRegistry) {
    let report = DependencyResolver::default()
        .resolve(&page.host(), &shop)
        .expect("resolve");

    let store = handle(&shop, "Store");
    let wired = handle(&shop, "Cart").dependency("Store").expect("wired");
    assert!(wired.ptr_eq(store));
    assert!(
        handle(&shop, "Header")
            .dependency("Store")
            .is_some_and(|dep| dep.ptr_eq(store))
    );
    assert_eq!(report.initialized(), ["Store"]);
    assert_eq!(
        edge_names(report.wired()),
        [("Cart", "Store"), ("Header", "Store")]
    );
    assert_eq!(page.button.listener_count("click"), 1);
}

#[rstest]
fn resolving_twice_initializes_nothing_new(page: Page, shop: ComponentRegistry) {
    let resolver = DependencyResolver::default();
    resolver.resolve(&page.host(), &shop).expect("first pass");

    let report = resolver.resolve(&page.host(), &shop).expect("second pass");

    assert!(report.initialized().is_empty());
    assert_eq!(report.wired().len(), 2);
    assert_eq!(page.button.listener_count("click"), 1);
    assert_eq!(
        handle(&shop, "Cart")
            .context()
            .expect("not busy")
            .wired_dependencies()
            .len(),
        1
    );
}

#[rstest]
fn already_initialized_dependency_is_attached_without_init(page: Page, shop: ComponentRegistry) {
    let store = handle(&shop, "Store");
    store.init(&page.host(), None).expect("routed init");

    let report = DependencyResolver::default()
        .resolve(&page.host(), &shop)
        .expect("resolve");

    assert!(report.initialized().is_empty());
    assert!(handle(&shop, "Cart").dependency("Store").is_some());
    assert_eq!(page.button.listener_count("click"), 1);
}

#[rstest]
fn dependents_are_not_initialized_by_resolution(page: Page, shop: ComponentRegistry) {
    DependencyResolver::default()
        .resolve(&page.host(), &shop)
        .expect("resolve");
    assert!(!handle(&shop, "Cart").is_initialized());
    assert!(!handle(&shop, "Header").is_initialized());
}

#[rstest]
fn chained_dependencies_follow_registration_order(page: Page) {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("View").depends_on("Cart"))
        .expect("register View");
    registry
        .register(ComponentConfig::new("Cart").depends_on("Store"))
        .expect("register Cart");
    registry.register(store()).expect("register Store");

    let report = DependencyResolver::default()
        .resolve(&page.host(), &registry)
        .expect("resolve");

    assert_eq!(report.initialized(), ["Cart", "Store"]);
    assert_eq!(
        edge_names(report.wired()),
        [("View", "Cart"), ("Cart", "Store")]
    );
}

// ---------------------------------------------------------------------------
// Missing dependencies
// ---------------------------------------------------------------------------

#[rstest]
fn strict_policy_reports_missing_dependency_after_wiring(
    page: Page,
    mut shop: ComponentRegistry,
) {
    shop.register(ComponentConfig::new("Footer").depends_on("Api"))
        .expect("register Footer");

    let err = DependencyResolver::new(DependencyPolicy::Strict)
        .resolve(&page.host(), &shop)
        .expect_err("Api is not registered");

    assert!(matches!(
        &err,
        CelError::MissingDependency { component, dependency }
            if component == "Footer" && dependency == "Api"
    ));
    let store = handle(&shop, "Store");
    assert!(
        handle(&shop, "Cart")
            .dependency("Store")
            .is_some_and(|dep| dep.ptr_eq(store))
    );
    assert!(store.is_initialized());
}

#[rstest]
fn strict_policy_reports_first_missing_dependency(page: Page) {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("Header").depends_on("Api"))
        .expect("register Header");
    registry
        .register(ComponentConfig::new("Footer").depends_on("Cdn"))
        .expect("register Footer");

    let err = DependencyResolver::new(DependencyPolicy::Strict)
        .resolve(&page.host(), &registry)
        .expect_err("nothing is registered");

    assert!(matches!(
        &err,
        CelError::MissingDependency { component, dependency }
            if component == "Header" && dependency == "Api"
    ));
}

#[rstest]
fn lenient_policy_leaves_missing_dependency_unset(page: Page, mut shop: ComponentRegistry) {
    shop.register(
        ComponentConfig::new("Footer")
            .depends_on("Api")
            .depends_on("Store"),
    )
    .expect("register Footer");

    let report = DependencyResolver::new(DependencyPolicy::Lenient)
        .resolve(&page.host(), &shop)
        .expect("lenient resolution succeeds");

    let footer = handle(&shop, "Footer");
    assert!(footer.dependency("Api").is_none());
    assert!(footer.dependency("Store").is_some());
    assert_eq!(edge_names(report.unresolved()), [("Footer", "Api")]);
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

fn cyclic() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("A").depends_on("B"))
        .expect("register A");
    registry
        .register(ComponentConfig::new("B").depends_on("C"))
        .expect("register B");
    registry
        .register(ComponentConfig::new("C").depends_on("A"))
        .expect("register C");
    registry
}

#[rstest]
fn strict_policy_rejects_cycles(page: Page) {
    let registry = cyclic();

    let err = DependencyResolver::default()
        .resolve(&page.host(), &registry)
        .expect_err("cycle");

    assert!(matches!(
        &err,
        CelError::DependencyCycle { path } if path == &["A", "B", "C", "A"]
    ));
    assert_eq!(err.to_string(), "dependency cycle detected: A -> B -> C -> A");
    assert!(registry.iter().all(|h| !h.is_initialized()));
}

#[rstest]
fn self_dependency_is_a_cycle(page: Page) {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("Loop").depends_on("Loop"))
        .expect("register Loop");

    let err = DependencyResolver::default()
        .resolve(&page.host(), &registry)
        .expect_err("self cycle");

    assert!(matches!(
        &err,
        CelError::DependencyCycle { path } if path == &["Loop", "Loop"]
    ));
}

#[rstest]
fn lenient_policy_wires_cycles(page: Page) {
    let registry = cyclic();

    let report = DependencyResolver::new(DependencyPolicy::Lenient)
        .resolve(&page.host(), &registry)
        .expect("lenient resolution succeeds");

    assert_eq!(report.wired().len(), 3);
    assert_eq!(report.initialized(), ["B", "C", "A"]);
}

#[test]
fn diamond_is_not_a_cycle() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("App").depends_on("Left").depends_on("Right"))
        .expect("register App");
    registry
        .register(ComponentConfig::new("Left").depends_on("Base"))
        .expect("register Left");
    registry
        .register(ComponentConfig::new("Right").depends_on("Base"))
        .expect("register Right");
    registry
        .register(ComponentConfig::new("Base"))
        .expect("register Base");

    assert!(find_cycle(&registry).is_none());
}

#[test]
fn long_dependency_chain_is_walked_without_recursion() {
    const LINKS: usize = 50_000;
    let mut registry = ComponentRegistry::new();
    for link in 0..LINKS {
        let config = ComponentConfig::new(format!("Link{link}"))
            .depends_on(format!("Link{}", link + 1));
        registry.register(config).expect("register link");
    }
    registry
        .register(ComponentConfig::new(format!("Link{LINKS}")).depends_on("Link0"))
        .expect("register closing link");

    let path = find_cycle(&registry).expect("chain closes into a cycle");

    assert_eq!(path.len(), LINKS + 2);
    assert_eq!(path.first().map(String::as_str), Some("Link0"));
    assert_eq!(path.last().map(String::as_str), Some("Link0"));
}

#[test]
fn cycle_through_unregistered_name_is_not_reported() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(ComponentConfig::new("A").depends_on("Ghost").depends_on("B"))
        .expect("register A");
    registry
        .register(ComponentConfig::new("B"))
        .expect("register B");

    assert!(find_cycle(&registry).is_none());
}

#[test]
fn resolver_reads_policy_from_config() {
    let config = CelConfig::default().with_dependency_policy(DependencyPolicy::Lenient);
    assert_eq!(
        DependencyResolver::from_config(&config).policy(),
        DependencyPolicy::Lenient
    );
    assert_eq!(
        DependencyResolver::default().policy(),
        DependencyPolicy::Strict
    );
}
