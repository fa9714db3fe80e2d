//! Crate-level integration and BDD tests.

use std::rc::Rc;

use crate::bootstrap::Bootstrap;
use crate::component::{ComponentConfig, EventBinding};
use crate::dom::{ElementRef, Event, MemoryDocument};
use crate::lifecycle::{Host, Initializable};
use crate::namespace::Namespace;
use crate::registry::ComponentRegistry;
use crate::timing::ManualScheduler;
use cel_config::CelConfig;


/// Event used to count how many times a component bound its listeners.
pub(crate) const PROBE_EVENT: &str = "probe";

/// Configuration for a component that binds one probe listener to the
/// element with id `name`.
pub(crate) fn probed(name: &str) -> ComponentConfig {
    ComponentConfig::new(name)
        .elem("probe", format!("#{name}"))
        .handler("onProbe", |_, _| {})
        .event(EventBinding::new("probe", PROBE_EVENT, "onProbe"))
}

#[test]
fn end_to_end_bootstrap_with_memory_document() {
    let store_probe = ElementRef::new("span").with_attribute("id", "Store");
    let cart_probe = ElementRef::new("span").with_attribute("id", "Cart");
    let cart_root = ElementRef::new("section")
        .with_attribute("data-action", "APP.Cart")
        .with_child(cart_probe.clone());
    let document = MemoryDocument::new(
        ElementRef::new("body")
            .with_child(store_probe.clone())
            .with_child(cart_root.clone()),
    );

    let mut registry = ComponentRegistry::new();
    let store = registry.register(probed("Store")).expect("register Store");
    let cart = registry
        .register(probed("Cart").depends_on("Store"))
        .expect("register Cart");
    let mut namespace = Namespace::new();
    namespace.mount_component("APP.Cart", &cart).expect("mount");

    let host = Host::new(&document, Rc::new(ManualScheduler::new()));
    let report = Bootstrap::new(CelConfig::default())
        .with_namespace(namespace)
        .run(&host, &registry)
        .expect("bootstrap");

    assert_eq!(report.routes().initialized(), 1);
    assert!(store.is_initialized());
    assert_eq!(store_probe.listener_count(PROBE_EVENT), 1);
    assert_eq!(cart_probe.listener_count(PROBE_EVENT), 1);
    assert_eq!(cart_probe.dispatch(&Event::new(PROBE_EVENT)), 1);
    assert_eq!(
        cart.context().expect("idle").mount(),
        Some(&cart_root)
    );
}
