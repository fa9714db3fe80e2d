//! Component wiring for server-rendered pages.
//!
//! `cel` connects small, named components to the elements of a document.
//! Components are declared with a [`ComponentConfig`] and registered with a
//! [`ComponentRegistry`], which returns a [`ComponentHandle`]. Handles are
//! mounted into a [`Namespace`] under dotted paths or flat keys.
//!
//! A [`Bootstrap`] run then does two passes:
//!
//! 1. The [`Router`] scans the document for elements carrying the routing
//!    attribute (`data-action` by default), resolves each value against the
//!    namespace and initializes the target with the element.
//! 2. The [`DependencyResolver`] walks the registry and wires each declared
//!    dependency into its dependent, initializing the dependency first if
//!    nothing has yet. No component is initialized twice.
//!
//! The document is reached through the [`dom::Document`] trait;
//! [`dom::MemoryDocument`] is an in-memory tree for hosts and tests. Timers
//! for debounced and throttled handlers come from a [`timing::Scheduler`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use cel::dom::{ElementRef, Event, MemoryDocument};
//! use cel::timing::ManualScheduler;
//! use cel::{
//!     Bootstrap, CelConfig, ComponentConfig, ComponentRegistry, EventBinding, Host, Namespace,
//! };
//! use serde_json::json;
//!
//! let button = ElementRef::new("button").with_attribute("id", "add");
//! let widget = ElementRef::new("div")
//!     .with_attribute("data-action", "SHOP.Cart")
//!     .with_child(button.clone());
//! let document = MemoryDocument::new(ElementRef::new("body").with_child(widget));
//!
//! let mut registry = ComponentRegistry::new();
//! let cart = registry
//!     .register(
//!         ComponentConfig::new("Cart")
//!             .elem("add", "#add")
//!             .state("items", json!(0))
//!             .handler("onAdd", |cart, _event| {
//!                 let items = cart.state("items").and_then(|v| v.as_i64()).unwrap_or(0);
//!                 cart.set_state("items", json!(items + 1)).expect("declared state");
//!             })
//!             .event(EventBinding::new("add", "click", "onAdd")),
//!     )
//!     .expect("register Cart");
//!
//! let mut namespace = Namespace::new();
//! namespace.mount_component("SHOP.Cart", &cart).expect("mount");
//!
//! let host = Host::new(&document, Rc::new(ManualScheduler::new()));
//! Bootstrap::new(CelConfig::default())
//!     .with_namespace(namespace)
//!     .run(&host, &registry)
//!     .expect("bootstrap");
//!
//! button.dispatch(&Event::new("click"));
//! assert_eq!(cart.context().expect("idle").state("items"), Some(&json!(1)));
//! ```

pub mod bootstrap;
pub mod component;
pub mod dom;
pub mod error;
pub mod lifecycle;
pub mod namespace;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod telemetry;
pub mod timing;

#[cfg(test)]
mod tests;

pub use cel_config::{CelConfig, ConfigError, DependencyPolicy, LogFormat};

pub use self::bootstrap::{Bootstrap, BootstrapReport};
pub use self::component::{Component, ComponentConfig, ComponentHandle, EventBinding};
pub use self::error::{CelError, ComponentError, RouteError};
pub use self::lifecycle::{Host, InitOutcome, Initializable};
pub use self::namespace::{Namespace, Route};
pub use self::registry::ComponentRegistry;
pub use self::resolver::{DependencyResolver, ResolutionReport};
pub use self::router::{RouteOutcome, RouteReport, Router};
