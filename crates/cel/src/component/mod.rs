//! Component configuration and instances.
//!
//! A [`ComponentConfig`] declares a component: its name, the components it
//! depends on, the elements it binds by selector, its methods and event
//! handlers, its state keys and which methods it exposes. Registering the
//! configuration builds a [`Component`] and returns a [`ComponentHandle`],
//! the only form callers hold.
//!
//! Initialization resolves element bindings against the document and
//! attaches event listeners, wrapping handlers with debounce or throttle when
//! an [`EventBinding`] asks for it. Methods and handlers receive the
//! component itself, so they can read state, call sibling methods and reach
//! wired dependencies.

mod handle;


use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dom::{Document, ElementRef, Event, Listener};
use crate::error::ComponentError;
use crate::timing::{Scheduler, debounce, throttle};

pub use self::handle::ComponentHandle;

/// Tracing target for component lifecycle events.
pub(crate) const COMPONENT_TARGET: &str = "cel::component";

/// Placeholder name that marks a component configured without a real name.
pub const NAMELESS_COMPONENT: &str = "NamelessComponent";

/// Handle member reserved for initialization; it cannot be exposed.
pub const INIT_ENTRY: &str = "init";

/// A component method. Receives the component and call arguments.
pub type Method = Rc<dyn Fn(&mut Component, &[Value]) -> Value>;

/// An event handler. Receives the component and the triggering event.
pub type Handler = Rc<dyn Fn(&mut Component, &Event)>;

/// Named element reference resolved by selector at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElemSpec {
    name: String,
    selector: String,
}

impl ElemSpec {
    /// Declares an element binding.
    #[must_use]
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
        }
    }

    /// Binding name used by events and [`Component::element`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Selector queried against the document.
    #[must_use]
    pub fn selector(&self) -> &str {
        self.selector.as_str()
    }
}

/// Binds a handler to an event on a named element.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cel::component::EventBinding;
///
/// let binding = EventBinding::new("search", "input", "onSearch")
///     .with_debounce(Duration::from_millis(250));
/// assert_eq!(binding.debounce(), Some(Duration::from_millis(250)));
/// assert_eq!(binding.throttle(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    target: String,
    event_type: String,
    handler: String,
    debounce: Option<Duration>,
    throttle: Option<Duration>,
}

impl EventBinding {
    /// Binds `handler` to `event_type` events on the element named `target`.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        event_type: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            event_type: event_type.into(),
            handler: handler.into(),
            debounce: None,
            throttle: None,
        }
    }

    /// Debounces the handler by `wait`.
    #[must_use]
    pub const fn with_debounce(mut self, wait: Duration) -> Self {
        self.debounce = Some(wait);
        self
    }

    /// Throttles the handler to once per `wait`.
    #[must_use]
    pub const fn with_throttle(mut self, wait: Duration) -> Self {
        self.throttle = Some(wait);
        self
    }

    /// Name of the target element binding.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target.as_str()
    }

    /// Event type listened for.
    #[must_use]
    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }

    /// Name of the handler invoked.
    #[must_use]
    pub fn handler(&self) -> &str {
        self.handler.as_str()
    }

    /// Debounce delay, if any.
    #[must_use]
    pub const fn debounce(&self) -> Option<Duration> {
        self.debounce
    }

    /// Throttle window, if any.
    #[must_use]
    pub const fn throttle(&self) -> Option<Duration> {
        self.throttle
    }
}

/// Declarative component description.
///
/// # Example
///
/// ```
/// use cel::component::{ComponentConfig, EventBinding};
/// use serde_json::{Value, json};
///
/// let config = ComponentConfig::new("Counter")
///     .depends_on("Store")
///     .elem("button", "#increment")
///     .state("count", json!(0))
///     .method("increment", |component, _args| {
///         let next = component.state("count").and_then(Value::as_i64).unwrap_or(0) + 1;
///         component.set_state("count", json!(next)).ok();
///         json!(next)
///     })
///     .handler("onClick", |component, _event| {
///         component.call_method("increment", &[]).ok();
///     })
///     .event(EventBinding::new("button", "click", "onClick"))
///     .expose("increment");
/// assert_eq!(config.name(), "Counter");
/// ```
#[derive(Clone)]
pub struct ComponentConfig {
    name: String,
    dependencies: Vec<String>,
    elems: Vec<ElemSpec>,
    methods: HashMap<String, Method>,
    handlers: HashMap<String, Handler>,
    events: Vec<EventBinding>,
    state: Map<String, Value>,
    exposed: Vec<String>,
}

impl ComponentConfig {
    /// Starts a configuration for the named component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            elems: Vec::new(),
            methods: HashMap::new(),
            handlers: HashMap::new(),
            events: Vec::new(),
            state: Map::new(),
            exposed: Vec::new(),
        }
    }

    /// Declares a dependency on another component by name.
    #[must_use]
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    /// Declares an element binding.
    #[must_use]
    pub fn elem(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.elems.push(ElemSpec::new(name, selector));
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut Component, &[Value]) -> Value + 'static,
    {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Adds an event handler.
    #[must_use]
    pub fn handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Component, &Event) + 'static,
    {
        self.handlers.insert(name.into(), Rc::new(handler));
        self
    }

    /// Adds an event binding.
    #[must_use]
    pub fn event(mut self, binding: EventBinding) -> Self {
        self.events.push(binding);
        self
    }

    /// Declares a state key with its initial value.
    #[must_use]
    pub fn state(mut self, key: impl Into<String>, value: Value) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    /// Exposes a method through the component handle.
    #[must_use]
    pub fn expose(mut self, method: impl Into<String>) -> Self {
        self.exposed.push(method.into());
        self
    }

    /// Component name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Declared dependency names.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl fmt::Debug for ComponentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentConfig")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("elems", &self.elems)
            .field("events", &self.events)
            .field("exposed", &self.exposed)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ElemBinding {
    spec: ElemSpec,
    element: Option<ElementRef>,
}

/// A component instance: the internal context behind a handle.
pub struct Component {
    name: String,
    dependencies: Vec<String>,
    elems: Vec<ElemBinding>,
    methods: HashMap<String, Method>,
    handlers: HashMap<String, Handler>,
    events: Vec<EventBinding>,
    state: Map<String, Value>,
    exposed: Vec<String>,
    mount: Option<ElementRef>,
    wired: BTreeMap<String, ComponentHandle>,
    initialized: bool,
}

impl Component {
    pub(crate) fn from_config(config: ComponentConfig) -> Self {
        let ComponentConfig {
            name,
            dependencies,
            elems,
            methods,
            handlers,
            events,
            state,
            exposed,
        } = config;
        let exposed = validate_exposed(&name, exposed, &methods);
        Self {
            name,
            dependencies,
            elems: elems
                .into_iter()
                .map(|spec| ElemBinding {
                    spec,
                    element: None,
                })
                .collect(),
            methods,
            handlers,
            events,
            state,
            exposed,
            mount: None,
            wired: BTreeMap::new(),
            initialized: false,
        }
    }

    /// Component name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Declared dependency names in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns `true` once [`init`](ComponentHandle::init) has completed.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Element the router initialized this component with, if any.
    #[must_use]
    pub const fn mount(&self) -> Option<&ElementRef> {
        self.mount.as_ref()
    }

    /// Element bound under `name`, if the selector matched.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&ElementRef> {
        self.elems
            .iter()
            .find(|binding| binding.spec.name == name)
            .and_then(|binding| binding.element.as_ref())
    }

    /// Wired dependency by name.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&ComponentHandle> {
        self.wired.get(name)
    }

    /// All wired dependencies keyed by name.
    #[must_use]
    pub const fn wired_dependencies(&self) -> &BTreeMap<String, ComponentHandle> {
        &self.wired
    }

    /// Methods callable through the handle.
    #[must_use]
    pub fn exposed(&self) -> &[String] {
        &self.exposed
    }

    /// Reads a state value.
    #[must_use]
    pub fn state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Assigns a declared state key.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::UnknownState`] when `key` was not declared
    /// in the configuration.
    pub fn set_state(&mut self, key: &str, value: Value) -> Result<(), ComponentError> {
        match self.state.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => {
                warn!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    key,
                    "state key is not declared in the component configuration"
                );
                Err(ComponentError::UnknownState {
                    component: self.name.clone(),
                    key: key.to_owned(),
                })
            }
        }
    }

    /// Writes inner HTML to a bound element.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::UnboundElement`] when no element is bound
    /// under `elem`.
    pub fn set_html(&self, elem: &str, html: impl Into<String>) -> Result<(), ComponentError> {
        let element = self
            .element(elem)
            .ok_or_else(|| ComponentError::UnboundElement {
                component: self.name.clone(),
                elem: elem.to_owned(),
            })?;
        element.set_inner_html(html);
        Ok(())
    }

    /// Calls one of this component's methods, exposed or not.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::UnknownMethod`] when no method has this
    /// name.
    pub fn call_method(&mut self, method: &str, args: &[Value]) -> Result<Value, ComponentError> {
        let callable = self.method(method)?;
        Ok(callable(self, args))
    }

    pub(crate) fn method(&self, method: &str) -> Result<Method, ComponentError> {
        self.methods
            .get(method)
            .cloned()
            .ok_or_else(|| ComponentError::UnknownMethod {
                component: self.name.clone(),
                method: method.to_owned(),
            })
    }

    pub(crate) fn attach_dependency(&mut self, name: &str, handle: ComponentHandle) {
        self.wired.insert(name.to_owned(), handle);
    }

    /// Runs the initialization steps and returns the listeners to attach
    /// once the component is no longer borrowed.
    pub(crate) fn initialize(
        &mut self,
        document: &dyn Document,
        scheduler: &Rc<dyn Scheduler>,
        element: Option<&ElementRef>,
        this: &Weak<RefCell<Self>>,
    ) -> Vec<PendingListener> {
        self.check_settings();
        self.mount = element.cloned();
        self.bind_elements(document);
        let listeners = self.prepare_listeners(scheduler, this);
        self.initialized = true;
        debug!(
            target: COMPONENT_TARGET,
            component = %self.name,
            listeners = listeners.len(),
            "component initialised"
        );
        listeners
    }

    fn check_settings(&self) {
        if self.name == NAMELESS_COMPONENT {
            warn!(
                target: COMPONENT_TARGET,
                "a component is still using the placeholder name; give every component a 'name'"
            );
        }
    }

    fn bind_elements(&mut self, document: &dyn Document) {
        for binding in &mut self.elems {
            binding.element = document.query_selector(&binding.spec.selector);
            if binding.element.is_none() {
                warn!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    elem = %binding.spec.name,
                    selector = %binding.spec.selector,
                    "selector matched no element"
                );
            }
        }
    }

    fn prepare_listeners(
        &self,
        scheduler: &Rc<dyn Scheduler>,
        this: &Weak<RefCell<Self>>,
    ) -> Vec<PendingListener> {
        self.events
            .iter()
            .filter_map(|binding| self.prepare_listener(binding, scheduler, this))
            .collect()
    }

    fn prepare_listener(
        &self,
        binding: &EventBinding,
        scheduler: &Rc<dyn Scheduler>,
        this: &Weak<RefCell<Self>>,
    ) -> Option<PendingListener> {
        let Some(element) = self.element(&binding.target).cloned() else {
            warn!(
                target: COMPONENT_TARGET,
                component = %self.name,
                target_elem = %binding.target,
                event = %binding.event_type,
                "event target is not a bound element; skipping"
            );
            return None;
        };
        let Some(handler) = self.handlers.get(&binding.handler).cloned() else {
            warn!(
                target: COMPONENT_TARGET,
                component = %self.name,
                handler = %binding.handler,
                event = %binding.event_type,
                "event handler is not defined; skipping"
            );
            return None;
        };

        let listener = handler_listener(&self.name, Weak::clone(this), handler);
        let listener = match (binding.debounce, binding.throttle) {
            (Some(_), Some(_)) => {
                warn!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    event = %binding.event_type,
                    "cannot set both debounce and throttle on the same event; binding without either"
                );
                listener
            }
            (Some(wait), None) if wait.is_zero() => {
                warn!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    event = %binding.event_type,
                    "debounce must be greater than zero; binding without it"
                );
                listener
            }
            (Some(wait), None) => debounce(listener, wait, Rc::clone(scheduler)),
            (None, Some(wait)) if wait.is_zero() => {
                warn!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    event = %binding.event_type,
                    "throttle must be greater than zero; binding without it"
                );
                listener
            }
            (None, Some(wait)) => throttle(listener, wait, Rc::clone(scheduler)),
            (None, None) => listener,
        };

        Some(PendingListener {
            element,
            event_type: binding.event_type.clone(),
            listener,
        })
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("elems", &self.elems)
            .field("state", &self.state)
            .field("exposed", &self.exposed)
            .field("wired", &self.wired.keys().collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

/// Listener waiting to be attached after initialization releases the
/// component.
pub(crate) struct PendingListener {
    element: ElementRef,
    event_type: String,
    listener: Listener,
}

impl PendingListener {
    pub(crate) fn attach(self) {
        self.element
            .add_event_listener(self.event_type, self.listener);
    }
}

fn handler_listener(name: &str, this: Weak<RefCell<Component>>, handler: Handler) -> Listener {
    let name = name.to_owned();
    Rc::new(move |event: &Event| {
        let Some(component) = this.upgrade() else {
            return;
        };
        match component.try_borrow_mut() {
            Ok(mut component) => handler(&mut *component, event),
            Err(_) => warn!(
                target: COMPONENT_TARGET,
                component = %name,
                event = event.kind(),
                "component is busy; dropping re-entrant event"
            ),
        }
    })
}

fn validate_exposed(
    name: &str,
    exposed: Vec<String>,
    methods: &HashMap<String, Method>,
) -> Vec<String> {
    exposed
        .into_iter()
        .filter(|method| {
            if method == INIT_ENTRY {
                warn!(
                    target: COMPONENT_TARGET,
                    component = name,
                    "'init' is reserved by the framework; use a different method name"
                );
                false
            } else if !methods.contains_key(method) {
                warn!(
                    target: COMPONENT_TARGET,
                    component = name,
                    method = %method,
                    "exposed method is not defined; ignoring"
                );
                false
            } else {
                true
            }
        })
        .collect()
}
