//! Document boundary used by the router and by component initialization.
//!
//! The framework needs very little from a document: every element in
//! document order, attribute reads, a first-match selector query, event
//! listener attachment and inner HTML writes. The [`Document`] trait captures
//! enumeration and querying; [`ElementRef`] is a shared element node that
//! carries attributes, children, markup and listeners. [`MemoryDocument`] is
//! a tree-backed implementation for hosts that mirror their page into Rust
//! and for tests.

mod memory;
mod selector;


use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

pub use self::memory::MemoryDocument;
pub use self::selector::{AttributeMatch, Selector};

/// Callback attached to an element for one event type.
pub type Listener = Rc<dyn Fn(&Event)>;

/// An event delivered to element listeners.
///
/// # Example
///
/// ```
/// use cel::dom::Event;
/// use serde_json::json;
///
/// let event = Event::new("input").with_detail(json!({ "value": "abc" }));
/// assert_eq!(event.kind(), "input");
/// assert_eq!(event.detail()["value"], "abc");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    detail: Value,
}

impl Event {
    /// Creates an event of the given type with a null payload.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: Value::Null,
        }
    }

    /// Attaches a payload to the event.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    /// Event type, such as `click`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Event payload.
    #[must_use]
    pub const fn detail(&self) -> &Value {
        &self.detail
    }
}

struct ElementNode {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    children: RefCell<Vec<ElementRef>>,
    inner_html: RefCell<String>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

/// Shared handle to an element node.
///
/// Clones refer to the same node; equality is identity.
///
/// # Example
///
/// ```
/// use cel::dom::ElementRef;
///
/// let button = ElementRef::new("button")
///     .with_attribute("id", "save")
///     .with_attribute("data-action", "APP.Form");
/// assert_eq!(button.id().as_deref(), Some("save"));
/// assert_eq!(button.attribute("data-action").as_deref(), Some("APP.Form"));
/// ```
#[derive(Clone)]
pub struct ElementRef(Rc<ElementNode>);

impl ElementRef {
    /// Creates a detached element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(ElementNode {
            tag: tag.into().to_ascii_lowercase(),
            attributes: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            inner_html: RefCell::new(String::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    /// Sets an attribute and returns the element, for tree construction.
    #[must_use]
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child and returns the element, for tree construction.
    #[must_use]
    pub fn with_child(self, child: Self) -> Self {
        self.append_child(child);
        self
    }

    /// Lower-case tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.0.tag.as_str()
    }

    /// Reads an attribute. `None` means the attribute is absent; an empty
    /// string means it is present without a value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Returns `true` when the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.attributes.borrow().iter().any(|(key, _)| key == name)
    }

    /// Sets or replaces an attribute, keeping insertion order.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => attributes.push((name, value)),
        }
    }

    /// Value of the `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Whitespace-separated entries of the `class` attribute.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Appends a child element.
    pub fn append_child(&self, child: Self) {
        self.0.children.borrow_mut().push(child);
    }

    /// Direct children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// This element followed by all descendants, depth first.
    #[must_use]
    pub fn descendants_inclusive(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(element) = stack.pop() {
            stack.extend(element.children().into_iter().rev());
            out.push(element);
        }
        out
    }

    /// Current inner markup.
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.0.inner_html.borrow().clone()
    }

    /// Replaces the inner markup.
    pub fn set_inner_html(&self, html: impl Into<String>) {
        *self.0.inner_html.borrow_mut() = html.into();
    }

    /// Attaches a listener for an event type.
    pub fn add_event_listener(&self, kind: impl Into<String>, listener: Listener) {
        self.0.listeners.borrow_mut().push((kind.into(), listener));
    }

    /// Number of listeners attached for an event type.
    #[must_use]
    pub fn listener_count(&self, kind: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(registered, _)| registered == kind)
            .count()
    }

    /// Delivers an event to every listener registered for its type and
    /// returns how many were invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        // Listeners may attach further listeners while running.
        let matching: Vec<Listener> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(kind, _)| kind == event.kind())
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    /// Returns `true` when both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ElementRef {}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("tag", &self.0.tag)
            .field("attributes", &*self.0.attributes.borrow())
            .finish_non_exhaustive()
    }
}

/// Read access to a document's elements.
pub trait Document {
    /// Every element in document order.
    fn elements(&self) -> Vec<ElementRef>;

    /// First element, in document order, matching a selector.
    ///
    /// Selectors the document cannot parse match nothing.
    fn query_selector(&self, selector: &str) -> Option<ElementRef> {
        let parsed: Selector = selector.parse().ok()?;
        self.elements()
            .into_iter()
            .find(|element| parsed.matches(element))
    }

    /// Elements carrying an attribute, in document order.
    fn elements_with_attribute(&self, attribute: &str) -> Vec<ElementRef> {
        self.elements()
            .into_iter()
            .filter(|element| element.has_attribute(attribute))
            .collect()
    }
}
