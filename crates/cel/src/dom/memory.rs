//! Tree-backed [`Document`] implementation.

use super::{Document, ElementRef};

/// A document held as an in-memory element tree.
///
/// The root element is part of the document, matching the behaviour of
/// enumerating every tag in a page.
///
/// # Example
///
/// ```
/// use cel::dom::{Document, ElementRef, MemoryDocument};
///
/// let document = MemoryDocument::new(
///     ElementRef::new("body")
///         .with_child(ElementRef::new("div").with_attribute("data-action", "Nav"))
///         .with_child(ElementRef::new("p")),
/// );
/// assert_eq!(document.elements().len(), 3);
/// assert_eq!(document.elements_with_attribute("data-action").len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    root: ElementRef,
}

impl MemoryDocument {
    /// Wraps an element tree.
    #[must_use]
    pub const fn new(root: ElementRef) -> Self {
        Self { root }
    }

    /// Root element.
    #[must_use]
    pub const fn root(&self) -> &ElementRef {
        &self.root
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(ElementRef::new("html"))
    }
}

impl Document for MemoryDocument {
    fn elements(&self) -> Vec<ElementRef> {
        self.root.descendants_inclusive()
    }
}
