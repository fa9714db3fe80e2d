//! Initialization contract shared by routed targets and components.
//!
//! The router and the dependency resolver never inspect what they
//! initialize. They hand an [`Initializable`] the [`Host`] it runs against
//! and, for routed elements, the element that named it.

use std::fmt;
use std::rc::Rc;

use crate::dom::{Document, ElementRef};
use crate::error::ComponentError;
use crate::timing::Scheduler;

/// Host services available during initialization: the document and the
/// timer source used by debounced or throttled handlers.
#[derive(Clone)]
pub struct Host<'a> {
    document: &'a dyn Document,
    scheduler: Rc<dyn Scheduler>,
}

impl<'a> Host<'a> {
    /// Bundles a document with a scheduler.
    #[must_use]
    pub fn new(document: &'a dyn Document, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            document,
            scheduler,
        }
    }

    /// Document queried for element bindings and routes.
    #[must_use]
    pub fn document(&self) -> &'a dyn Document {
        self.document
    }

    /// Timer source for debounce and throttle wrappers.
    #[must_use]
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.scheduler)
    }
}

impl fmt::Debug for Host<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// What an initialization call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The target ran its initialization now.
    Initialized,
    /// The target had already been initialized; nothing ran.
    AlreadyInitialized,
}

/// A target that can be initialized at most once.
pub trait Initializable {
    /// Initializes the target.
    ///
    /// `element` is the routed element when the router is the caller and
    /// `None` when the target is initialized as a dependency. Calling this
    /// again after success returns [`InitOutcome::AlreadyInitialized`].
    ///
    /// # Errors
    ///
    /// Returns a [`ComponentError`] when the target cannot be initialized in
    /// its current state.
    fn init(
        &self,
        host: &Host<'_>,
        element: Option<&ElementRef>,
    ) -> Result<InitOutcome, ComponentError>;

    /// Returns `true` once initialization has completed.
    fn is_initialized(&self) -> bool;
}
