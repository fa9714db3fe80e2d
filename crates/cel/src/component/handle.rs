//! The exposed handle returned from registration.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::dom::ElementRef;
use crate::error::ComponentError;
use crate::lifecycle::{Host, InitOutcome, Initializable};

use super::{COMPONENT_TARGET, Component};

/// Capability-limited reference to a registered component.
///
/// Clones share the same instance. Callers can initialize the component,
/// read its name, call exposed methods and look up wired dependencies;
/// [`context`](Self::context) grants the full internal view.
#[derive(Clone)]
pub struct ComponentHandle {
    name: Rc<str>,
    inner: Rc<RefCell<Component>>,
}

impl ComponentHandle {
    pub(crate) fn new(component: Component) -> Self {
        Self {
            name: Rc::from(component.name()),
            inner: Rc::new(RefCell::new(component)),
        }
    }

    /// Component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrows the component's internal context.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Busy`] while a method, handler or
    /// initialization holds the component mutably.
    pub fn context(&self) -> Result<Ref<'_, Component>, ComponentError> {
        self.inner.try_borrow().map_err(|_| self.busy())
    }

    /// Mutably borrows the component's internal context.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Busy`] while the component is borrowed.
    pub fn context_mut(&self) -> Result<RefMut<'_, Component>, ComponentError> {
        self.inner.try_borrow_mut().map_err(|_| self.busy())
    }

    /// Calls an exposed method.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::NotExposed`] when the method is not listed
    /// as exposed and [`ComponentError::Busy`] when the component is already
    /// borrowed.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, ComponentError> {
        let callable = {
            let component = self.context()?;
            if !component.exposed().iter().any(|name| name == method) {
                return Err(ComponentError::NotExposed {
                    component: self.name.to_string(),
                    method: method.to_owned(),
                });
            }
            component.method(method)?
        };
        let mut component = self.context_mut()?;
        Ok(callable(&mut *component, args))
    }

    /// Wired dependency by name.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<Self> {
        self.context()
            .ok()
            .and_then(|component| component.dependency(name).cloned())
    }

    /// Returns `true` when both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn busy(&self) -> ComponentError {
        ComponentError::Busy {
            component: self.name.to_string(),
        }
    }
}

impl Initializable for ComponentHandle {
    fn init(
        &self,
        host: &Host<'_>,
        element: Option<&ElementRef>,
    ) -> Result<InitOutcome, ComponentError> {
        let listeners = {
            let mut component = self.context_mut()?;
            if component.is_initialized() {
                debug!(
                    target: COMPONENT_TARGET,
                    component = %self.name,
                    "component already initialised; skipping"
                );
                return Ok(InitOutcome::AlreadyInitialized);
            }
            let this = Rc::downgrade(&self.inner);
            component.initialize(host.document(), &host.scheduler(), element, &this)
        };
        for listener in listeners {
            listener.attach();
        }
        Ok(InitOutcome::Initialized)
    }

    fn is_initialized(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|component| component.is_initialized())
    }
}

impl PartialEq for ComponentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
