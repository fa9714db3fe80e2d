//! Instance registry for component handles.
//!
//! The [`ComponentRegistry`] builds a component from each registered
//! configuration and keeps the resulting handles in registration order. It
//! is append-only: nothing is removed for the registry's lifetime, and a
//! bootstrap run never changes its contents. Names are unique; blank and
//! duplicate names are rejected at registration.

use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentConfig, ComponentHandle};
use crate::error::CelError;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = "cel::registry";

/// Ordered registry of every constructed component.
///
/// # Example
///
/// ```
/// use cel::{ComponentConfig, ComponentRegistry};
///
/// let mut registry = ComponentRegistry::new();
/// registry
///     .register(ComponentConfig::new("Store"))
///     .expect("registration succeeds");
/// registry
///     .register(ComponentConfig::new("Cart").depends_on("Store"))
///     .expect("registration succeeds");
///
/// let names: Vec<&str> = registry.iter().map(|handle| handle.name()).collect();
/// assert_eq!(names, ["Store", "Cart"]);
/// assert!(registry.get("Store").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    handles: Vec<ComponentHandle>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a component from `config`, appends it and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CelError::InvalidName`] when the name is blank and
    /// [`CelError::DuplicateComponent`] when the name is already registered.
    pub fn register(&mut self, config: ComponentConfig) -> Result<ComponentHandle, CelError> {
        let name = config.name().to_owned();
        if name.trim().is_empty() {
            return Err(CelError::InvalidName { name });
        }
        if self.index.contains_key(&name) {
            return Err(CelError::DuplicateComponent { name });
        }

        let handle = ComponentHandle::new(Component::from_config(config));
        self.index.insert(name, self.handles.len());
        self.handles.push(handle.clone());
        debug!(
            target: REGISTRY_TARGET,
            component = handle.name(),
            position = self.handles.len(),
            "component registered"
        );
        Ok(handle)
    }

    /// Looks up a component by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentHandle> {
        self.index
            .get(name)
            .and_then(|position| self.handles.get(*position))
    }

    /// Handles in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentHandle> {
        self.handles.iter()
    }

    /// Handles in registration order, as a slice.
    #[must_use]
    pub fn handles(&self) -> &[ComponentHandle] {
        &self.handles
    }

    /// Returns the number of registered components.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` when no components are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComponentRegistry {
    type Item = &'a ComponentHandle;
    type IntoIter = std::slice::Iter<'a, ComponentHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
