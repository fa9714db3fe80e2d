//! Route parsing and the namespace lookup table.
//!
//! A route string read from an element is either a dotted path such as
//! `APP.Cart.Summary` or a flat key such as `Cart`. The [`Namespace`] is a
//! tree of scopes built when components are mounted: paths are resolved by
//! descending one scope per segment, flat keys by a direct lookup among the
//! top-level entries. Both return a typed [`RouteError`] instead of walking
//! into nothing.


use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentHandle;
use crate::error::{CelError, RouteError};
use crate::lifecycle::Initializable;

/// Separator between path segments.
pub const ROUTE_SEPARATOR: char = '.';

/// A routable target.
pub type Target = Rc<dyn Initializable>;

/// A parsed route string.
///
/// # Example
///
/// ```
/// use cel::namespace::Route;
///
/// assert_eq!(
///     Route::parse("APP.Widget"),
///     Some(Route::Path(vec!["APP".into(), "Widget".into()]))
/// );
/// assert_eq!(Route::parse("Widget"), Some(Route::Flat("Widget".into())));
/// assert_eq!(Route::parse(""), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Dotted path resolved by scope descent.
    Path(Vec<String>),
    /// Single key resolved among top-level entries.
    Flat(String),
}

impl Route {
    /// Parses a route string. Empty strings are not routes.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        if text.contains(ROUTE_SEPARATOR) {
            Some(Self::Path(
                text.split(ROUTE_SEPARATOR).map(str::to_owned).collect(),
            ))
        } else {
            Some(Self::Flat(text.to_owned()))
        }
    }

    /// Segments of the route; a flat route has one.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        match self {
            Self::Path(segments) => segments,
            Self::Flat(key) => std::slice::from_ref(key),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(segments) => f.write_str(&segments.join(".")),
            Self::Flat(key) => f.write_str(key),
        }
    }
}

#[derive(Clone)]
enum Entry {
    Target(Target),
    Scope(Namespace),
}

/// Tree of scopes mapping route segments to targets.
///
/// # Example
///
/// ```
/// use cel::{ComponentConfig, ComponentRegistry, Namespace};
/// use cel::namespace::Route;
///
/// let mut registry = ComponentRegistry::new();
/// let widget = registry.register(ComponentConfig::new("Widget")).expect("register");
///
/// let mut namespace = Namespace::new();
/// namespace.mount_component("APP.Widget", &widget).expect("mount");
///
/// let route = Route::parse("APP.Widget").expect("non-empty route");
/// assert!(namespace.resolve(&route).is_ok());
/// assert!(namespace.resolve(&Route::parse("APP").expect("route")).is_err());
/// ```
#[derive(Clone, Default)]
pub struct Namespace {
    entries: BTreeMap<String, Entry>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a target at `route`, creating intermediate scopes.
    ///
    /// # Errors
    ///
    /// Returns [`CelError::InvalidRoute`] for empty routes or empty
    /// segments, and [`CelError::NamespaceConflict`] when the route is
    /// already taken or passes through an existing target.
    pub fn mount(&mut self, route: &str, target: Target) -> Result<(), CelError> {
        let invalid = || CelError::InvalidRoute {
            route: route.to_owned(),
        };
        let conflict = || CelError::NamespaceConflict {
            route: route.to_owned(),
        };

        let parsed = Route::parse(route).ok_or_else(invalid)?;
        let segments = parsed.segments();
        if segments.iter().any(String::is_empty) {
            return Err(invalid());
        }
        let Some((last, scopes)) = segments.split_last() else {
            return Err(invalid());
        };

        let mut current = self;
        for segment in scopes {
            let entry = current
                .entries
                .entry(segment.clone())
                .or_insert_with(|| Entry::Scope(Self::new()));
            current = match entry {
                Entry::Scope(scope) => scope,
                Entry::Target(_) => return Err(conflict()),
            };
        }
        if current.entries.contains_key(last) {
            return Err(conflict());
        }
        current.entries.insert(last.clone(), Entry::Target(target));
        Ok(())
    }

    /// Mounts a component handle at `route`.
    ///
    /// # Errors
    ///
    /// See [`Namespace::mount`].
    pub fn mount_component(
        &mut self,
        route: &str,
        handle: &ComponentHandle,
    ) -> Result<(), CelError> {
        self.mount(route, Rc::new(handle.clone()))
    }

    /// Resolves a route to its target.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] describing the first segment that failed.
    pub fn resolve(&self, route: &Route) -> Result<Target, RouteError> {
        match route {
            Route::Flat(key) => self.lookup(key, route),
            Route::Path(segments) => self.descend(segments, route),
        }
    }

    /// Returns `true` when nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, key: &str, route: &Route) -> Result<Target, RouteError> {
        match self.entries.get(key) {
            Some(Entry::Target(target)) => Ok(Rc::clone(target)),
            Some(Entry::Scope(_)) => Err(RouteError::NotATarget {
                route: route.to_string(),
            }),
            None => Err(RouteError::Unresolved {
                route: route.to_string(),
                segment: key.to_owned(),
            }),
        }
    }

    fn descend(&self, segments: &[String], route: &Route) -> Result<Target, RouteError> {
        let Some((last, scopes)) = segments.split_last() else {
            return Err(RouteError::Unresolved {
                route: route.to_string(),
                segment: String::new(),
            });
        };
        let mut current = self;
        for segment in scopes {
            current = match current.entries.get(segment) {
                Some(Entry::Scope(scope)) => scope,
                Some(Entry::Target(_)) => {
                    return Err(RouteError::NotAScope {
                        route: route.to_string(),
                        segment: segment.clone(),
                    });
                }
                None => {
                    return Err(RouteError::Unresolved {
                        route: route.to_string(),
                        segment: segment.clone(),
                    });
                }
            };
        }
        current.lookup(last, route)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, entry) in &self.entries {
            match entry {
                Entry::Target(_) => map.entry(key, &"<target>"),
                Entry::Scope(scope) => map.entry(key, scope),
            };
        }
        map.finish()
    }
}
