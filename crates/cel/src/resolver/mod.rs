//! Dependency resolution across the component registry.
//!
//! After routing, every registered component gets its declared dependencies
//! wired in: each dependency is looked up by name, initialized if nothing has
//! initialized it yet, and attached to the dependent under that name.
//! Components are walked in registration order and dependencies in
//! declaration order.
//!
//! A cycle is found before anything is wired. Under
//! [`DependencyPolicy::Strict`] it fails resolution; under
//! [`DependencyPolicy::Lenient`] it is logged and wired as declared.
//!
//! A dependency naming no registered component never stops the pass: every
//! other edge is still wired. Strict resolution then reports the first
//! missing name as an error, lenient resolution only records it.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use cel_config::{CelConfig, DependencyPolicy};
use tracing::{debug, warn};

use crate::component::ComponentHandle;
use crate::error::CelError;
use crate::lifecycle::{Host, InitOutcome, Initializable};
use crate::registry::ComponentRegistry;

/// Tracing target for dependency resolution.
const RESOLVER_TARGET: &str = "cel::resolver";

/// A dependent and one of its declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    component: String,
    dependency: String,
}

impl DependencyEdge {
    fn new(component: &str, dependency: &str) -> Self {
        Self {
            component: component.to_owned(),
            dependency: dependency.to_owned(),
        }
    }

    /// Component declaring the dependency.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Name of the dependency.
    #[must_use]
    pub fn dependency(&self) -> &str {
        &self.dependency
    }
}

/// Summary of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    wired: Vec<DependencyEdge>,
    initialized: Vec<String>,
    unresolved: Vec<DependencyEdge>,
}

impl ResolutionReport {
    /// Dependencies attached to their dependents, in wiring order.
    #[must_use]
    pub fn wired(&self) -> &[DependencyEdge] {
        &self.wired
    }

    /// Components this pass initialized because something depended on them.
    #[must_use]
    pub fn initialized(&self) -> &[String] {
        &self.initialized
    }

    /// Dependencies naming no registered component.
    #[must_use]
    pub fn unresolved(&self) -> &[DependencyEdge] {
        &self.unresolved
    }
}

/// Wires declared dependencies between registered components.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver {
    policy: DependencyPolicy,
}

impl DependencyResolver {
    /// Creates a resolver with the given policy.
    #[must_use]
    pub const fn new(policy: DependencyPolicy) -> Self {
        Self { policy }
    }

    /// Creates a resolver with the configured policy.
    #[must_use]
    pub const fn from_config(config: &CelConfig) -> Self {
        Self::new(config.dependency_policy())
    }

    /// Policy applied to missing dependencies and cycles.
    #[must_use]
    pub const fn policy(&self) -> DependencyPolicy {
        self.policy
    }

    /// Resolves every declared dependency in `registry`.
    ///
    /// Running this again against the same registry initializes nothing new
    /// and re-attaches the same handles.
    ///
    /// # Errors
    ///
    /// Under the strict policy returns [`CelError::DependencyCycle`] before
    /// anything is wired, and [`CelError::MissingDependency`] once every
    /// resolvable dependency has been wired. Under either policy returns
    /// [`CelError::Initialization`] when a dependency fails to initialize or
    /// a dependent is busy.
    pub fn resolve(
        &self,
        host: &Host<'_>,
        registry: &ComponentRegistry,
    ) -> Result<ResolutionReport, CelError> {
        if let Some(path) = find_cycle(registry) {
            if self.policy.is_strict() {
                return Err(CelError::DependencyCycle { path });
            }
            warn!(
                target: RESOLVER_TARGET,
                cycle = %path.join(" -> "),
                "dependency cycle detected; wiring anyway"
            );
        }

        let mut report = ResolutionReport::default();
        for handle in registry {
            for dependency in declared(handle)? {
                self.wire(host, registry, handle, &dependency, &mut report)?;
            }
        }
        debug!(
            target: RESOLVER_TARGET,
            wired = report.wired.len(),
            initialized = report.initialized.len(),
            unresolved = report.unresolved.len(),
            "dependency resolution complete"
        );
        if self.policy.is_strict()
            && let Some(edge) = report.unresolved.first()
        {
            return Err(CelError::MissingDependency {
                component: edge.component.clone(),
                dependency: edge.dependency.clone(),
            });
        }
        Ok(report)
    }

    fn wire(
        &self,
        host: &Host<'_>,
        registry: &ComponentRegistry,
        handle: &ComponentHandle,
        dependency: &str,
        report: &mut ResolutionReport,
    ) -> Result<(), CelError> {
        let Some(target) = registry.get(dependency) else {
            warn!(
                target: RESOLVER_TARGET,
                component = handle.name(),
                dependency,
                policy = %self.policy,
                "dependency is not registered; leaving it unset"
            );
            report
                .unresolved
                .push(DependencyEdge::new(handle.name(), dependency));
            return Ok(());
        };

        if !target.is_initialized() {
            let outcome = target
                .init(host, None)
                .map_err(|source| CelError::Initialization {
                    component: target.name().to_owned(),
                    source,
                })?;
            if outcome == InitOutcome::Initialized {
                report.initialized.push(target.name().to_owned());
            }
        }

        handle
            .context_mut()
            .map_err(|source| CelError::Initialization {
                component: handle.name().to_owned(),
                source,
            })?
            .attach_dependency(dependency, target.clone());
        debug!(
            target: RESOLVER_TARGET,
            component = handle.name(),
            dependency,
            "dependency wired"
        );
        report
            .wired
            .push(DependencyEdge::new(handle.name(), dependency));
        Ok(())
    }
}

fn declared(handle: &ComponentHandle) -> Result<Vec<String>, CelError> {
    handle
        .context()
        .map(|component| component.dependencies().to_vec())
        .map_err(|source| CelError::Initialization {
            component: handle.name().to_owned(),
            source,
        })
}

fn dependency_graph(registry: &ComponentRegistry) -> Vec<(String, Vec<String>)> {
    registry
        .iter()
        .map(|handle| {
            let dependencies = handle
                .context()
                .map(|component| component.dependencies().to_vec())
                .unwrap_or_default();
            (handle.name().to_owned(), dependencies)
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Returns the first cycle found, walking components in registration order.
/// The path starts and ends with the same name.
fn find_cycle(registry: &ComponentRegistry) -> Option<Vec<String>> {
    let graph = dependency_graph(registry);
    let edges: HashMap<&str, &[String]> = graph
        .iter()
        .map(|(name, dependencies)| (name.as_str(), dependencies.as_slice()))
        .collect();
    let mut marks = HashMap::new();
    graph
        .iter()
        .find_map(|(name, _)| walk(name, &edges, &mut marks))
}

/// Depth-first walk from `root` on an explicit stack of
/// `(component, next dependency index)` frames.
fn walk<'a>(
    root: &'a str,
    edges: &HashMap<&'a str, &'a [String]>,
    marks: &mut HashMap<&'a str, Mark>,
) -> Option<Vec<String>> {
    if marks.contains_key(root) {
        return None;
    }
    marks.insert(root, Mark::Visiting);
    let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];

    while let Some((name, next)) = stack.last_mut() {
        let name = *name;
        let dependencies = edges.get(name).copied().unwrap_or_default();
        let Some(dependency) = dependencies.get(*next) else {
            marks.insert(name, Mark::Done);
            stack.pop();
            continue;
        };
        *next += 1;

        let dependency = dependency.as_str();
        match marks.get(dependency) {
            Some(Mark::Done) => {}
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|(entry, _)| *entry == dependency)?;
                let mut path: Vec<String> = stack
                    .iter()
                    .skip(start)
                    .map(|(entry, _)| (*entry).to_owned())
                    .collect();
                path.push(dependency.to_owned());
                return Some(path);
            }
            // Unregistered names are reported as missing, not walked.
            None if edges.contains_key(dependency) => {
                marks.insert(dependency, Mark::Visiting);
                stack.push((dependency, 0));
            }
            None => {}
        }
    }
    None
}
