use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the dependency resolver treats dependency cycles and declared
/// dependencies that name no registered component.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DependencyPolicy {
    /// A dependency cycle fails resolution before anything is wired. A
    /// missing dependency fails it after every other dependency is wired.
    #[default]
    Strict,
    /// Missing dependencies are logged and left unwired; cycles are logged
    /// and wired as declared.
    Lenient,
}

impl DependencyPolicy {
    /// Returns `true` when resolution must fail on a cycle or a missing
    /// dependency.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}
