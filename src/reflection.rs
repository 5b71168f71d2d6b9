//! Dependency discovery for constructible types.
//!
//! The planner does not scan source-level annotations itself; it asks a
//! [`DependencyProvider`] for the ordered injection points a type declares.
//! The provider must be deterministic for a given type for the duration of
//! one planning call.

use dashmap::DashMap;

use crate::identifier::TypeKey;
use crate::planning::target::Target;

/// Supplies the declared dependency targets of a constructible type.
pub trait DependencyProvider: Send + Sync {
    /// Ordered injection points of `implementation`'s constructor.
    ///
    /// # Errors
    /// Failures abort the whole planning call with the original message.
    fn dependencies_of(&self, implementation: &TypeKey) -> anyhow::Result<Vec<Target>>;
}

/// A map-backed provider: each constructible type registers its dependency
/// targets up front. Types never registered declare no dependencies, the
/// same way an unannotated class has none.
#[derive(Debug, Default)]
pub struct StaticDependencyProvider {
    dependencies: DashMap<TypeKey, Vec<Target>>,
}

impl StaticDependencyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the dependency targets of `T`, replacing any previous
    /// declaration.
    pub fn register<T: ?Sized + 'static>(&self, targets: Vec<Target>) {
        self.dependencies.insert(TypeKey::of::<T>(), targets);
    }

    pub fn register_key(&self, implementation: TypeKey, targets: Vec<Target>) {
        self.dependencies.insert(implementation, targets);
    }
}

impl DependencyProvider for StaticDependencyProvider {
    fn dependencies_of(&self, implementation: &TypeKey) -> anyhow::Result<Vec<Target>> {
        Ok(self
            .dependencies
            .get(implementation)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
