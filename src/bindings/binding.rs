//! Binding descriptors.
//!
//! A [`Binding`] is a registration rule describing how one service
//! identifier is satisfied. Bindings are created at bind time, configured
//! through the owned-self calls below, stored in the container's lookup and
//! removed on unbind. The planner only reads them; the cache slot and
//! activation hook belong to the external instantiator.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use strum_macros::Display;

use crate::bindings::constraint::Constraint;
use crate::identifier::{ServiceIdentifier, TypeKey};
use crate::planning::context::PlanningContext;

/// An opaque, type-erased service instance.
pub type ServiceValue = Arc<dyn Any + Send + Sync>;

/// Produces a value on demand, with access to the resolution context.
pub type DynamicValueFn =
    Arc<dyn Fn(&PlanningContext) -> anyhow::Result<ServiceValue> + Send + Sync>;

/// Builds a factory or provider closure from the resolution context.
pub type CreatorFn = Arc<dyn Fn(&PlanningContext) -> ServiceValue + Send + Sync>;

/// Post-construction hook run by the instantiator.
pub type ActivationFn = Arc<dyn Fn(&PlanningContext, ServiceValue) -> ServiceValue + Send + Sync>;

static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique id of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

impl BindingId {
    fn next() -> Self {
        Self(NEXT_BINDING_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instance caching behavior applied by the instantiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BindingScope {
    Singleton,
    Transient,
}

/// How a binding resolves, each variant carrying only the data it needs.
///
/// Only [`BindingKind::Instance`] has constructor dependencies of its own;
/// it is the single kind the planner expands recursively. Everything else is
/// a leaf of the resolution tree.
#[derive(Clone, Display)]
pub enum BindingKind {
    /// Construct an instance of `implementation`, injecting its declared
    /// dependencies.
    Instance { implementation: TypeKey },
    /// Hand out a pre-built value.
    ConstantValue { value: ServiceValue },
    /// Invoke a closure at resolution time.
    DynamicValue { factory: DynamicValueFn },
    /// Hand out a factory closure built from the context.
    Factory { factory: CreatorFn },
    /// Hand out a provider closure built from the context.
    Provider { provider: CreatorFn },
    /// Hand out the constructor itself without resolving its dependencies.
    Constructor { implementation: TypeKey },
    /// Hand out a function value.
    Function { function: ServiceValue },
}

impl fmt::Debug for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { implementation } | Self::Constructor { implementation } => {
                write!(f, "{self}({implementation})")
            }
            _ => write!(f, "{self}"),
        }
    }
}

/// A registered rule describing how to satisfy a service identifier.
pub struct Binding {
    id: BindingId,
    module_id: Option<String>,
    service_identifier: ServiceIdentifier,
    kind: BindingKind,
    scope: BindingScope,
    constraint: Constraint,
    on_activation: Option<ActivationFn>,
    // Written by the instantiator for singleton-scoped bindings; planning
    // never touches it.
    cache: OnceLock<ServiceValue>,
}

impl Binding {
    fn new(service_identifier: ServiceIdentifier, kind: BindingKind) -> Self {
        Self {
            id: BindingId::next(),
            module_id: None,
            service_identifier,
            kind,
            scope: BindingScope::Transient,
            constraint: Constraint::Always,
            on_activation: None,
            cache: OnceLock::new(),
        }
    }

    /// Bind to a constructible implementation type.
    pub fn to_instance<T: ?Sized + 'static>(service_identifier: ServiceIdentifier) -> Self {
        Self::new(
            service_identifier,
            BindingKind::Instance {
                implementation: TypeKey::of::<T>(),
            },
        )
    }

    /// Bind to an already constructed value. Constant bindings are
    /// singleton-scoped by nature.
    pub fn to_constant_value(service_identifier: ServiceIdentifier, value: ServiceValue) -> Self {
        Self::new(service_identifier, BindingKind::ConstantValue { value })
            .in_scope(BindingScope::Singleton)
    }

    /// Bind to a closure evaluated at resolution time.
    pub fn to_dynamic_value(service_identifier: ServiceIdentifier, factory: DynamicValueFn) -> Self {
        Self::new(service_identifier, BindingKind::DynamicValue { factory })
    }

    /// Bind to a factory creator.
    pub fn to_factory(service_identifier: ServiceIdentifier, factory: CreatorFn) -> Self {
        Self::new(service_identifier, BindingKind::Factory { factory })
    }

    /// Bind to a provider creator.
    pub fn to_provider(service_identifier: ServiceIdentifier, provider: CreatorFn) -> Self {
        Self::new(service_identifier, BindingKind::Provider { provider })
    }

    /// Bind to a constructor handed out without dependency resolution.
    pub fn to_constructor<T: ?Sized + 'static>(service_identifier: ServiceIdentifier) -> Self {
        Self::new(
            service_identifier,
            BindingKind::Constructor {
                implementation: TypeKey::of::<T>(),
            },
        )
    }

    /// Bind to a function value.
    pub fn to_function(service_identifier: ServiceIdentifier, function: ServiceValue) -> Self {
        Self::new(service_identifier, BindingKind::Function { function })
    }

    // --- configuration calls ---

    pub fn in_scope(mut self, scope: BindingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn in_singleton_scope(self) -> Self {
        self.in_scope(BindingScope::Singleton)
    }

    pub fn in_transient_scope(self) -> Self {
        self.in_scope(BindingScope::Transient)
    }

    /// Attach a constraint consulted during ambiguity resolution.
    pub fn when(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Attach a post-construction activation hook.
    pub fn on_activation(mut self, hook: ActivationFn) -> Self {
        self.on_activation = Some(hook);
        self
    }

    /// Record the container module that owns this binding.
    pub fn from_module(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    // --- accessors ---

    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    pub fn service_identifier(&self) -> &ServiceIdentifier {
        &self.service_identifier
    }

    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    pub fn scope(&self) -> BindingScope {
        self.scope
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn activation(&self) -> Option<&ActivationFn> {
        self.on_activation.as_ref()
    }

    /// Cache slot for the instantiator's singleton handling.
    pub fn instance_cache(&self) -> &OnceLock<ServiceValue> {
        &self.cache
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("service_identifier", &self.service_identifier)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("constraint", &self.constraint)
            .finish_non_exhaustive()
    }
}
