//! Containers and their binding registries.
//!
//! The planner treats a [`Container`] as a read-only collaborator: a unique
//! id, an optional parent and a [`Lookup`] of bindings. The registration
//! surface here is deliberately plain — the fluent binding DSL lives
//! elsewhere; only its effects on the lookup matter to planning.

mod lookup;

pub use lookup::Lookup;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::bindings::Binding;
use crate::identifier::ServiceIdentifier;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// A registry of bindings, optionally chained to a parent container.
///
/// Children hold a non-owning back-reference to their parent; the parent
/// must outlive any planning call against a descendant.
#[derive(Debug)]
pub struct Container {
    id: u64,
    parent: Option<Weak<Container>>,
    lookup: Lookup,
}

impl Container {
    /// Create a root container.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            parent: None,
            lookup: Lookup::new(),
        })
    }

    /// Create a child container that falls back to `self` for identifiers it
    /// has no bindings for.
    pub fn create_child(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            parent: Some(Arc::downgrade(self)),
            lookup: Lookup::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn parent(&self) -> Option<Arc<Container>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// Register a binding, returning the shared handle stored in the lookup.
    pub fn bind(&self, binding: Binding) -> Arc<Binding> {
        let binding = Arc::new(binding);
        self.lookup
            .add(binding.service_identifier().clone(), binding.clone());
        binding
    }

    /// Drop every binding for `service_identifier` in this container.
    pub fn unbind(&self, service_identifier: &ServiceIdentifier) {
        self.lookup.remove(service_identifier);
    }

    /// Drop every binding in this container.
    pub fn unbind_all(&self) {
        self.lookup.clear();
    }

    /// Whether this container itself has a binding for the identifier.
    pub fn is_bound(&self, service_identifier: &ServiceIdentifier) -> bool {
        self.lookup.has_key(service_identifier)
    }

    /// Hierarchical lookup: this container's bindings, or the parent's if
    /// and only if this container has no entry at all for the identifier.
    /// Levels are never merged; one local binding fully shadows the parent.
    pub fn bindings_for(&self, service_identifier: &ServiceIdentifier) -> Vec<Arc<Binding>> {
        if self.lookup.has_key(service_identifier) {
            self.lookup.get(service_identifier)
        } else if let Some(parent) = self.parent() {
            parent.bindings_for(service_identifier)
        } else {
            Vec::new()
        }
    }
}
