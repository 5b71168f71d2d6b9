//! The binding registry.
//!
//! An ordered multi-map from service identifier to bindings. Per-identifier
//! insertion order is preserved and meaningful: it drives deterministic
//! ambiguity diagnostics and array-injection ordering. The map itself is a
//! `DashMap` so registration can happen from any thread; planning only ever
//! reads it, and registry mutation concurrent with an in-flight planning
//! call is undefined by contract.

use std::sync::Arc;

use dashmap::DashMap;

use crate::bindings::Binding;
use crate::identifier::ServiceIdentifier;

/// Container-owned registry of bindings.
#[derive(Debug, Default)]
pub struct Lookup {
    entries: DashMap<ServiceIdentifier, Vec<Arc<Binding>>>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding for `service_identifier`, preserving order.
    pub fn add(&self, service_identifier: ServiceIdentifier, binding: Arc<Binding>) {
        self.entries
            .entry(service_identifier)
            .or_default()
            .push(binding);
    }

    /// All bindings registered for `service_identifier`, in registration
    /// order. Empty if the identifier has no entry.
    pub fn get(&self, service_identifier: &ServiceIdentifier) -> Vec<Arc<Binding>> {
        self.entries
            .get(service_identifier)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn has_key(&self, service_identifier: &ServiceIdentifier) -> bool {
        self.entries.contains_key(service_identifier)
    }

    /// Drop every binding for `service_identifier`, returning the removed
    /// bindings.
    pub fn remove(&self, service_identifier: &ServiceIdentifier) -> Vec<Arc<Binding>> {
        self.entries
            .remove(service_identifier)
            .map(|(_, bindings)| bindings)
            .unwrap_or_default()
    }

    /// Remove every binding matching `condition`, dropping identifiers whose
    /// lists become empty. Returns the removed bindings.
    pub fn remove_by_condition(
        &self,
        condition: impl Fn(&Binding) -> bool,
    ) -> Vec<Arc<Binding>> {
        let mut removed = Vec::new();
        self.entries.retain(|_, bindings| {
            bindings.retain(|binding| {
                if condition(binding) {
                    removed.push(binding.clone());
                    false
                } else {
                    true
                }
            });
            !bindings.is_empty()
        });
        removed
    }

    /// Visit every entry. Iteration order across identifiers is unspecified;
    /// the binding lists themselves are in registration order.
    pub fn traverse(&self, mut visit: impl FnMut(&ServiceIdentifier, &[Arc<Binding>])) {
        for entry in self.entries.iter() {
            visit(entry.key(), entry.value());
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of identifiers with at least one binding.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Clone for Lookup {
    /// Shallow copy: the map structure is duplicated, the bindings are
    /// shared. Used for snapshotting.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
