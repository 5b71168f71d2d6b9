//! Binding descriptors and their constraints.

pub mod binding;
pub mod constraint;

pub use binding::{
    ActivationFn, Binding, BindingId, BindingKind, BindingScope, CreatorFn, DynamicValueFn,
    ServiceValue,
};
pub use constraint::{Constraint, ConstraintFn};
