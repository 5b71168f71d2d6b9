//! # Planestra
//!
//! The resolution planning core of an inversion-of-control container.
//!
//! Given a requested service identifier and a registry of bindings,
//! Planestra deterministically computes a *resolution plan*: a tree
//! describing which binding(s) satisfy the request and, transitively, every
//! binding needed to satisfy their own constructor dependencies — without
//! instantiating anything. The completed plan is consumed by an external
//! instantiation component that walks it bottom-up.
//!
//! ## Features
//!
//! - **Constraint-filtered selection**: user-supplied constraints
//!   disambiguate among multiple bindings, with full ancestry access
//! - **Multi-injection**: array targets resolve every matching binding, in
//!   registration order
//! - **Container hierarchy**: child containers fall back to their parent,
//!   with all-or-nothing shadowing
//! - **Deterministic cycle detection**: circular dependency chains are
//!   reported from the plan root instead of blowing the stack
//!
//! ## Quick Start
//!
//! ```rust
//! use planestra::{plan, Binding, Container, StaticDependencyProvider, Target, TargetKind};
//!
//! struct Katana;
//! struct Samurai;
//!
//! fn main() -> planestra::Result<()> {
//!     // 1. Register bindings.
//!     let container = Container::new();
//!     container.bind(Binding::to_instance::<Samurai>("Warrior".into()));
//!     container.bind(Binding::to_instance::<Katana>("Weapon".into()));
//!
//!     // 2. Declare constructor dependencies for constructible types.
//!     let provider = StaticDependencyProvider::new();
//!     provider.register::<Samurai>(vec![Target::new(
//!         TargetKind::ConstructorArgument,
//!         "Weapon".into(),
//!         None,
//!     )]);
//!
//!     // 3. Plan the resolution of "Warrior".
//!     let context = plan(
//!         &provider,
//!         container,
//!         false,
//!         TargetKind::Variable,
//!         "Warrior".into(),
//!         None,
//!         false,
//!     )?;
//!
//!     let root = context.root_request().expect("completed plan");
//!     assert_eq!(root.bindings().len(), 1);
//!     assert_eq!(root.children().len(), 1); // the Weapon dependency
//!     Ok(())
//! }
//! ```

pub mod bindings;
pub mod container;
pub mod diagnostics;
pub mod error;
pub mod identifier;
pub mod planning;
pub mod reflection;

// Re-export core types
pub use bindings::{Binding, BindingId, BindingKind, BindingScope, Constraint, ServiceValue};
pub use container::{Container, Lookup};
pub use error::{PlanningError, Result};
pub use identifier::{ServiceIdentifier, TypeKey};
pub use planning::{Metadata, Plan, PlanningContext, Request, RequestId, Target, TargetKind, plan};
pub use reflection::{DependencyProvider, StaticDependencyProvider};

/// Prelude module for convenient imports
///
/// ```
/// use planestra::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bindings::{
        ActivationFn, Binding, BindingId, BindingKind, BindingScope, Constraint, ConstraintFn,
        ServiceValue,
    };
    pub use crate::container::{Container, Lookup};
    pub use crate::error::{PlanningError, Result};
    pub use crate::identifier::{ServiceIdentifier, TypeKey};
    pub use crate::planning::{
        Metadata, Plan, PlanningContext, Request, RequestId, Target, TargetKind, plan,
    };
    pub use crate::reflection::{DependencyProvider, StaticDependencyProvider};
    pub use std::sync::Arc;
}
