//! Binding constraints.
//!
//! A constraint disambiguates among multiple candidate bindings for the same
//! service identifier. The planner evaluates constraints only when there is
//! genuine ambiguity to resolve; a sole candidate is accepted without ever
//! consulting its constraint.
//!
//! The common cases are explicit variants dispatched by match; arbitrary
//! logic goes through [`Constraint::Custom`], which receives the candidate
//! [`Request`] and may walk its ancestry.

use std::fmt;
use std::sync::Arc;

use crate::identifier::ServiceIdentifier;
use crate::planning::request::Request;

/// User-supplied predicate over the candidate request.
pub type ConstraintFn = Arc<dyn Fn(&Request<'_>) -> anyhow::Result<bool> + Send + Sync>;

/// Predicate attached to a binding, consulted during ambiguity resolution.
#[derive(Clone, Default)]
pub enum Constraint {
    /// Matches every request. The default for new bindings.
    #[default]
    Always,
    /// The target carries this display name.
    TargetNamed(String),
    /// The target carries this tag.
    TargetTagged { key: String, value: String },
    /// The immediate parent request resolves this identifier.
    InjectedInto(ServiceIdentifier),
    /// Some request on the ancestor chain resolves this identifier.
    AnyAncestorIs(ServiceIdentifier),
    /// No request on the ancestor chain resolves this identifier.
    NoAncestorIs(ServiceIdentifier),
    /// Arbitrary predicate; failures abort the whole planning call.
    Custom(ConstraintFn),
}

impl Constraint {
    /// Evaluate against a candidate request carrying full ancestry access.
    pub fn evaluate(&self, request: &Request<'_>) -> anyhow::Result<bool> {
        match self {
            Self::Always => Ok(true),
            Self::TargetNamed(name) => Ok(request.target().matches_name(name)),
            Self::TargetTagged { key, value } => Ok(request.target().matches_tag(key, value)),
            Self::InjectedInto(identifier) => Ok(request
                .parent()
                .is_some_and(|parent| parent.service_identifier() == identifier)),
            Self::AnyAncestorIs(identifier) => Ok(request
                .ancestors()
                .any(|ancestor| ancestor.service_identifier() == identifier)),
            Self::NoAncestorIs(identifier) => Ok(!request
                .ancestors()
                .any(|ancestor| ancestor.service_identifier() == identifier)),
            Self::Custom(predicate) => predicate(request),
        }
    }

    /// Shorthand for a custom predicate.
    pub fn custom(
        predicate: impl Fn(&Request<'_>) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(Arc::new(predicate))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::TargetNamed(name) => write!(f, "named: \"{name}\""),
            Self::TargetTagged { key, value } => write!(f, "tagged: {key} = {value}"),
            Self::InjectedInto(identifier) => write!(f, "injected into: {identifier}"),
            Self::AnyAncestorIs(identifier) => write!(f, "any ancestor: {identifier}"),
            Self::NoAncestorIs(identifier) => write!(f, "no ancestor: {identifier}"),
            Self::Custom(_) => f.write_str("custom predicate"),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use crate::planning::context::{Plan, PlanningContext};
    use crate::planning::request::RequestNode;
    use crate::planning::target::{Target, TargetKind};

    // Builds a context holding a Warrior --> Weapon chain so tests can
    // probe constraints against real ancestry.
    fn context_with_chain() -> PlanningContext {
        let container = Container::new();
        let mut ctx = PlanningContext::new(container);
        let root_target = Target::new(TargetKind::Variable, "Warrior".into(), None);
        let root = ctx.requests.insert(RequestNode::new(
            "Warrior".into(),
            None,
            Vec::new(),
            root_target,
        ));
        ctx.add_plan(Plan::new(root));
        let weapon_target =
            Target::new(TargetKind::ConstructorArgument, "Weapon".into(), Some("sharp"))
                .tagged("power", "5");
        ctx.requests
            .add_child(root, "Weapon".into(), Vec::new(), weapon_target);
        ctx
    }

    fn weapon_request(ctx: &PlanningContext) -> Request<'_> {
        ctx.root_request()
            .expect("root request")
            .children()
            .pop()
            .expect("weapon child")
    }

    #[test]
    fn always_matches() {
        let ctx = context_with_chain();
        let request = weapon_request(&ctx);
        assert!(Constraint::Always.evaluate(&request).unwrap());
    }

    #[test]
    fn named_and_tagged_check_the_target() {
        let ctx = context_with_chain();
        let request = weapon_request(&ctx);
        assert!(Constraint::TargetNamed("sharp".into())
            .evaluate(&request)
            .unwrap());
        assert!(!Constraint::TargetNamed("blunt".into())
            .evaluate(&request)
            .unwrap());
        assert!(Constraint::TargetTagged {
            key: "power".into(),
            value: "5".into()
        }
        .evaluate(&request)
        .unwrap());
    }

    #[test]
    fn ancestry_variants_walk_the_parent_chain() {
        let ctx = context_with_chain();
        let request = weapon_request(&ctx);
        assert!(Constraint::InjectedInto("Warrior".into())
            .evaluate(&request)
            .unwrap());
        assert!(Constraint::AnyAncestorIs("Warrior".into())
            .evaluate(&request)
            .unwrap());
        assert!(Constraint::NoAncestorIs("Ninja".into())
            .evaluate(&request)
            .unwrap());
        assert!(!Constraint::NoAncestorIs("Warrior".into())
            .evaluate(&request)
            .unwrap());
    }

    #[test]
    fn custom_predicates_see_the_request() {
        let ctx = context_with_chain();
        let request = weapon_request(&ctx);
        let constraint =
            Constraint::custom(|request| Ok(request.target().is_named() && request.parent().is_some()));
        assert!(constraint.evaluate(&request).unwrap());
    }

    #[test]
    fn custom_predicate_errors_surface() {
        let ctx = context_with_chain();
        let request = weapon_request(&ctx);
        let constraint = Constraint::custom(|_| anyhow::bail!("metadata service unavailable"));
        let err = constraint.evaluate(&request).unwrap_err();
        assert_eq!(err.to_string(), "metadata service unavailable");
    }
}
