//! Plan construction.
//!
//! Given a container and a requested service identifier, [`plan`] computes
//! the full resolution tree — which bindings satisfy the request and,
//! transitively, every binding needed by their constructor dependencies —
//! without instantiating anything. The returned context is handed to the
//! external instantiator, which walks the tree bottom-up.

use std::sync::Arc;

use crate::bindings::{Binding, BindingKind};
use crate::container::Container;
use crate::diagnostics::{
    list_metadata_for_target, list_registered_bindings, service_identifier_string,
};
use crate::error::{PlanningError, Result};
use crate::identifier::ServiceIdentifier;
use crate::planning::context::{Plan, PlanningContext};
use crate::planning::request::{Request, RequestId, RequestNode};
use crate::planning::target::{Metadata, Target, TargetKind};
use crate::reflection::DependencyProvider;

/// Compute a resolution plan for `service_identifier`.
///
/// Opens a fresh [`PlanningContext`], builds the root [`Target`] (carrying
/// the implicit single/multi-inject tag and, when given, the explicit tag)
/// and expands requests recursively until every transitive dependency is
/// resolved. On success the returned context holds the completed plan; on
/// failure no partial plan escapes.
///
/// `avoid_constraints` bypasses constraint filtering for the root request
/// only; recursive expansion always applies constraints.
pub fn plan(
    provider: &dyn DependencyProvider,
    container: Arc<Container>,
    multi_inject: bool,
    target_kind: TargetKind,
    service_identifier: ServiceIdentifier,
    tag: Option<Metadata>,
    avoid_constraints: bool,
) -> Result<PlanningContext> {
    tracing::debug!("Planning resolution of: {}", service_identifier);
    let target = create_target(multi_inject, target_kind, service_identifier, tag);
    let mut ctx = PlanningContext::new(container);
    expand(provider, &mut ctx, avoid_constraints, None, &target)?;
    tracing::debug!(
        "Plan completed for: {}",
        ctx.root_request()
            .map(|root| root.service_identifier().to_string())
            .unwrap_or_default()
    );
    Ok(ctx)
}

fn create_target(
    multi_inject: bool,
    target_kind: TargetKind,
    service_identifier: ServiceIdentifier,
    tag: Option<Metadata>,
) -> Target {
    let target = if multi_inject {
        Target::multi(target_kind, service_identifier, None)
    } else {
        Target::new(target_kind, service_identifier, None)
    };
    match tag {
        Some(metadata) => target.tagged(metadata.key().to_owned(), metadata.value().to_owned()),
        None => target,
    }
}

/// Pick the bindings that satisfy `target`, filtering by constraint only
/// when there is genuine ambiguity to resolve.
///
/// Each candidate's constraint is evaluated against a detached probe request
/// wired to the real parent, giving the predicate full ancestry access
/// without mutating the tree under construction.
fn select_active_bindings(
    ctx: &PlanningContext,
    avoid_constraints: bool,
    parent: Option<RequestId>,
    target: &Target,
) -> Result<Vec<Arc<Binding>>> {
    let candidates = ctx.container().bindings_for(target.service_identifier());

    let active = if candidates.len() > 1 && !avoid_constraints {
        let mut survivors = Vec::with_capacity(candidates.len());
        for binding in &candidates {
            let probe = RequestNode::new(
                binding.service_identifier().clone(),
                parent,
                vec![binding.clone()],
                target.clone(),
            );
            let request = Request::new(ctx, &probe);
            if binding.constraint().evaluate(&request)? {
                survivors.push(binding.clone());
            }
        }
        survivors
    } else {
        // sole candidate, or constraints explicitly bypassed
        candidates
    };

    validate_active_bindings(ctx.container(), target, &active)?;
    Ok(active)
}

/// Classify the surviving binding count against the target's cardinality.
fn validate_active_bindings(
    container: &Container,
    target: &Target,
    active: &[Arc<Binding>],
) -> Result<()> {
    match active.len() {
        0 => Err(PlanningError::NotRegistered {
            target: list_metadata_for_target(target),
            registrations: list_registered_bindings(container, target.service_identifier()),
        }),
        1 => Ok(()),
        _ if target.is_array() => Ok(()),
        _ => Err(PlanningError::AmbiguousMatch {
            identifier: service_identifier_string(target.service_identifier()),
            registrations: list_registered_bindings(container, target.service_identifier()),
        }),
    }
}

/// Recursively expand the request tree under `parent` for `target`.
fn expand(
    provider: &dyn DependencyProvider,
    ctx: &mut PlanningContext,
    avoid_constraints: bool,
    parent: Option<RequestId>,
    target: &Target,
) -> Result<()> {
    tracing::trace!("Expanding request for: {}", target.service_identifier());
    if let Some(parent_id) = parent {
        ensure_acyclic(ctx, parent_id, target)?;
    }

    let active = select_active_bindings(ctx, avoid_constraints, parent, target)?;

    let request_id = match parent {
        None => {
            let root = ctx.requests.insert(RequestNode::new(
                target.service_identifier().clone(),
                None,
                active.clone(),
                target.clone(),
            ));
            ctx.add_plan(Plan::new(root));
            root
        }
        Some(parent_id) => ctx.requests.add_child(
            parent_id,
            target.service_identifier().clone(),
            active.clone(),
            target.clone(),
        ),
    };

    for binding in &active {
        // Array targets root one subtree per binding so every element keeps
        // its own request; single targets reuse the node created above.
        let subtree_root = if target.is_array() {
            ctx.requests.add_child(
                request_id,
                binding.service_identifier().clone(),
                vec![binding.clone()],
                target.clone(),
            )
        } else {
            request_id
        };

        if let BindingKind::Instance { implementation } = binding.kind() {
            let dependencies = provider.dependencies_of(implementation)?;
            for dependency in &dependencies {
                expand(provider, ctx, false, Some(subtree_root), dependency)?;
            }
        }
    }

    Ok(())
}

/// Deterministic cycle detection: a target that already appears on its
/// ancestor path would select the same bindings and expand forever, so it
/// is rejected up front with the chain reconstructed from the plan root.
///
/// The comparison covers the whole injection point, not just the
/// identifier: the same identifier can legitimately reappear under a
/// different name or tags, where constraint filtering may select a
/// non-recursing binding.
fn ensure_acyclic(ctx: &PlanningContext, parent: RequestId, target: &Target) -> Result<()> {
    let mut current = Some(parent);
    while let Some(id) = current {
        let node = ctx.node(id);
        if same_injection_point(&node.target, target) {
            return Err(PlanningError::CircularDependency {
                chain: dependency_chain(ctx, parent, target),
            });
        }
        current = node.parent;
    }
    Ok(())
}

/// Two targets describe the same injection point when they request the same
/// identifier under the same name and tags. Kind is ignored: a variable
/// request and a constructor argument for the same point expand identically.
fn same_injection_point(a: &Target, b: &Target) -> bool {
    a.service_identifier() == b.service_identifier()
        && a.name() == b.name()
        && a.metadata() == b.metadata()
}

fn dependency_chain(ctx: &PlanningContext, parent: RequestId, target: &Target) -> String {
    let mut identifiers = vec![service_identifier_string(target.service_identifier())];
    let mut current = Some(parent);
    while let Some(id) = current {
        let node = ctx.node(id);
        identifiers.push(service_identifier_string(&node.service_identifier));
        current = node.parent;
    }
    identifiers.reverse();
    identifiers.join(" --> ")
}
