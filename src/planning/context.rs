//! Planning sessions.
//!
//! A [`PlanningContext`] scopes exactly one call to [`plan`](crate::plan):
//! it owns the request arena and, once the root request exists, the
//! completed [`Plan`]. Contexts are never reused across calls.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::container::Container;
use crate::planning::request::{Request, RequestArena, RequestId, RequestNode};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// The completed resolution tree, rooted at the originally requested target.
///
/// The context owning this plan holds the nodes themselves; the plan records
/// which arena entry is the root. Exactly one plan exists per context.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    root: RequestId,
}

impl Plan {
    pub(crate) fn new(root: RequestId) -> Self {
        Self { root }
    }

    pub fn root(&self) -> RequestId {
        self.root
    }
}

/// One planning session.
pub struct PlanningContext {
    id: u64,
    container: Arc<Container>,
    pub(crate) requests: RequestArena,
    plan: Option<Plan>,
}

impl PlanningContext {
    pub(crate) fn new(container: Arc<Container>) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            container,
            requests: RequestArena::default(),
            plan: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The container this session resolves against.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub(crate) fn add_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
    }

    /// The completed plan. Always present on a context returned by
    /// [`plan`](crate::plan); `None` only mid-session.
    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// View of the plan's root request.
    pub fn root_request(&self) -> Option<Request<'_>> {
        self.plan.map(|plan| self.request(plan.root()))
    }

    /// View of an arbitrary request in this session.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this context.
    pub fn request(&self, id: RequestId) -> Request<'_> {
        Request::new(self, self.node(id))
    }

    pub(crate) fn node(&self, id: RequestId) -> &RequestNode {
        self.requests.node(id)
    }
}

impl fmt::Debug for PlanningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningContext")
            .field("id", &self.id)
            .field("container", &self.container.id())
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_format_for_diagnostics() {
        let ctx = PlanningContext::new(Container::new());
        let formatted = format!("{ctx:?}");
        assert!(formatted.contains("PlanningContext"));
        assert!(formatted.contains("plan: None"));
    }
}
