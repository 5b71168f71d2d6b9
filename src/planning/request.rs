//! Nodes of the resolution tree.
//!
//! Requests live in an arena owned by the [`PlanningContext`]; the tree is
//! addressed by [`RequestId`] internally and exposed through the borrowing
//! [`Request`] view, which is what constraint predicates and the external
//! instantiator see. The view preserves the ancestry-traversal contract:
//! parent chain, target metadata and the originating context are all
//! reachable from any node.

use std::fmt;
use std::sync::Arc;

use crate::bindings::Binding;
use crate::identifier::ServiceIdentifier;
use crate::planning::context::PlanningContext;
use crate::planning::target::Target;

/// Handle to one request inside its context's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct RequestNode {
    pub(crate) service_identifier: ServiceIdentifier,
    pub(crate) target: Target,
    pub(crate) bindings: Vec<Arc<Binding>>,
    pub(crate) parent: Option<RequestId>,
    pub(crate) children: Vec<RequestId>,
}

impl RequestNode {
    pub(crate) fn new(
        service_identifier: ServiceIdentifier,
        parent: Option<RequestId>,
        bindings: Vec<Arc<Binding>>,
        target: Target,
    ) -> Self {
        Self {
            service_identifier,
            target,
            bindings,
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RequestArena {
    nodes: Vec<RequestNode>,
}

impl RequestArena {
    pub(crate) fn insert(&mut self, node: RequestNode) -> RequestId {
        let id = RequestId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Insert a node and link it under `parent`, preserving child order.
    pub(crate) fn add_child(
        &mut self,
        parent: RequestId,
        service_identifier: ServiceIdentifier,
        bindings: Vec<Arc<Binding>>,
        target: Target,
    ) -> RequestId {
        let child = self.insert(RequestNode::new(
            service_identifier,
            Some(parent),
            bindings,
            target,
        ));
        self.nodes[parent.0].children.push(child);
        child
    }

    pub(crate) fn node(&self, id: RequestId) -> &RequestNode {
        &self.nodes[id.0]
    }
}

/// Borrowing view over one request node.
#[derive(Clone, Copy)]
pub struct Request<'a> {
    ctx: &'a PlanningContext,
    node: &'a RequestNode,
}

impl<'a> Request<'a> {
    pub(crate) fn new(ctx: &'a PlanningContext, node: &'a RequestNode) -> Self {
        Self { ctx, node }
    }

    pub fn service_identifier(&self) -> &'a ServiceIdentifier {
        &self.node.service_identifier
    }

    pub fn target(&self) -> &'a Target {
        &self.node.target
    }

    /// The bindings selected for this request. At least one after successful
    /// planning.
    pub fn bindings(&self) -> &'a [Arc<Binding>] {
        &self.node.bindings
    }

    /// The parent request; `None` only for the plan root.
    pub fn parent(&self) -> Option<Request<'a>> {
        self.node
            .parent
            .map(|id| Request::new(self.ctx, self.ctx.node(id)))
    }

    /// Child requests, in creation order.
    pub fn children(&self) -> Vec<Request<'a>> {
        self.node
            .children
            .iter()
            .map(|&id| Request::new(self.ctx, self.ctx.node(id)))
            .collect()
    }

    /// Walks the parent chain, nearest ancestor first.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            current: self.parent(),
        }
    }

    /// The planning session this request belongs to.
    pub fn context(&self) -> &'a PlanningContext {
        self.ctx
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("service_identifier", &self.node.service_identifier)
            .field("bindings", &self.node.bindings.len())
            .field("children", &self.node.children.len())
            .finish()
    }
}

/// Iterator over a request's ancestor chain.
pub struct Ancestors<'a> {
    current: Option<Request<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Request<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.parent();
        Some(current)
    }
}
