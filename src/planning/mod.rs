//! The planning core: targets, requests, contexts and the planner itself.

pub mod context;
pub mod planner;
pub mod request;
pub mod target;

pub use context::{Plan, PlanningContext};
pub use planner::plan;
pub use request::{Ancestors, Request, RequestId};
pub use target::{INJECT_TAG, MULTI_INJECT_TAG, NAMED_TAG, Metadata, Target, TargetKind};
