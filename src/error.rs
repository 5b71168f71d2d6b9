use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanningError>;

/// Errors raised while computing a resolution plan.
///
/// All of these abort the whole `plan()` call; none are recoverable inside
/// the planner. Missing registrations and ambiguity are configuration
/// errors, not transient failures, so there is no retry path.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("No matching bindings found for service identifier: {target}{registrations}")]
    NotRegistered { target: String, registrations: String },

    #[error("Ambiguous match found for service identifier: {identifier}{registrations}")]
    AmbiguousMatch {
        identifier: String,
        registrations: String,
    },

    #[error("Circular dependency found: {chain}")]
    CircularDependency { chain: String },

    /// A constraint predicate or reflection provider failed; the original
    /// message is preserved as-is.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}
