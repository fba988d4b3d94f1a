/// Convenience result type used across pixgraph.
pub type PixgraphResult<T> = Result<T, PixgraphError>;

/// Top-level error taxonomy used by graph and dispatch APIs.
#[derive(thiserror::Error, Debug)]
pub enum PixgraphError {
    /// The caller broke the node protocol (unknown output pad, undeclared input pad).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Every input an operation needs is absent.
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    /// A format or color space could not be resolved. Reported as a diagnostic, not a failure.
    #[error("unresolved format: {0}")]
    UnresolvedFormat(String),

    /// The buffer store refused or could not satisfy an allocation.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Invalid parameter values or buffer shapes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Structural graph errors (unknown node, unknown pad, cycles).
    #[error("graph error: {0}")]
    Graph(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixgraphError {
    /// Build a [`PixgraphError::ContractViolation`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Build a [`PixgraphError::MissingRequiredInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingRequiredInput(msg.into())
    }

    /// Build a [`PixgraphError::UnresolvedFormat`] value.
    pub fn unresolved(msg: impl Into<String>) -> Self {
        Self::UnresolvedFormat(msg.into())
    }

    /// Build a [`PixgraphError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`PixgraphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixgraphError::Graph`] value.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
