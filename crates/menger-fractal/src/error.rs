use thiserror::Error;

/// Failures reported by sponge generation and mesh assembly.
///
/// Every variant is raised before any result is handed back; inputs are never
/// mutated, so a failed call leaves the caller's data exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MengerError {
    /// Negative iteration count, non-positive extent, bad tolerance, ...
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A projected allocation is above the configured ceiling. `projected` saturates
    /// at `u64::MAX` when the true count does not fit.
    #[error("{what}: projected {projected} exceeds limit {limit}")]
    ResourceLimitExceeded {
        what: &'static str,
        projected: u64,
        limit: u64,
    },

    /// Internal bookkeeping went wrong (e.g. a face index past the vertex buffer).
    /// Callers should not try to recover from this.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The cancel token fired between subdivision rounds.
    #[error("cancelled after {completed_rounds} round(s)")]
    Cancelled { completed_rounds: u32 },
}

impl MengerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MengerError::InvalidArgument(msg.into())
    }
}
