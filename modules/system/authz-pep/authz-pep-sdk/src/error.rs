//! Error types for the authz PEP.

use thiserror::Error;

/// Errors raised at the decision engine boundary.
///
/// A decision the engine could not reach is not an error: it is reported as
/// an `Indeterminate` result and folded into the deny-biased combiner.
#[derive(Debug, Clone, Error)]
pub enum PdpError {
    /// The engine (or the remote service behind it) cannot be reached.
    #[error("decision engine unavailable: {0}")]
    ServiceUnavailable(String),

    /// The engine could not be built from its configuration.
    #[error("invalid engine configuration: {0}")]
    InvalidConfiguration(String),

    /// An internal engine error occurred.
    #[error("internal engine error: {0}")]
    Internal(String),
}

/// Errors returned by the public enforcement API.
///
/// Access denial is expressed as `Ok(false)`, never as an error variant.
/// `EngineUnavailable` and `EvaluationFailed` both mean "cannot determine";
/// callers that do not distinguish them from a deny must still not treat them
/// as an allow.
#[derive(Debug, Clone, Error)]
pub enum EnforcementError {
    /// Malformed input to the attribute wrappers.
    #[error("authorization operational error: {reason}")]
    Operational { reason: String },

    /// No decision engine is active, or the engine reported itself unreachable.
    #[error("decision engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine failed instead of returning a result.
    #[error("authorization evaluation failed: {0}")]
    EvaluationFailed(String),
}
