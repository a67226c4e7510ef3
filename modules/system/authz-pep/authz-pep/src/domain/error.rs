//! Domain errors for the authz PEP.

use authz_pep_sdk::{EnforcementError, EnforcerError, PdpError};

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("decision engine is not active")]
    NotActive,

    #[error("failed to build decision engine '{engine}': {source}")]
    BuildFailed {
        engine: String,
        #[source]
        source: PdpError,
    },

    #[error("authorization operational error: {0}")]
    Operational(String),

    #[error("decision engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),
}

impl From<PdpError> for DomainError {
    fn from(e: PdpError) -> Self {
        match e {
            PdpError::ServiceUnavailable(msg) => Self::EngineUnavailable(msg),
            PdpError::InvalidConfiguration(_) | PdpError::Internal(_) => {
                Self::EvaluationFailed(e.to_string())
            }
        }
    }
}

impl From<EnforcerError> for DomainError {
    fn from(e: EnforcerError) -> Self {
        match e {
            EnforcerError::Operational(op) => Self::Operational(op.reason),
            EnforcerError::EvaluationFailed(pdp) => pdp.into(),
        }
    }
}

impl From<DomainError> for EnforcementError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Operational(reason) => Self::Operational { reason },
            DomainError::NotActive | DomainError::BuildFailed { .. } => {
                Self::EngineUnavailable(e.to_string())
            }
            DomainError::EngineUnavailable(reason) => Self::EngineUnavailable(reason),
            DomainError::EvaluationFailed(reason) => Self::EvaluationFailed(reason),
        }
    }
}
