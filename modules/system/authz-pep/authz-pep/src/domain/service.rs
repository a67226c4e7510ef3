//! Domain service for the authz PEP.

use authz_pep_sdk::{EnforcementRequest, Verdict};
use tracing::debug;

use super::engine_handle::EngineHandle;
use super::error::DomainError;

/// Enforcement service over the engine handle.
#[derive(Debug)]
pub struct Service {
    handle: EngineHandle,
}

impl Service {
    #[must_use]
    pub fn new(handle: EngineHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }

    /// Enforce one request and return the full verdict.
    ///
    /// The active engine is captured once, so every resource of the call is
    /// judged by the same engine even if a reload swaps it mid-call.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotActive`] if no engine is active
    /// - [`DomainError::Operational`] if a resource descriptor is malformed
    /// - engine failures
    #[tracing::instrument(
        skip_all,
        fields(action = %request.action_id, resource_count = request.resources.len(), generation)
    )]
    pub async fn enforce(&self, request: &EnforcementRequest) -> Result<Verdict, DomainError> {
        let active = self.handle.current().ok_or(DomainError::NotActive)?;
        tracing::Span::current().record("generation", active.generation());

        let verdict = active.enforcer().verdict(request).await?;
        debug!(
            allowed = verdict.allowed,
            generation = active.generation(),
            "Enforcement completed"
        );
        Ok(verdict)
    }
}
