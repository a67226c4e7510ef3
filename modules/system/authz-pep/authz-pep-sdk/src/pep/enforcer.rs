//! Policy Enforcement Point (`PEP`) object.
//!
//! [`PolicyEnforcer`] encapsulates one enforcement pass:
//! wrap attributes → evaluate one request per resource → combine results.
//!
//! An enforcer is bound to a single engine instance. Building one per call
//! from the currently active engine guarantees that every resource of a batch
//! is judged by the same engine, even if the engine is replaced mid-call.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;

use crate::error::PdpError;
use crate::models::{EnforcementRequest, EvaluationRequest, EvaluationResult};
use crate::pep::combiner::{self, DecisionTally, DenyCause};
use crate::pep::wrappers::{OperationalError, wrap_action, wrap_resource, wrap_subject};
use crate::plugin_api::PolicyDecisionPoint;

/// Error from the PEP enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// A resource descriptor could not be wrapped.
    #[error(transparent)]
    Operational(#[from] OperationalError),

    /// The engine failed instead of returning a result.
    #[error("authorization evaluation failed: {0}")]
    EvaluationFailed(#[from] PdpError),
}

/// Outcome of an enforcement pass with everything needed to audit it.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub allowed: bool,
    pub tally: DecisionTally,
    /// One result per resource, in request order.
    pub results: Vec<EvaluationResult>,
}

impl Verdict {
    /// `None` when allowed, otherwise why the batch was blocked.
    ///
    /// A batch whose results permit overall but that has a resource without
    /// a permit is reported as [`DenyCause::NoPermit`].
    #[must_use]
    pub fn deny_cause(&self) -> Option<DenyCause> {
        if self.allowed {
            None
        } else {
            Some(self.tally.deny_cause().unwrap_or(DenyCause::NoPermit))
        }
    }
}

/// Policy Enforcement Point bound to one engine instance.
///
/// # Example
///
/// ```ignore
/// use authz_pep_sdk::{EnforcementRequest, pep::PolicyEnforcer};
///
/// let enforcer = PolicyEnforcer::new(engine);
/// let allowed = enforcer
///     .enforce(
///         &EnforcementRequest::new("getDatastream", "API-A")
///             .subject("fedoraAdmin")
///             .resource("obj:42", "example-ns"),
///     )
///     .await?;
/// ```
#[derive(Clone)]
pub struct PolicyEnforcer {
    engine: Arc<dyn PolicyDecisionPoint>,
}

impl PolicyEnforcer {
    #[must_use]
    pub fn new(engine: Arc<dyn PolicyDecisionPoint>) -> Self {
        Self { engine }
    }

    // ── Low-level: build requests only ───────────────────────────────

    /// Build one evaluation request per resource.
    ///
    /// Subject and action sets are wrapped once and shared by all requests.
    ///
    /// # Errors
    ///
    /// Returns [`OperationalError`] if any resource descriptor is malformed.
    pub fn build_requests(
        request: &EnforcementRequest,
    ) -> Result<Vec<EvaluationRequest>, OperationalError> {
        let subject = Arc::new(wrap_subject(request.subject_login_id.as_deref()));
        let action = Arc::new(wrap_action(
            &request.action_id,
            &request.action_api,
            &request.context_index,
        ));

        request
            .resources
            .iter()
            .map(|resource| {
                Ok(EvaluationRequest {
                    subject: Arc::clone(&subject),
                    action: Arc::clone(&action),
                    resource: wrap_resource(&resource.id, &resource.namespace)?,
                })
            })
            .collect()
    }

    // ── High-level: full PEP flow ────────────────────────────────────

    /// Execute the full PEP flow and return the verdict.
    ///
    /// All resources are wrapped before the engine is contacted, so a
    /// malformed descriptor aborts the call without engine traffic. Requests
    /// are evaluated concurrently; the first engine failure aborts the batch.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Operational`] if a resource descriptor is malformed
    /// - [`EnforcerError::EvaluationFailed`] if the engine fails for any resource
    #[tracing::instrument(
        skip_all,
        fields(action = %request.action_id, resource_count = request.resources.len())
    )]
    pub async fn verdict(&self, request: &EnforcementRequest) -> Result<Verdict, EnforcerError> {
        let requests = Self::build_requests(request)?;
        let results = try_join_all(requests.iter().map(|r| self.engine.evaluate(r))).await?;
        let tally = combiner::tally(&results);

        Ok(Verdict {
            allowed: combiner::combine_batch(&results),
            tally,
            results,
        })
    }

    /// Execute the full PEP flow and return only the allow/deny outcome.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyEnforcer::verdict`].
    pub async fn enforce(&self, request: &EnforcementRequest) -> Result<bool, EnforcerError> {
        Ok(self.verdict(request).await?.allowed)
    }
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer").finish_non_exhaustive()
    }
}
