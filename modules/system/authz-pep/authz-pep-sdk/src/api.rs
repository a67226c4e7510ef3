//! Public API trait for the authz PEP.

use async_trait::async_trait;

use crate::error::EnforcementError;
use crate::models::EnforcementRequest;
use crate::pep::Verdict;

/// Caller-facing enforcement API.
///
/// Implemented by the PEP module's local client and handed to the services
/// that guard repository operations:
///
/// ```ignore
/// let allowed = pep
///     .enforce(
///         EnforcementRequest::new("getDatastream", "API-A")
///             .subject(login_id)
///             .resource(pid, namespace),
///     )
///     .await?;
/// ```
#[async_trait]
pub trait PolicyEnforcementClient: Send + Sync {
    /// Decide whether the subject may perform the action on every resource.
    ///
    /// # Errors
    ///
    /// - `Operational` if a resource descriptor is malformed
    /// - `EngineUnavailable` if no engine is active or the engine is unreachable
    /// - `EvaluationFailed` if the engine fails instead of answering
    async fn enforce(&self, request: EnforcementRequest) -> Result<bool, EnforcementError>;

    /// Same as [`PolicyEnforcementClient::enforce`], returning the full verdict
    /// with per-decision counts for auditing.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyEnforcementClient::enforce`].
    async fn enforce_verdict(
        &self,
        request: EnforcementRequest,
    ) -> Result<Verdict, EnforcementError>;
}
