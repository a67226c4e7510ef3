//! `AuthZ` PEP module.

use std::sync::Arc;

use authz_pep_sdk::{
    EnforcementError, EnforcementRequest, PdpFactory, PolicyEnforcementClient, ResourceRef,
    Verdict,
};
use pep_security::RequestContext;
use tracing::info;

use crate::config::AuthzPepConfig;
use crate::domain::{EngineHandle, EngineState, PolicyEnforcementLocalClient, Service};

/// `AuthZ` policy enforcement point.
///
/// Owns the decision engine lifecycle:
/// 1. `activate` builds the first engine from the factory
/// 2. `reload_policy` builds a new engine and swaps it in atomically
/// 3. `deactivate` drops the engine; enforcement then fails as unavailable
///
/// Enforcement calls never wait on a lifecycle operation.
pub struct PolicyEnforcementPoint {
    cfg: AuthzPepConfig,
    service: Arc<Service>,
    client: Arc<PolicyEnforcementLocalClient>,
}

impl PolicyEnforcementPoint {
    #[must_use]
    pub fn new(cfg: AuthzPepConfig, factory: Arc<dyn PdpFactory>) -> Self {
        let svc = Arc::new(Service::new(EngineHandle::new(
            factory,
            cfg.evaluation_timeout,
        )));
        let client = Arc::new(PolicyEnforcementLocalClient::new(Arc::clone(&svc)));
        Self {
            cfg,
            service: svc,
            client,
        }
    }

    /// Build the decision engine and start accepting enforcement calls.
    ///
    /// Returns the generation of the active engine.
    ///
    /// # Errors
    ///
    /// Fails if the engine cannot be built.
    #[tracing::instrument(skip_all, fields(engine = %self.cfg.engine))]
    pub async fn activate(&self) -> anyhow::Result<u64> {
        let generation = self.service.handle().initialize().await?;
        info!(
            generation,
            evaluation_timeout_ms = self.cfg.evaluation_timeout.map(|d| d.as_millis()),
            "Policy enforcement point activated"
        );
        Ok(generation)
    }

    /// Rebuild the decision engine from its configuration.
    ///
    /// # Errors
    ///
    /// Fails if the point is not active or the new engine cannot be built.
    /// On failure the current engine stays active.
    #[tracing::instrument(skip_all, fields(engine = %self.cfg.engine))]
    pub async fn reload_policy(&self) -> anyhow::Result<u64> {
        Ok(self.service.handle().reload().await?)
    }

    /// Drop the decision engine.
    #[tracing::instrument(skip_all, fields(engine = %self.cfg.engine))]
    pub async fn deactivate(&self) {
        if self.service.handle().teardown().await {
            info!("Policy enforcement point deactivated");
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.service.handle().state()
    }

    /// Caller-facing client, for handing to guarded services.
    #[must_use]
    pub fn client(&self) -> Arc<dyn PolicyEnforcementClient> {
        self.client.clone()
    }

    /// Decide whether the subject may perform the action on every resource.
    ///
    /// # Errors
    ///
    /// - `Operational` if a resource descriptor is malformed
    /// - `EngineUnavailable` before `activate`, after `deactivate`, or when
    ///   the engine is unreachable
    /// - `EvaluationFailed` if the engine fails instead of answering
    pub async fn enforce(&self, request: EnforcementRequest) -> Result<bool, EnforcementError> {
        self.client.enforce(request).await
    }

    /// Same as [`PolicyEnforcementPoint::enforce`], returning the full verdict.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyEnforcementPoint::enforce`].
    pub async fn enforce_verdict(
        &self,
        request: EnforcementRequest,
    ) -> Result<Verdict, EnforcementError> {
        self.client.enforce_verdict(request).await
    }

    /// Enforce with the subject taken from the request context.
    ///
    /// # Errors
    ///
    /// Same as [`PolicyEnforcementPoint::enforce`].
    pub async fn enforce_in_context(
        &self,
        ctx: &dyn RequestContext,
        action_id: &str,
        action_api: &str,
        context_index: &str,
        resources: Vec<ResourceRef>,
    ) -> Result<bool, EnforcementError> {
        let request = EnforcementRequest::for_context(ctx, action_id, action_api)
            .context_index(context_index)
            .resources(resources);
        self.enforce(request).await
    }
}

impl std::fmt::Debug for PolicyEnforcementPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcementPoint")
            .field("engine", &self.cfg.engine)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
