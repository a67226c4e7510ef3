//! Local (in-process) client for the authz PEP.

use std::sync::Arc;

use async_trait::async_trait;
use authz_pep_sdk::{EnforcementError, EnforcementRequest, PolicyEnforcementClient, Verdict};

use super::{DomainError, Service};

/// Local client wrapping the service.
#[derive(Debug)]
pub struct PolicyEnforcementLocalClient {
    svc: Arc<Service>,
}

impl PolicyEnforcementLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> EnforcementError {
    tracing::error!(operation = op, error = %e, "authz_pep call failed");
    e.into()
}

#[async_trait]
impl PolicyEnforcementClient for PolicyEnforcementLocalClient {
    async fn enforce(&self, request: EnforcementRequest) -> Result<bool, EnforcementError> {
        self.svc
            .enforce(&request)
            .await
            .map(|verdict| verdict.allowed)
            .map_err(|e| log_and_convert("enforce", e))
    }

    async fn enforce_verdict(
        &self,
        request: EnforcementRequest,
    ) -> Result<Verdict, EnforcementError> {
        self.svc
            .enforce(&request)
            .await
            .map_err(|e| log_and_convert("enforce_verdict", e))
    }
}
