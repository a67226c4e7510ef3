//! Client implementation for the static PDP plugin.

use async_trait::async_trait;
use authz_pep_sdk::{EvaluationRequest, EvaluationResult, PdpError, PolicyDecisionPoint};

use super::service::Service;

#[async_trait]
impl PolicyDecisionPoint for Service {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, PdpError> {
        Ok(Service::evaluate(self, request))
    }
}
