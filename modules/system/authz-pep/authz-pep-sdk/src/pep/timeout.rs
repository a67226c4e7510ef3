//! Deadline decorator for decision engines.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::PdpError;
use crate::models::{Decision, EvaluationRequest, EvaluationResult};
use crate::plugin_api::PolicyDecisionPoint;

/// Wraps an engine with a per-evaluation deadline.
///
/// An evaluation that misses the deadline yields an `Indeterminate` result
/// rather than an error, so the batch fails safe through the combiner instead
/// of hanging.
pub struct TimeoutPdp {
    inner: Arc<dyn PolicyDecisionPoint>,
    deadline: Duration,
}

impl TimeoutPdp {
    #[must_use]
    pub fn new(inner: Arc<dyn PolicyDecisionPoint>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl PolicyDecisionPoint for TimeoutPdp {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, PdpError> {
        if let Ok(result) = tokio::time::timeout(self.deadline, self.inner.evaluate(request)).await
        {
            result
        } else {
            let resource_id = request.resource.resource_id();
            let deadline_ms = self.deadline.as_millis();
            warn!(resource_id, deadline_ms, "decision engine missed its deadline");
            Ok(EvaluationResult::new(Decision::Indeterminate)
                .for_resource(resource_id)
                .with_status(format!("evaluation exceeded {deadline_ms} ms")))
        }
    }
}

impl std::fmt::Debug for TimeoutPdp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutPdp")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
