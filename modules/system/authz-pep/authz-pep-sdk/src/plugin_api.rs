//! Decision engine traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PdpError;
use crate::models::{EvaluationRequest, EvaluationResult};

/// A policy decision point.
///
/// Any engine satisfying this contract (embedded, remote, mock) can back the
/// enforcement point. Implementations must be safe to call concurrently.
#[async_trait]
pub trait PolicyDecisionPoint: Send + Sync {
    /// Evaluate one request against the engine's current policy.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the engine cannot be reached
    /// - `Internal` for unexpected engine failures
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, PdpError>;
}

/// Immutable engine configuration that can build fresh engine instances.
///
/// The enforcement point calls [`PdpFactory::build`] on activation and again
/// on every policy reload.
#[async_trait]
pub trait PdpFactory: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Build a new, fully initialized engine instance.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the policy source is missing or malformed
    /// - `ServiceUnavailable` if a remote engine cannot be reached
    async fn build(&self) -> Result<Arc<dyn PolicyDecisionPoint>, PdpError>;
}
