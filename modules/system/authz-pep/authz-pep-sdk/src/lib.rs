#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` PEP SDK
//!
//! This crate provides the public API for the `authz_pep` module:
//!
//! - [`PolicyEnforcementClient`] - Public API trait for consumers
//! - [`PolicyDecisionPoint`], [`PdpFactory`] - Engine boundary for implementations
//! - [`EnforcementRequest`], [`EvaluationRequest`], [`EvaluationResult`] - Models
//! - [`attributes`] - Closed attribute id set and attribute containers
//! - [`EnforcementError`], [`PdpError`] - Error types
//! - [`pep`] - PEP helpers ([`PolicyEnforcer`], wrappers, combiner)
//!
//! ## Usage
//!
//! ```ignore
//! use authz_pep_sdk::{EnforcementRequest, PolicyEnforcementClient};
//!
//! // Handed out by the authz PEP module
//! let pep: Arc<dyn PolicyEnforcementClient> = point.client();
//!
//! let allowed = pep
//!     .enforce(
//!         EnforcementRequest::for_context(&ctx, "getDatastream", "API-A")
//!             .resource("obj:42", "example-ns"),
//!     )
//!     .await?;
//! ```

pub mod api;
pub mod attributes;
pub mod error;
pub mod models;
pub mod pep;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::PolicyEnforcementClient;
pub use attributes::{Attribute, AttributeSet, DataType, attribute_ids};
pub use error::{EnforcementError, PdpError};
pub use models::{
    ActionAttributes, Decision, EnforcementRequest, EvaluationRequest, EvaluationResult,
    ResourceAttributes, ResourceRef, SubjectAttributes,
};
pub use pep::{DecisionTally, DenyCause, EnforcerError, PolicyEnforcer, TimeoutPdp, Verdict};
pub use plugin_api::{PdpFactory, PolicyDecisionPoint};
