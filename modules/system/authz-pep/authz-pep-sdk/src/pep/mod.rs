//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`wrappers`] - build subject, action and resource attribute sets
//! - [`combiner`] - deny-biased reduction of engine results
//! - [`PolicyEnforcer`] - PEP object (wrap → evaluate → combine)
//! - [`TimeoutPdp`] - per-evaluation deadline for any engine

pub mod combiner;
pub mod enforcer;
pub mod timeout;
pub mod wrappers;

pub use combiner::{DecisionTally, DenyCause, combine, combine_batch};
pub use enforcer::{EnforcerError, PolicyEnforcer, Verdict};
pub use timeout::TimeoutPdp;
pub use wrappers::{OperationalError, wrap_action, wrap_resource, wrap_subject};
