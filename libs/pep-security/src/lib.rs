#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request context consumed by the policy enforcement point.
//!
//! - [`RequestContext`] - read-only view of the caller's request attributes
//! - [`SecurityContext`] - concrete context built by the authentication layer
//! - [`StaticContext`] - fixed-identity stand-in for tests and tooling

pub mod constants;
pub mod context;
pub mod static_context;

pub use context::{AttributeCategory, RequestContext, SecurityContext, SecurityContextBuilder};
pub use static_context::StaticContext;
