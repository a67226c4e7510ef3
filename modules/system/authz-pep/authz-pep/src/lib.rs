//! `AuthZ` PEP Module
//!
//! This module owns the active decision engine, swaps it atomically on policy
//! reload, and enforces deny-biased decisions over batches of resources.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::AuthzPepConfig;
pub use domain::EngineState;
pub use module::PolicyEnforcementPoint;
