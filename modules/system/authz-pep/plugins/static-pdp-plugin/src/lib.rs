//! Static PDP Plugin
//!
//! Rule-table decision engine for the authz PEP. Rules come from the plugin
//! configuration or from a YAML policy file that is re-read on every build.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::{PolicyDocument, StaticDecision, StaticPdpPluginConfig, StaticRule};
pub use module::StaticPdpFactory;
