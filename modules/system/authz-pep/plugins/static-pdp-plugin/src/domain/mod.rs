//! Domain layer for the static PDP plugin.

pub mod client;
pub mod service;

pub use service::Service;
