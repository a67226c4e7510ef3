//! Domain layer for the authz PEP.

pub mod engine_handle;
pub mod error;
pub mod local_client;
pub mod service;

pub use engine_handle::{ActiveEngine, EngineHandle, EngineState};
pub use error::DomainError;
pub use local_client::PolicyEnforcementLocalClient;
pub use service::Service;
