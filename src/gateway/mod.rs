//! Gateway orchestration: identity, authorization, enforcement, transforms
//! and the backend call, in that order.

pub mod error;
pub mod identity;
pub mod orchestrator;

pub use error::GatewayError;
pub use identity::IdentitySource;
pub use orchestrator::{BuildError, Gateway};
