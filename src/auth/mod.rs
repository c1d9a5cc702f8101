//! Authorization subsystem.
//!
//! # Data Flow
//! ```text
//! identity header token
//!     → authorizer.rs (token → Allow / Deny / Unauthorized)
//!     → policy.rs (effect + resource → PolicyDocument)
//!     → context.rs (cookie, userId, randomContext)
//!     → enforcement.rs (PolicyDocument vs invoked resource)
//! ```
//!
//! # Design Decisions
//! - Every request is re-authorized; nothing is cached
//! - Unknown tokens fail closed (Deny)
//! - Randomness is injected so tests can pin context values

pub mod authorizer;
pub mod context;
pub mod enforcement;
pub mod policy;

pub use authorizer::{AuthDecision, AuthorizerResponse, TokenAuthorizer, TokenKind};
pub use context::{AuthContext, RandomSource, SequenceRandom, ThreadRandom};
pub use enforcement::{enforce, Denial};
pub use policy::{Effect, PolicyDocument, PolicyStatement};
