//! Request and response transformation.
//!
//! # Data Flow
//! ```text
//! InboundRequest + AuthContext
//!     → request.rs (escape headers, parse body, inject context)
//!     → TransformedRequest → backend
//!
//! BackendResult + AuthContext
//!     → response.rs (select ok/error branch, render body, fixed headers)
//!     → ClientResponse → caller
//! ```

pub mod escape;
pub mod request;
pub mod response;

use thiserror::Error;

pub use escape::escape_string;
pub use request::{transform as transform_request, InboundRequest, TransformedRequest};
pub use response::{BackendResult, ClientResponse, ResponseState, ResponseTransformer};

/// Errors raised while transforming a request or response.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The caller's body is not valid JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// A value could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
