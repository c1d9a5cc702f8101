//! Backend invocation boundary.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::transform::{BackendResult, TransformedRequest};

/// Failures to obtain any result from the backend.
///
/// An error reported *by* the backend is not an `InvokeError`; it arrives as
/// [`BackendResult::Error`].
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The backend could not be reached or the exchange broke off.
    #[error("backend request failed: {0}")]
    Transport(String),

    /// The call did not complete within its deadline.
    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    /// The outgoing request could not be built.
    #[error("invalid backend request: {0}")]
    Request(String),
}

/// Executes the backend operation for a transformed request.
#[async_trait]
pub trait BackendInvoker: Send + Sync {
    async fn invoke(&self, request: &TransformedRequest) -> Result<BackendResult, InvokeError>;

    /// Short name for logs and metrics.
    fn name(&self) -> &'static str;
}
