//! Timeout enforcement for backend calls.
//!
//! The backend call is the only suspension point of a request; it always
//! runs under a deadline. Timed-out calls surface as 504 Gateway Timeout.
//! There are no retries.

use std::time::Duration;

use crate::backend::{BackendInvoker, InvokeError};
use crate::transform::{BackendResult, TransformedRequest};

/// Invoke `invoker`, giving up after `limit`.
///
/// Dropping the in-flight call on timeout leaves no side effects behind.
pub async fn invoke_with_timeout(
    invoker: &dyn BackendInvoker,
    request: &TransformedRequest,
    limit: Duration,
) -> Result<BackendResult, InvokeError> {
    match tokio::time::timeout(limit, invoker.invoke(request)).await {
        Ok(result) => result,
        Err(_) => Err(InvokeError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct SlowBackend(Duration);

    #[async_trait]
    impl BackendInvoker for SlowBackend {
        async fn invoke(&self, _: &TransformedRequest) -> Result<BackendResult, InvokeError> {
            tokio::time::sleep(self.0).await;
            Ok(BackendResult::Success(serde_json::json!("late")))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn request() -> TransformedRequest {
        TransformedRequest {
            method: "POST".to_string(),
            body: serde_json::json!({}),
            headers: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_completes_within_limit() {
        let backend = SlowBackend(Duration::from_millis(5));
        let result = invoke_with_timeout(&backend, &request(), Duration::from_secs(1)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_times_out() {
        let backend = SlowBackend(Duration::from_secs(5));
        let limit = Duration::from_millis(20);
        let result = invoke_with_timeout(&backend, &request(), limit).await;
        assert!(matches!(result, Err(InvokeError::Timeout(d)) if d == limit));
    }
}
