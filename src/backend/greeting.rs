//! In-process greeting backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::invoker::{BackendInvoker, InvokeError};
use crate::transform::{BackendResult, TransformedRequest};

pub const DEFAULT_GREETING: &str = "Hello from Lambda!";

/// Logs the request it receives and answers with a fixed greeting.
#[derive(Debug, Clone)]
pub struct GreetingBackend {
    greeting: String,
}

impl GreetingBackend {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

impl Default for GreetingBackend {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

#[async_trait]
impl BackendInvoker for GreetingBackend {
    async fn invoke(&self, request: &TransformedRequest) -> Result<BackendResult, InvokeError> {
        tracing::debug!(method = %request.method, body = %request.body, "Greeting backend invoked");
        tracing::debug!(headers = ?request.headers, "Greeting backend headers");

        Ok(BackendResult::Success(Value::String(self.greeting.clone())))
    }

    fn name(&self) -> &'static str {
        "greeting"
    }
}
