//! HTTP backend: POSTs the transformed request as JSON.
//!
//! # Response mapping
//! - 2xx without `x-function-error` → `Success(body)`
//! - non-2xx, or `x-function-error` present → `Error(body)`
//! - bodies that are not JSON become JSON strings; error bodies that are not
//!   JSON objects are wrapped as `{"errorMessage": <text>}`

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;

use crate::backend::invoker::{BackendInvoker, InvokeError};
use crate::transform::{BackendResult, TransformedRequest};

/// Header a backend sets to report a function error with a 2xx status.
pub const FUNCTION_ERROR_HEADER: &str = "x-function-error";

const MAX_RESPONSE_BYTES: usize = 6 * 1024 * 1024;

/// Invokes a remote backend over HTTP/1.1.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client<HttpConnector, Body>,
    uri: Uri,
}

impl HttpBackend {
    pub fn new(url: &str) -> Result<Self, InvokeError> {
        let uri: Uri = url
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| InvokeError::Request(e.to_string()))?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { client, uri })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

#[async_trait]
impl BackendInvoker for HttpBackend {
    async fn invoke(&self, request: &TransformedRequest) -> Result<BackendResult, InvokeError> {
        let payload =
            serde_json::to_vec(request).map_err(|e| InvokeError::Request(e.to_string()))?;

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .map_err(|e| InvokeError::Request(e.to_string()))?;

        let response = self
            .client
            .request(req)
            .await
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        let status = response.status();
        let function_error = response.headers().contains_key(FUNCTION_ERROR_HEADER);
        let (_, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        tracing::debug!(
            uri = %self.uri,
            status = %status,
            function_error,
            bytes = bytes.len(),
            "Backend responded"
        );

        Ok(map_response(status.is_success() && !function_error, &bytes))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn map_response(success: bool, bytes: &[u8]) -> BackendResult {
    let parsed: Option<Value> = serde_json::from_slice(bytes).ok();
    let text = || String::from_utf8_lossy(bytes).into_owned();

    if success {
        return BackendResult::Success(parsed.unwrap_or_else(|| Value::String(text())));
    }

    match parsed {
        Some(value @ Value::Object(_)) => BackendResult::Error(value),
        Some(Value::String(message)) => BackendResult::error_message(message),
        _ => BackendResult::error_message(text()),
    }
}
