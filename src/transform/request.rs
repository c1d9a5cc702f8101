//! Inbound request → backend call shape.
//!
//! # Responsibilities
//! - Escape every caller header value
//! - Parse the raw body as JSON
//! - Inject the authorizer context after the caller headers
//!
//! # Design Decisions
//! - Caller headers whose names collide with a context key are dropped,
//!   never merged, so the context cannot be spoofed
//! - Repeated caller headers are combined with ","

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::auth::context::AuthContext;
use crate::transform::escape::escape_string;
use crate::transform::TransformError;

/// The caller's request, decoupled from the HTTP framework.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub method: String,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl InboundRequest {
    /// First value of the header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the backend receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedRequest {
    pub method: String,
    pub body: Value,
    /// Escaped header values plus the injected context fields.
    pub headers: BTreeMap<String, String>,
}

impl TransformedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Build the backend request from `request` and the authorizer `context`.
pub fn transform(
    request: &InboundRequest,
    context: &AuthContext,
) -> Result<TransformedRequest, TransformError> {
    let body = parse_body(&request.body)?;

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &request.headers {
        if AuthContext::is_reserved_key(name) {
            tracing::warn!(header = %name, "Dropping caller header that collides with authorizer context");
            continue;
        }
        let escaped = escape_string(value);
        headers
            .entry(name.clone())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&escaped);
            })
            .or_insert(escaped);
    }

    for (key, value) in context.fields() {
        headers.insert(key.to_string(), escape_string(&value));
    }

    Ok(TransformedRequest {
        method: request.method.clone(),
        body,
        headers,
    })
}

fn parse_body(raw: &[u8]) -> Result<Value, TransformError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(raw).map_err(TransformError::MalformedBody)
}
