//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Convert the framework request into an [`InboundRequest`]
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Non-UTF-8 header values are converted lossily rather than rejected

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::transform::InboundRequest;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of `parts`, or `"unknown"`.
pub fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the framework-independent request handed to the gateway.
pub fn inbound_request(parts: &Parts, body: Bytes) -> InboundRequest {
    InboundRequest {
        method: parts.method.to_string(),
        headers: parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_inbound_request() {
        let (parts, _) = Request::builder()
            .method("POST")
            .uri("/")
            .header("x-authorization-header", "allow")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let inbound = inbound_request(&parts, Bytes::from_static(b"{}"));
        assert_eq!(inbound.method, "POST");
        assert_eq!(inbound.header("X-Authorization-Header"), Some("allow"));
        assert_eq!(inbound.body, Bytes::from_static(b"{}"));
        assert_eq!(request_id(&parts), "abc");
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let req = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
