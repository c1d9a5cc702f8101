//! Client response → HTTP response.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue};
use axum::response::Response;

use crate::gateway::GatewayError;
use crate::transform::ClientResponse;

/// Convert a transformed response into an HTTP response.
///
/// A header value that cannot be carried over HTTP (e.g. a cookie built
/// from a token with control characters) fails the request.
pub fn into_http_response(response: ClientResponse) -> Result<Response, GatewayError> {
    let mut builder = Response::builder().status(response.status);

    for (name, value) in &response.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| GatewayError::Transformation(e.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::Transformation(format!("header {}: {}", name, e)))?;
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(response.body))
        .map_err(|e| GatewayError::Transformation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::transform::{BackendResult, ResponseTransformer};
    use axum::http::StatusCode;

    fn context(cookie: &str) -> AuthContext {
        AuthContext {
            cookie: cookie.to_string(),
            user_id: "user".to_string(),
            random_context: 1,
        }
    }

    #[tokio::test]
    async fn test_headers_and_body_carried_over() {
        let client = ResponseTransformer::default()
            .transform(
                &BackendResult::Success(serde_json::json!("hi")),
                &context("allow9"),
            )
            .unwrap();

        let response = into_http_response(client).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");
        assert_eq!(response.headers()["set-cookie"], "allow9");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], br#"{"state":"ok","greeting":"\"hi\""}"#);
    }

    #[test]
    fn test_invalid_cookie_fails() {
        let client = ResponseTransformer::default()
            .transform(
                &BackendResult::Success(serde_json::json!("hi")),
                &context("bad\ncookie"),
            )
            .unwrap();

        let err = into_http_response(client).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
