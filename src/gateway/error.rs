//! Gateway error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::auth::Denial;
use crate::backend::InvokeError;
use crate::transform::TransformError;

/// Terminal failures of the request pipeline.
///
/// Errors reported by the backend itself are not here: they become a 400
/// client response through the response transformer.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The identity header is absent or fails validation.
    #[error("identity header missing or invalid")]
    MissingIdentity,

    /// The authorizer rejected the token outright.
    #[error("unauthorized")]
    Unauthorized,

    /// The policy does not allow invoking the resource.
    #[error("access denied ({0:?})")]
    AccessDenied(Denial),

    /// The caller's body could not be parsed.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// Escaping, serialization or header construction failed.
    #[error("transformation failed: {0}")]
    Transformation(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("backend timed out after {0:?}")]
    BackendTimeout(Duration),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingIdentity | GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::AccessDenied(_) => StatusCode::FORBIDDEN,
            GatewayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::Transformation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BackendTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<TransformError> for GatewayError {
    fn from(e: TransformError) -> Self {
        match e {
            TransformError::MalformedBody(source) => GatewayError::MalformedBody(source),
            TransformError::Serialization(source) => {
                GatewayError::Transformation(source.to_string())
            }
        }
    }
}

impl From<InvokeError> for GatewayError {
    fn from(e: InvokeError) -> Self {
        match e {
            InvokeError::Timeout(limit) => GatewayError::BackendTimeout(limit),
            InvokeError::Transport(msg) => GatewayError::BackendUnavailable(msg),
            InvokeError::Request(msg) => GatewayError::Transformation(msg),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // bodies stay generic; details go to the log only
        let body = match &self {
            GatewayError::MissingIdentity | GatewayError::Unauthorized => {
                json!({"message": "Unauthorized"})
            }
            GatewayError::AccessDenied(_) => json!({
                "Message": "User is not authorized to access this resource with an explicit deny"
            }),
            GatewayError::MalformedBody(_) => json!({"message": "Invalid request body"}),
            GatewayError::Transformation(_) => json!({"message": "Internal server error"}),
            GatewayError::BackendUnavailable(_) => json!({"message": "Bad gateway"}),
            GatewayError::BackendTimeout(_) => json!({"message": "Endpoint request timed out"}),
        };
        (self.status(), Json(body)).into_response()
    }
}
