//! Backend result → client response.
//!
//! # Responsibilities
//! - Select the success or error branch from the backend's error text
//! - Render the `{state, greeting|message}` body
//! - Attach the fixed response headers, Set-Cookie from the authorizer context
//!
//! # Design Decisions
//! - Branch selection is a full match of the selection pattern against the
//!   error message; a success carries no error text, so an empty message is
//!   always the success branch
//! - Bodies are rendered by embedding escaped text into a fixed JSON shape
//! - Transformation is pure: identical input yields identical output

use axum::http::StatusCode;
use regex::Regex;
use serde_json::Value;

use crate::auth::context::AuthContext;
use crate::transform::escape::escape_string;
use crate::transform::TransformError;

/// Default selection pattern: one or more of any character, newlines included.
pub const DEFAULT_ERROR_PATTERN: &str = r"(\n|.)+";

/// Field of an error payload holding its message.
pub const ERROR_MESSAGE_FIELD: &str = "errorMessage";

/// Raw result of a backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResult {
    Success(Value),
    /// The backend signalled an error; the value is its raw error payload.
    Error(Value),
}

impl BackendResult {
    /// Build an error result carrying only `message`.
    pub fn error_message(message: impl Into<String>) -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert(ERROR_MESSAGE_FIELD.to_string(), Value::String(message.into()));
        BackendResult::Error(Value::Object(payload))
    }

    pub fn payload(&self) -> &Value {
        match self {
            BackendResult::Success(v) | BackendResult::Error(v) => v,
        }
    }

    /// Text tested against the selection pattern.
    pub fn selection_text(&self) -> String {
        match self {
            BackendResult::Success(_) => String::new(),
            BackendResult::Error(v) => extract_error_message(v),
        }
    }

    /// Metric/log label for the tagged variant.
    pub fn label(&self) -> &'static str {
        match self {
            BackendResult::Success(_) => "success",
            BackendResult::Error(_) => "error",
        }
    }
}

/// The `errorMessage` of a payload, or `""` when absent.
pub fn extract_error_message(payload: &Value) -> String {
    match payload.get(ERROR_MESSAGE_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const SET_COOKIE: &str = "Set-Cookie";

/// Which branch produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Ok,
    Error,
}

/// Externally visible response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    pub state: ResponseState,
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl ClientResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Classifies backend results and renders client responses.
#[derive(Debug, Clone)]
pub struct ResponseTransformer {
    error_pattern: Regex,
}

impl ResponseTransformer {
    /// Build a transformer whose error branch is selected when the error text
    /// fully matches `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            error_pattern: Regex::new(&format!("^(?:{})$", pattern))?,
        })
    }

    /// Whether `result` takes the error branch.
    pub fn is_error(&self, result: &BackendResult) -> bool {
        self.error_pattern.is_match(&result.selection_text())
    }

    pub fn transform(
        &self,
        result: &BackendResult,
        context: &AuthContext,
    ) -> Result<ClientResponse, TransformError> {
        let (state, status, body) = if self.is_error(result) {
            let message = extract_error_message(result.payload());
            (
                ResponseState::Error,
                StatusCode::BAD_REQUEST,
                format!(
                    r#"{{"state":"error","message":"{}"}}"#,
                    escape_string(&message)
                ),
            )
        } else {
            let raw = serde_json::to_string(result.payload())
                .map_err(TransformError::Serialization)?;
            (
                ResponseState::Ok,
                StatusCode::OK,
                format!(
                    r#"{{"state":"ok","greeting":"{}"}}"#,
                    escape_string(&raw)
                ),
            )
        };

        Ok(ClientResponse {
            state,
            status,
            headers: fixed_headers(context),
            body,
        })
    }
}

impl Default for ResponseTransformer {
    fn default() -> Self {
        Self {
            error_pattern: Regex::new(&format!("^(?:{})$", DEFAULT_ERROR_PATTERN))
                .expect("default error pattern is valid"),
        }
    }
}

fn fixed_headers(context: &AuthContext) -> Vec<(&'static str, String)> {
    vec![
        (CONTENT_TYPE, "application/json".to_string()),
        (ALLOW_ORIGIN, "*".to_string()),
        (ALLOW_CREDENTIALS, "true".to_string()),
        (SET_COOKIE, context.cookie.clone()),
    ]
}
