//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// API identity: display name, description and method ARN.
    pub api: ApiConfig,

    /// Token authorizer settings.
    pub authorizer: AuthorizerConfig,

    /// Backend integration settings.
    pub backend: BackendConfig,

    /// Request size and time limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Describes the single API operation exposed by the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Display name of the API.
    pub name: String,

    /// Human readable description.
    pub description: String,

    /// ARN prefix identifying this API (without stage or method).
    pub method_arn_prefix: String,

    /// Deployment stage name.
    pub stage: String,
}

impl ApiConfig {
    /// Resource identifier of the `POST /` operation.
    ///
    /// This is the value policies are scoped to; a policy built for another
    /// stage or API never matches it.
    pub fn method_arn(&self) -> String {
        format!("{}/{}/POST/", self.method_arn_prefix, self.stage)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            name: "test-api-gw".to_string(),
            description: "This API service serves hellos.".to_string(),
            method_arn_prefix: "arn:aws:execute-api:local:000000000000:test-api-gw".to_string(),
            stage: "prod".to_string(),
        }
    }
}

/// Token authorizer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// Header carrying the caller's token.
    pub identity_header: String,

    /// Pattern the identity header must fully match before the authorizer runs.
    pub validation_pattern: String,

    /// Principal id reported for every decision.
    pub principal_id: String,

    /// Authorization result cache TTL. Only 0 is accepted.
    pub results_cache_ttl_secs: u64,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            identity_header: "x-authorization-header".to_string(),
            validation_pattern: r"(.|\s)*\S(.|\s)*".to_string(),
            principal_id: "user".to_string(),
            results_cache_ttl_secs: 0,
        }
    }
}

/// Which backend the gateway invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process greeting function.
    Greeting,
    /// Remote HTTP endpoint receiving the transformed request as JSON.
    Http,
}

/// Backend integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend implementation.
    pub kind: BackendKind,

    /// Endpoint URL (required for `http`).
    pub url: Option<String>,

    /// Deadline for a single backend call in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Greeting,
            url: None,
            timeout_ms: 3000,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Total time allowed for one request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
