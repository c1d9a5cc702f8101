//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. All errors are
//! collected rather than stopping at the first one.

use regex::Regex;
use thiserror::Error;

use crate::config::schema::{BackendKind, GatewayConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("authorizer.identity_header must not be empty")]
    EmptyIdentityHeader,

    #[error("authorizer.identity_header {0:?} is not a valid header name")]
    InvalidIdentityHeader(String),

    #[error("authorizer.principal_id must not be empty")]
    EmptyPrincipalId,

    #[error("authorizer.validation_pattern is not a valid regex: {0}")]
    InvalidValidationPattern(String),

    #[error("authorizer.results_cache_ttl_secs must be 0 (got {0}); authorization results are never cached")]
    CachingNotAllowed(u64),

    #[error("backend.url is required when backend.kind = \"http\"")]
    MissingBackendUrl,

    #[error("backend.url {url:?} is invalid: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("backend.timeout_ms must be greater than 0")]
    ZeroBackendTimeout,

    #[error("limits.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let header = &config.authorizer.identity_header;
    if header.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentityHeader);
    } else if axum::http::HeaderName::from_bytes(header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidIdentityHeader(header.clone()));
    }

    if config.authorizer.principal_id.is_empty() {
        errors.push(ValidationError::EmptyPrincipalId);
    }

    if let Err(e) = Regex::new(&config.authorizer.validation_pattern) {
        errors.push(ValidationError::InvalidValidationPattern(e.to_string()));
    }

    if config.authorizer.results_cache_ttl_secs != 0 {
        errors.push(ValidationError::CachingNotAllowed(
            config.authorizer.results_cache_ttl_secs,
        ));
    }

    if config.backend.kind == BackendKind::Http {
        match &config.backend.url {
            None => errors.push(ValidationError::MissingBackendUrl),
            Some(raw) => {
                if let Err(e) = url::Url::parse(raw) {
                    errors.push(ValidationError::InvalidBackendUrl {
                        url: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    if config.backend.timeout_ms == 0 {
        errors.push(ValidationError::ZeroBackendTimeout);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
