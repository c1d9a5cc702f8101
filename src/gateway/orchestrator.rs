//! Per-request pipeline.
//!
//! ```text
//! InboundRequest
//!     → IdentitySource      (missing/blank token → 401)
//!     → TokenAuthorizer     (unauthorized → 401)
//!     → enforce(policy)     (deny → 403)
//!     → transform_request   (bad body → 400)
//!     → BackendInvoker      (under timeout; 502/504)
//!     → ResponseTransformer (200 ok / 400 error)
//! ```

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::{enforce, AuthDecision, TokenAuthorizer};
use crate::backend::{self, BackendInvoker, InvokeError};
use crate::config::GatewayConfig;
use crate::gateway::error::GatewayError;
use crate::gateway::identity::IdentitySource;
use crate::observability::metrics;
use crate::resilience::invoke_with_timeout;
use crate::transform::{transform_request, ClientResponse, InboundRequest, ResponseTransformer};

/// Errors building a [`Gateway`] from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid identity validation pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid backend: {0}")]
    Backend(#[from] InvokeError),
}

/// One immutable snapshot of the request pipeline.
pub struct Gateway {
    resource: String,
    identity: IdentitySource,
    authorizer: TokenAuthorizer,
    responses: ResponseTransformer,
    invoker: Arc<dyn BackendInvoker>,
    backend_timeout: Duration,
}

impl Gateway {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, BuildError> {
        let invoker = backend::from_config(&config.backend)?;
        Self::with_invoker(config, invoker)
    }

    /// Build from `config` but call `invoker` instead of the configured backend.
    pub fn with_invoker(
        config: &GatewayConfig,
        invoker: Arc<dyn BackendInvoker>,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            resource: config.api.method_arn(),
            identity: IdentitySource::new(
                config.authorizer.identity_header.clone(),
                &config.authorizer.validation_pattern,
            )?,
            authorizer: TokenAuthorizer::new(config.authorizer.principal_id.clone()),
            responses: ResponseTransformer::default(),
            invoker,
            backend_timeout: Duration::from_millis(config.backend.timeout_ms),
        })
    }

    /// Replace the authorizer, e.g. to pin its random source.
    pub fn with_authorizer(mut self, authorizer: TokenAuthorizer) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Resource identifier every policy is checked against.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub async fn handle(&self, request: InboundRequest) -> Result<ClientResponse, GatewayError> {
        let token = self.identity.extract(&request).ok_or_else(|| {
            tracing::debug!(header = %self.identity.header(), "Identity header missing or blank");
            GatewayError::MissingIdentity
        })?;

        let decision = self.authorizer.decide(token, &self.resource);
        metrics::record_auth_decision(decision.label());

        let auth = match decision {
            AuthDecision::Unauthorized => return Err(GatewayError::Unauthorized),
            AuthDecision::Allow(auth) | AuthDecision::Deny(auth) => auth,
        };

        enforce(&auth.policy_document, &self.resource).map_err(|denial| {
            tracing::info!(denial = ?denial, principal_id = %auth.principal_id, "Policy blocked invocation");
            GatewayError::AccessDenied(denial)
        })?;

        let transformed = transform_request(&request, &auth.context)?;

        let result = invoke_with_timeout(self.invoker.as_ref(), &transformed, self.backend_timeout)
            .await
            .map_err(|e| {
                tracing::error!(backend = self.invoker.name(), error = %e, "Backend invocation failed");
                GatewayError::from(e)
            })?;
        metrics::record_backend_result(result.label());

        let response = self.responses.transform(&result, &auth.context)?;
        tracing::debug!(state = ?response.state, status = %response.status, "Response transformed");
        Ok(response)
    }
}
