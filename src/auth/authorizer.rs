//! Token authorizer.
//!
//! Maps a caller token onto an allow/deny/unauthorized decision. Three
//! token values are reserved; every other token, including the empty one,
//! is denied.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::context::{AuthContext, RandomSource, ThreadRandom};
use crate::auth::policy::{self, Effect, PolicyDocument};

/// Classification of a caller token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Allow,
    Deny,
    Unauthorized,
    /// Anything that is not a reserved value. Always denied.
    Unrecognized,
}

impl TokenKind {
    pub fn classify(token: &str) -> Self {
        match token {
            "allow" => TokenKind::Allow,
            "deny" => TokenKind::Deny,
            "unauthorized" => TokenKind::Unauthorized,
            _ => TokenKind::Unrecognized,
        }
    }
}

/// What the authorizer hands back for an allow or deny decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: AuthContext,
}

/// Outcome of authorizing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allow(AuthorizerResponse),
    Deny(AuthorizerResponse),
    /// Authentication failed; no policy or context exists.
    Unauthorized,
}

impl AuthDecision {
    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            AuthDecision::Allow(_) => "allow",
            AuthDecision::Deny(_) => "deny",
            AuthDecision::Unauthorized => "unauthorized",
        }
    }

    pub fn response(&self) -> Option<&AuthorizerResponse> {
        match self {
            AuthDecision::Allow(r) | AuthDecision::Deny(r) => Some(r),
            AuthDecision::Unauthorized => None,
        }
    }
}

/// Stateless token authorizer. Nothing is cached between calls.
#[derive(Clone)]
pub struct TokenAuthorizer {
    principal_id: String,
    random: Arc<dyn RandomSource>,
}

impl TokenAuthorizer {
    pub fn new(principal_id: impl Into<String>) -> Self {
        Self::with_random(principal_id, Arc::new(ThreadRandom))
    }

    pub fn with_random(principal_id: impl Into<String>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            principal_id: principal_id.into(),
            random,
        }
    }

    /// Decide whether `token` may invoke `resource`.
    pub fn decide(&self, token: &str, resource: &str) -> AuthDecision {
        let decision = match TokenKind::classify(token) {
            TokenKind::Allow => AuthDecision::Allow(self.respond(Effect::Allow, token, resource)),
            TokenKind::Deny => AuthDecision::Deny(self.respond(Effect::Deny, token, resource)),
            TokenKind::Unauthorized => AuthDecision::Unauthorized,
            TokenKind::Unrecognized => {
                AuthDecision::Deny(self.respond(Effect::Deny, token, resource))
            }
        };

        match decision.response() {
            Some(response) => tracing::info!(
                target: "token_gateway::audit",
                decision = decision.label(),
                principal_id = %response.principal_id,
                resource = %resource,
                cookie = %response.context.cookie,
                random_context = response.context.random_context,
                "Authorization decision"
            ),
            None => tracing::info!(
                target: "token_gateway::audit",
                decision = decision.label(),
                resource = %resource,
                "Authorization decision"
            ),
        }

        decision
    }

    fn respond(&self, effect: Effect, token: &str, resource: &str) -> AuthorizerResponse {
        AuthorizerResponse {
            principal_id: self.principal_id.clone(),
            policy_document: policy::build(effect, resource),
            context: AuthContext::generate(token, &self.principal_id, self.random.as_ref()),
        }
    }
}
