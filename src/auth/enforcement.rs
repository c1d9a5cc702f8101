//! Policy enforcement.
//!
//! Evaluates an authorizer policy against the operation being invoked.
//! An explicit deny always wins; without a matching allow the call is
//! implicitly denied.

use crate::auth::policy::{Effect, PolicyDocument, INVOKE_ACTION};

/// Why a call was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// A statement denies the resource.
    Explicit,
    /// No statement allows the resource.
    Implicit,
}

/// Check whether `policy` lets the caller invoke `resource`.
pub fn enforce(policy: &PolicyDocument, resource: &str) -> Result<(), Denial> {
    let mut allowed = false;

    for statement in &policy.statement {
        if statement.action != INVOKE_ACTION || statement.resource != resource {
            continue;
        }
        match statement.effect {
            Effect::Deny => return Err(Denial::Explicit),
            Effect::Allow => allowed = true,
        }
    }

    if allowed {
        Ok(())
    } else {
        Err(Denial::Implicit)
    }
}
