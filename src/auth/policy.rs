//! Resource-access policy documents.

use serde::{Deserialize, Serialize};

/// Policy language version stamped on every document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action a policy grants or forbids.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// The effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

/// A versioned, ordered list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Build the policy for `effect` on exactly `resource`.
pub fn build(effect: Effect, resource: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![PolicyStatement {
            action: INVOKE_ACTION.to_string(),
            effect,
            resource: resource.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:execute-api:local:000000000000:test-api-gw/prod/POST/";

    #[test]
    fn test_single_statement() {
        let doc = build(Effect::Allow, ARN);
        assert_eq!(doc.version, POLICY_VERSION);
        assert_eq!(doc.statement.len(), 1);
        assert_eq!(doc.statement[0].action, INVOKE_ACTION);
        assert_eq!(doc.statement[0].effect, Effect::Allow);
        assert_eq!(doc.statement[0].resource, ARN);
    }

    #[test]
    fn test_resource_is_not_shared() {
        let a = build(Effect::Deny, "arn:a/prod/POST/");
        let b = build(Effect::Deny, "arn:b/prod/POST/");
        assert_eq!(a.statement[0].resource, "arn:a/prod/POST/");
        assert_eq!(b.statement[0].resource, "arn:b/prod/POST/");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(build(Effect::Deny, ARN), build(Effect::Deny, ARN));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(build(Effect::Deny, ARN)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Action": "execute-api:Invoke",
                    "Effect": "Deny",
                    "Resource": ARN,
                }]
            })
        );
    }
}
