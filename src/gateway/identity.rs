//! Identity source: where the caller token comes from.

use regex::Regex;

use crate::transform::InboundRequest;

/// Reads the token header and rejects values that fail the validation pattern.
#[derive(Debug, Clone)]
pub struct IdentitySource {
    header: String,
    pattern: Regex,
}

impl IdentitySource {
    /// `pattern` must match the whole header value.
    pub fn new(header: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            header: header.into(),
            pattern: Regex::new(&format!("^(?:{})$", pattern))?,
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// The caller's token, if present and valid.
    pub fn extract<'a>(&self, request: &'a InboundRequest) -> Option<&'a str> {
        request
            .header(&self.header)
            .filter(|value| self.pattern.is_match(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthorizerConfig;

    fn source() -> IdentitySource {
        let config = AuthorizerConfig::default();
        IdentitySource::new(config.identity_header, &config.validation_pattern).unwrap()
    }

    fn with_token(token: &str) -> InboundRequest {
        InboundRequest {
            method: "POST".to_string(),
            headers: vec![("x-authorization-header".to_string(), token.to_string())],
            body: Default::default(),
        }
    }

    #[test]
    fn test_valid_token() {
        assert_eq!(source().extract(&with_token("allow")), Some("allow"));
        assert_eq!(source().extract(&with_token(" deny ")), Some(" deny "));
    }

    #[test]
    fn test_blank_token_rejected() {
        assert_eq!(source().extract(&with_token("")), None);
        assert_eq!(source().extract(&with_token("   ")), None);
        assert_eq!(source().extract(&with_token("\t")), None);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(source().extract(&InboundRequest::default()), None);
    }
}
