//! Per-decision authorizer context and the random source feeding it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Exclusive upper bound for random context values.
pub const RANDOM_CONTEXT_BOUND: u64 = 65_465_421;

/// Context key carrying the session cookie.
pub const COOKIE_KEY: &str = "set-cookie";
/// Context key carrying the principal id.
pub const USER_ID_KEY: &str = "userId";
/// Context key carrying the random correlation value.
pub const RANDOM_CONTEXT_KEY: &str = "randomContext";

/// Source of uniformly distributed integers.
pub trait RandomSource: Send + Sync {
    /// Draw a value in `[0, upper)`.
    fn next_below(&self, upper: u64) -> u64;
}

/// Draws from the calling thread's generator on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_below(&self, upper: u64) -> u64 {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Replays a fixed sequence of values, reduced modulo the requested bound.
///
/// Wraps around when the sequence is exhausted.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Mutex<VecDeque<u64>>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_below(&self, upper: u64) -> u64 {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        match values.pop_front() {
            Some(v) => {
                values.push_back(v);
                v % upper
            }
            None => 0,
        }
    }
}

/// Context produced by the authorizer for one request.
///
/// Read-only once built; dropped with the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    #[serde(rename = "set-cookie")]
    pub cookie: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "randomContext")]
    pub random_context: u64,
}

impl AuthContext {
    /// Build a fresh context for `token`.
    ///
    /// The cookie suffix and the correlation value are two independent draws.
    pub fn generate(token: &str, principal_id: &str, random: &dyn RandomSource) -> Self {
        let cookie = format!("{}{}", token, random.next_below(RANDOM_CONTEXT_BOUND));
        let random_context = random.next_below(RANDOM_CONTEXT_BOUND);
        Self {
            cookie,
            user_id: principal_id.to_string(),
            random_context,
        }
    }

    /// The three context fields as `(key, value)` pairs.
    pub fn fields(&self) -> [(&'static str, String); 3] {
        [
            (RANDOM_CONTEXT_KEY, self.random_context.to_string()),
            (USER_ID_KEY, self.user_id.clone()),
            (COOKIE_KEY, self.cookie.clone()),
        ]
    }

    /// Whether `name` (case-insensitive) is one of the context keys.
    pub fn is_reserved_key(name: &str) -> bool {
        [COOKIE_KEY, USER_ID_KEY, RANDOM_CONTEXT_KEY]
            .iter()
            .any(|key| key.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_sequence() {
        let random = SequenceRandom::new([42, 7]);
        let ctx = AuthContext::generate("allow", "user", &random);

        assert_eq!(ctx.cookie, "allow42");
        assert_eq!(ctx.user_id, "user");
        assert_eq!(ctx.random_context, 7);
    }

    #[test]
    fn test_sequence_reduced_to_bound() {
        let random = SequenceRandom::new([RANDOM_CONTEXT_BOUND + 5]);
        assert_eq!(random.next_below(RANDOM_CONTEXT_BOUND), 5);
        // wraps around
        assert_eq!(random.next_below(RANDOM_CONTEXT_BOUND), 5);
    }

    #[test]
    fn test_thread_random_in_range() {
        for _ in 0..1000 {
            assert!(ThreadRandom.next_below(RANDOM_CONTEXT_BOUND) < RANDOM_CONTEXT_BOUND);
        }
    }

    #[test]
    fn test_serialized_keys() {
        let ctx = AuthContext {
            cookie: "allow1".to_string(),
            user_id: "user".to_string(),
            random_context: 2,
        };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"set-cookie": "allow1", "userId": "user", "randomContext": 2})
        );
    }

    #[test]
    fn test_reserved_keys() {
        assert!(AuthContext::is_reserved_key("userid"));
        assert!(AuthContext::is_reserved_key("Set-Cookie"));
        assert!(AuthContext::is_reserved_key("randomContext"));
        assert!(!AuthContext::is_reserved_key("content-type"));
    }
}
