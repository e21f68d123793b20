//! Rule predicates for matching request payloads.
//!
//! All three predicates are pure and total: malformed rule data or
//! payloads yield "no match", never an error.

use crate::stub::Fields;
use regex::Regex;
use tracing::warn;

/// Deep structural equality between the expected and actual payloads.
/// Key order is irrelevant; values are compared recursively.
pub fn equals(expected: &Fields, actual: &Fields) -> bool {
    expected == actual
}

/// Every expected key must be present in the actual payload with a
/// deeply-equal value. Extra keys in the actual payload are ignored.
pub fn contains(expected: &Fields, actual: &Fields) -> bool {
    expected
        .iter()
        .all(|(key, want)| actual.get(key) == Some(want))
}

/// Every expected value is treated as a regex pattern that the
/// corresponding actual value must contain a match for (unanchored).
///
/// A non-string pattern, a missing or non-string actual value, or a
/// pattern that fails to compile (logged) all count as no match.
pub fn matches(expected: &Fields, actual: &Fields) -> bool {
    for (key, pattern) in expected {
        let pattern = match pattern.as_str() {
            Some(p) => p,
            None => return false,
        };
        let value = match actual.get(key).and_then(|v| v.as_str()) {
            Some(v) => v,
            None => return false,
        };
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(value) {
                    return false;
                }
            }
            Err(err) => {
                warn!(field = %key, pattern = %pattern, error = %err, "invalid regex in matches rule");
                return false;
            }
        }
    }
    true
}
