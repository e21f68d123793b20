//! Stub definitions and the dynamic request/response value model.
//!
//! Stubs are rule-generic: request payloads and canned responses are
//! arbitrary field maps, not statically-typed records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dynamic field map carried by request payloads, matching rules, and
/// canned responses. Values may be scalars, nested mappings, or sequences.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Request-scoped metadata (header-like key/value pairs) used as an
/// exact-match secondary filter on top of payload rule matching.
pub type Meta = HashMap<String, String>;

/// A registered stub: which RPC it answers, the rule the request payload
/// must satisfy, the metadata the request must carry, and the canned
/// response to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stub {
    /// Service the stub answers for
    pub service: String,

    /// Method the stub answers for
    pub method: String,

    /// Payload matching rule
    #[serde(default)]
    pub input: Input,

    /// Metadata that must exactly equal the request's metadata
    #[serde(default)]
    pub meta: Meta,

    /// Canned response returned on match
    #[serde(default)]
    pub output: Output,
}

/// Payload matching rule.
///
/// Exactly one kind is populated in well-formed definitions. A stub that
/// populates several is still accepted; resolution evaluates the kinds in
/// fixed priority (equals, contains, matches).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Input {
    /// Request payload must deeply equal these fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Fields>,

    /// Request payload must contain these fields (extra fields ignored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Fields>,

    /// Per-field regex patterns the request payload must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Fields>,
}

/// Canned response payload and/or error to synthesize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Response payload returned verbatim
    #[serde(default)]
    pub data: Fields,

    /// Error message for the serving adapter to synthesize instead of a
    /// normal response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An incoming request to resolve against the registered stubs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindQuery {
    /// Target service
    pub service: String,

    /// Target method
    pub method: String,

    /// Actual request payload
    #[serde(default)]
    pub data: Fields,

    /// Actual request metadata
    #[serde(default)]
    pub meta: Meta,
}
