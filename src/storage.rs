//! In-memory stub registry and resolution.
//!
//! The store owns the two-level (service, method) mapping behind a single
//! exclusive lock. Buckets preserve insertion order and the first
//! satisfying stub wins, so registration order is the tie-break.

use crate::diagnostic::{self, CloseMatch, RuleKind};
use crate::matcher;
use crate::stub::{FindQuery, Input, Meta, Output, Stub};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// A registered rule with its metadata filter and canned response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredStub {
    pub input: Input,
    pub meta: Meta,
    pub output: Output,
}

/// service name -> method name -> stubs in registration order.
pub type StubMapping = HashMap<String, HashMap<String, Vec<StoredStub>>>;

/// Why a resolve call failed. All variants are terminal for the one call;
/// matching is deterministic, so nothing is retried.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("can't find stub for service: {service}")]
    ServiceNotFound { service: String },

    #[error("can't find stub for service: {service} and method: {method}")]
    MethodNotFound { service: String, method: String },

    #[error("stub for service: {service} and method: {method} is empty")]
    EmptyStubSet { service: String, method: String },

    /// No registered stub satisfied both rule and metadata; carries the
    /// rendered diagnostic with the closest candidate.
    #[error("{diagnostic}")]
    StubNotFound { diagnostic: String },
}

/// Concurrency-safe registry of stubs, keyed by service and method.
///
/// One exclusive lock serializes every operation over the whole mapping.
/// Stub sets are small and short-lived relative to RPC latency, so the
/// coarse lock is not a throughput concern, and nothing blocks on I/O
/// while holding it.
#[derive(Default)]
pub struct StubStore {
    stubs: Mutex<StubMapping>,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stub to its (service, method) bucket, creating the bucket
    /// if absent. Accepts anything, including stubs populating several
    /// rule kinds; resolution order then decides their precedence.
    pub fn register(&self, stub: Stub) {
        debug!(service = %stub.service, method = %stub.method, "registering stub");
        let mut mapping = self.stubs.lock();
        mapping
            .entry(stub.service)
            .or_default()
            .entry(stub.method)
            .or_default()
            .push(StoredStub {
                input: stub.input,
                meta: stub.meta,
                output: stub.output,
            });
    }

    /// Resolve a request to the canned output of the first stub whose
    /// rule matches the payload and whose metadata equals the request's.
    ///
    /// Rule kinds on one stub are tried in fixed priority: equals, then
    /// contains, then matches. A stub whose rule matches but whose
    /// metadata differs is skipped entirely and the scan continues.
    pub fn resolve(&self, query: &FindQuery) -> Result<Output, ResolveError> {
        let mapping = self.stubs.lock();

        let methods = mapping
            .get(&query.service)
            .ok_or_else(|| ResolveError::ServiceNotFound {
                service: query.service.clone(),
            })?;

        let entries = methods
            .get(&query.method)
            .ok_or_else(|| ResolveError::MethodNotFound {
                service: query.service.clone(),
                method: query.method.clone(),
            })?;

        if entries.is_empty() {
            return Err(ResolveError::EmptyStubSet {
                service: query.service.clone(),
                method: query.method.clone(),
            });
        }

        // Every populated rule is recorded as a diagnostic candidate
        // before it is evaluated, so a failed scan can explain itself.
        let mut candidates: Vec<CloseMatch<'_>> = Vec::new();

        for entry in entries {
            if let Some(expect) = &entry.input.equals {
                candidates.push(CloseMatch {
                    kind: RuleKind::Equals,
                    expect,
                });
                if matcher::equals(expect, &query.data) {
                    if entry.meta == query.meta {
                        return Ok(entry.output.clone());
                    }
                    continue;
                }
            }

            if let Some(expect) = &entry.input.contains {
                candidates.push(CloseMatch {
                    kind: RuleKind::Contains,
                    expect,
                });
                if matcher::contains(expect, &query.data) {
                    if entry.meta == query.meta {
                        return Ok(entry.output.clone());
                    }
                    continue;
                }
            }

            if let Some(expect) = &entry.input.matches {
                candidates.push(CloseMatch {
                    kind: RuleKind::Matches,
                    expect,
                });
                if matcher::matches(expect, &query.data) {
                    if entry.meta == query.meta {
                        return Ok(entry.output.clone());
                    }
                    continue;
                }
            }
        }

        Err(ResolveError::StubNotFound {
            diagnostic: diagnostic::render_not_found(query, &candidates),
        })
    }

    /// Deep-copied snapshot of everything currently registered. The
    /// snapshot does not reflect later mutations.
    pub fn list(&self) -> StubMapping {
        self.stubs.lock().clone()
    }

    /// Remove every stub whose metadata exactly equals `meta`, across all
    /// services and methods, preserving the relative order of survivors.
    ///
    /// Equality is exact: `clear(&Meta::new())` removes only stubs that
    /// were registered with empty metadata.
    pub fn clear(&self, meta: &Meta) {
        let mut mapping = self.stubs.lock();

        // Rebuild and swap so an in-progress clear is never visible.
        let mut rebuilt = StubMapping::new();
        for (service, methods) in mapping.iter() {
            let rebuilt_methods = rebuilt.entry(service.clone()).or_default();
            for (method, entries) in methods {
                let kept: Vec<StoredStub> = entries
                    .iter()
                    .filter(|entry| &entry.meta != meta)
                    .cloned()
                    .collect();
                rebuilt_methods.insert(method.clone(), kept);
            }
        }

        debug!("cleared stubs matching metadata filter");
        *mapping = rebuilt;
    }
}
