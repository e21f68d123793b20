//! Closest-match ranking and rendering for failed resolutions.
//!
//! When no stub satisfies a query, the store collects every rule it
//! considered and this module picks the most similar one to show the
//! caller, so a near-miss (typo, wrong field, stale value) is visible in
//! the error instead of a bare "not found".

use crate::stub::{Fields, FindQuery};
use serde_json::Value;
use std::fmt;

/// Which matching rule a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Equals,
    Contains,
    Matches,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Equals => f.write_str("equals"),
            RuleKind::Contains => f.write_str("contains"),
            RuleKind::Matches => f.write_str("matches"),
        }
    }
}

/// A rule considered (and rejected) while scanning a bucket.
#[derive(Debug, Clone, Copy)]
pub struct CloseMatch<'a> {
    pub kind: RuleKind,
    pub expect: &'a Fields,
}

/// Render the full "can't find stub" diagnostic: the unmatched query and,
/// when any rule was considered, the closest candidate.
pub(crate) fn render_not_found(query: &FindQuery, candidates: &[CloseMatch<'_>]) -> String {
    let rendered_query = render_fields(&query.data);
    let mut message = format!(
        "Can't find stub\n\nService: {}\n\nMethod: {}\n\nInput\n\n{}",
        query.service, query.method, rendered_query
    );

    if let Some(closest) = closest_match(&rendered_query, candidates) {
        message.push_str(&format!(
            "\n\nClosest Match\n\n{}:{}",
            closest.kind,
            render_fields(closest.expect)
        ));
    }

    message
}

/// Pick the candidate with the strictly highest similarity to the
/// rendered query. Ties keep the earliest candidate; if every candidate
/// scores zero the first one is used so a diagnostic is always produced.
fn closest_match<'a, 'f>(
    rendered_query: &str,
    candidates: &'a [CloseMatch<'f>],
) -> Option<&'a CloseMatch<'f>> {
    let mut best = candidates.first()?;
    let mut best_rank = 0.0_f32;

    for candidate in candidates {
        let rank = rank_match(rendered_query, candidate.expect);
        if rank > best_rank {
            best_rank = rank;
            best = candidate;
        }
    }

    Some(best)
}

/// Similarity of one candidate rule to the rendered query text: each
/// expected field contributes +1 if its name (as `name:`) fuzzily appears
/// in the query and +1 if its stringified value does, normalized by the
/// candidate's total field-and-value count.
fn rank_match(rendered_query: &str, expect: &Fields) -> f32 {
    let mut occurrences = 0usize;
    for (key, value) in expect {
        if fuzzy_contains(&format!("{key}:"), rendered_query) {
            occurrences += 1;
        }
        if fuzzy_contains(&render_value(value), rendered_query) {
            occurrences += 1;
        }
    }

    if occurrences == 0 {
        return 0.0;
    }
    occurrences as f32 / (expect.len() * 2) as f32
}

/// Fuzzy subsequence match: every character of `needle` appears in
/// `haystack` in order, not necessarily contiguously.
fn fuzzy_contains(needle: &str, haystack: &str) -> bool {
    let mut haystack = haystack.chars();
    needle.chars().all(|n| haystack.any(|h| h == n))
}

/// Render a field map as an indented `key: value` block.
fn render_fields(fields: &Fields) -> String {
    let mut out = String::from("{\n");
    for (key, value) in fields {
        out.push_str(&format!("\t{}: {}\n", key, render_value(value)));
    }
    out.push('}');
    out
}

/// Strings render unquoted; everything else renders as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
