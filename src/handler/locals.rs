//! Per-request locals assembly

use serde_json::{Map, Value};

use crate::config::AppState;
use crate::views::Locals;

/// Build the locals bag for a request
///
/// Configured globals come first, then `path` and the decoded `query`
/// parameters, then the override view configured for the longest matching
/// path prefix.
pub fn build_locals(path: &str, query: Option<&str>, state: &AppState) -> Locals {
    let mut locals = Locals::new();
    locals.extend(&state.config.views.globals);
    locals.insert("path", path);
    locals.insert("query", Value::Object(parse_query(query.unwrap_or_default())));

    if let Some(view) = state.override_for(path) {
        locals.insert(state.views.override_key(), view);
    }
    locals
}

/// Parse `a=1&b=two` into a string map; later duplicates win
fn parse_query(qs: &str) -> Map<String, Value> {
    qs.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), Value::String(decode(v)))
        })
        .collect()
}

fn decode(s: &str) -> String {
    let plus_decoded = s.replace('+', " ");
    urlencoding::decode(&plus_decoded).map_or(plus_decoded.clone(), |c| c.into_owned())
}
