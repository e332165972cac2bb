//! Local `$ref` resolution with cycle detection.
//!
//! References have the form `#/<segment>/<segment>/...` and are resolved
//! against a single in-memory document. Each segment is unescaped (`~1` to
//! `/`, then `~0` to `~`) before indexing. Mapping nodes are indexed by key,
//! sequence nodes by decimal position.
//!
//! The caller owns the `visited` set. It must be fresh for every top-level
//! resolution, shared along one chain of references, and cloned wherever
//! sibling branches diverge (see [`crate::schema::resolve_schema_with`]).

use std::collections::HashSet;

use serde_json::{json, Value as JsonValue};

/// Description carried by the synthetic schema substituted for a cycle.
pub const CIRCULAR_DESCRIPTION: &str = "[Circular Reference]";

/// Set of reference strings already entered on the current resolution chain.
pub type Visited = HashSet<String>;

/// Outcome of resolving a reference that points somewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The node the reference designates.
    Node(&'a JsonValue),
    /// The reference was already on the chain being resolved.
    Circular,
}

impl Resolution<'_> {
    /// Owned form of the resolution; cycles become [`circular_marker`].
    pub fn into_owned(self) -> JsonValue {
        match self {
            Resolution::Node(node) => node.clone(),
            Resolution::Circular => circular_marker(),
        }
    }
}

/// Placeholder schema rendered where a reference cycle was broken.
pub fn circular_marker() -> JsonValue {
    json!({
        "type": "object",
        "description": CIRCULAR_DESCRIPTION,
    })
}

/// Returns true if `schema` is the placeholder produced by [`circular_marker`].
pub fn is_circular_marker(schema: &JsonValue) -> bool {
    schema.get("description").and_then(JsonValue::as_str) == Some(CIRCULAR_DESCRIPTION)
        && schema.get("type").and_then(JsonValue::as_str) == Some("object")
}

/// Resolve a raw `$ref` value against `document`.
///
/// Returns `None` when the reference is malformed (not a string, empty, or
/// not document-local) or dangling. Returns [`Resolution::Circular`] when the
/// reference is already in `visited`. Chains of references are followed with
/// the same `visited` set.
pub fn resolve<'a>(
    document: &'a JsonValue,
    reference: &JsonValue,
    visited: &mut Visited,
) -> Option<Resolution<'a>> {
    let reference = reference.as_str()?;
    if reference.is_empty() || !reference.starts_with('#') {
        log::debug!("ignoring malformed reference {:?}", reference);
        return None;
    }
    if visited.contains(reference) {
        return Some(Resolution::Circular);
    }
    visited.insert(reference.to_string());

    let Some(node) = lookup(document, reference) else {
        log::debug!("dangling reference {}", reference);
        return None;
    };

    match node.get("$ref") {
        Some(next) => resolve(document, next, visited),
        None => Some(Resolution::Node(node)),
    }
}

/// Resolve `reference` with a fresh visited set.
pub fn resolve_str<'a>(document: &'a JsonValue, reference: &str) -> Option<Resolution<'a>> {
    resolve(
        document,
        &JsonValue::String(reference.to_string()),
        &mut Visited::new(),
    )
}

/// Walk `document` along the segments of `reference` without following refs.
fn lookup<'a>(document: &'a JsonValue, reference: &str) -> Option<&'a JsonValue> {
    reference
        .split('/')
        .skip(1)
        .try_fold(document, |node, segment| {
            let key = unescape_segment(segment);
            match node {
                JsonValue::Object(map) => map.get(key.as_str()),
                JsonValue::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
}

/// Undo JSON-pointer escaping for one reference segment.
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Escape a document key so it can be embedded in a reference.
pub fn escape_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Reference to a named schema under `components/schemas`.
///
/// Strings already starting with `#` are returned unchanged.
pub fn schema_ref(name: &str) -> String {
    if name.starts_with('#') {
        name.to_string()
    } else {
        format!("#/components/schemas/{}", escape_segment(name))
    }
}
