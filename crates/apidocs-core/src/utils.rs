//! String helpers shared by snippets and the page context

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

static PATH_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").unwrap());
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercase `s` and collapse every run of other characters into one `-`
pub fn slugify(s: &str) -> String {
    let lower = s.to_lowercase();
    NON_SLUG
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Fragment id for an operation, e.g. `get-users-id` for `GET /users/{id}`
pub fn operation_anchor(method: &str, path: &str) -> String {
    let slug = slugify(&format!("{} {}", method, path));
    if slug.is_empty() {
        "root".to_string()
    } else {
        slug
    }
}

/// Hands out fragment ids that are unique within one page.
///
/// Slugs are lossy (`/a-b` and `/a/b` both become `a-b`), so a repeated id
/// gets a `-2`, `-3`, ... suffix in claim order.
#[derive(Debug, Default)]
pub struct UniqueAnchors {
    used: HashSet<String>,
}

impl UniqueAnchors {
    pub fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while !self.used.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}-{}", base, n);
        }
        candidate
    }
}

/// Names of the `{param}` placeholders in a path template, in order
pub fn path_params(path: &str) -> Vec<&str> {
    PATH_PARAM
        .captures_iter(path)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replace `{param}` placeholders that have a value; leave the others as written
pub fn fill_path_params(path: &str, values: &HashMap<String, String>) -> String {
    PATH_PARAM
        .replace_all(path, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Plain text form of a JSON value; strings lose their quotes
pub fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
