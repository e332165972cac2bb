//! Endpoint and webhook extraction.
//!
//! Endpoints are grouped by their declared tags for navigation. Groups are
//! seeded from the document's top-level `tags` list so declared order wins;
//! tags only seen on operations are appended as they are encountered.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Group that receives operations declaring no tags.
pub const DEFAULT_TAG: &str = "Other";

/// HTTP verbs recognised as operations inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Returns an iterator over all recognised methods
    pub fn all() -> impl Iterator<Item = Self> {
        use HttpMethod::*;
        [Get, Post, Put, Patch, Delete].iter().copied()
    }

    /// Whether requests with this method usually carry a body
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Path-item keys are case sensitive, so only lowercase names parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("Unknown HTTP method: {}", s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One operation of the document, located by path and method.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    /// The operation object's own fields, in document order.
    pub operation: Map<String, JsonValue>,
}

impl Endpoint {
    /// Flat view: `path` and `method` first, then operation fields, which
    /// replace the synthetic ones if the operation declares the same keys.
    pub fn to_value(&self) -> JsonValue {
        flatten(
            [
                ("path", JsonValue::String(self.path.clone())),
                ("method", JsonValue::String(self.method.to_string())),
            ],
            &self.operation,
        )
    }

    pub fn summary(&self) -> Option<&str> {
        self.operation.get("summary").and_then(JsonValue::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.operation.get("description").and_then(JsonValue::as_str)
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.operation.get("operationId").and_then(JsonValue::as_str)
    }

    pub fn is_deprecated(&self) -> bool {
        self.operation
            .get("deprecated")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// Tags the endpoint is listed under; [`DEFAULT_TAG`] when none are declared.
    pub fn tags(&self) -> Vec<&str> {
        let declared: Vec<&str> = self
            .operation
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|tags| tags.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();
        if declared.is_empty() {
            vec![DEFAULT_TAG]
        } else {
            declared
        }
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Endpoints sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagGroup {
    pub name: String,
    pub description: String,
    pub endpoints: Vec<Endpoint>,
}

impl TagGroup {
    fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            endpoints: Vec::new(),
        }
    }
}

/// One operation declared under the document's `webhooks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Webhook {
    pub name: String,
    /// Key under the webhook's path item, kept as written.
    pub method: String,
    pub operation: Map<String, JsonValue>,
}

impl Webhook {
    pub fn to_value(&self) -> JsonValue {
        flatten(
            [
                ("name", JsonValue::String(self.name.clone())),
                ("method", JsonValue::String(self.method.clone())),
            ],
            &self.operation,
        )
    }

    pub fn summary(&self) -> Option<&str> {
        self.operation.get("summary").and_then(JsonValue::as_str)
    }
}

impl Serialize for Webhook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn flatten<const N: usize>(
    synthetic: [(&str, JsonValue); N],
    operation: &Map<String, JsonValue>,
) -> JsonValue {
    let mut merged: Map<String, JsonValue> = synthetic
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    for (key, value) in operation {
        merged.insert(key.clone(), value.clone());
    }
    JsonValue::Object(merged)
}

/// Every recognised operation under `paths`, in document order.
pub fn endpoints(document: &JsonValue) -> Vec<Endpoint> {
    let Some(paths) = document.get("paths").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            log::debug!("skipping non-object path item {}", path);
            continue;
        };
        for (key, operation) in item {
            let Ok(method) = key.parse::<HttpMethod>() else {
                continue;
            };
            let Some(operation) = operation.as_object() else {
                log::debug!("skipping non-object operation {} {}", method, path);
                continue;
            };
            endpoints.push(Endpoint {
                path: path.clone(),
                method,
                operation: operation.clone(),
            });
        }
    }
    endpoints
}

/// Group endpoints by tag.
///
/// An endpoint carrying several tags is listed in each of their groups.
pub fn endpoints_by_tags(document: &JsonValue) -> Vec<TagGroup> {
    let mut groups: Vec<TagGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let declared = document
        .get("tags")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten();
    for tag in declared {
        let Some(name) = tag.get("name").and_then(JsonValue::as_str) else {
            continue;
        };
        if index.contains_key(name) {
            continue;
        }
        let description = tag
            .get("description")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        index.insert(name.to_string(), groups.len());
        groups.push(TagGroup::new(name, description));
    }

    for endpoint in endpoints(document) {
        for tag in endpoint.tags() {
            let slot = *index.entry(tag.to_string()).or_insert_with(|| {
                groups.push(TagGroup::new(tag, ""));
                groups.len() - 1
            });
            groups[slot].endpoints.push(endpoint.clone());
        }
    }
    groups
}

/// Flatten the document's `webhooks` into one entry per (name, method).
pub fn webhooks(document: &JsonValue) -> Vec<Webhook> {
    let Some(hooks) = document.get("webhooks").and_then(JsonValue::as_object) else {
        return Vec::new();
    };

    hooks
        .iter()
        .filter_map(|(name, item)| item.as_object().map(|methods| (name, methods)))
        .flat_map(|(name, methods)| {
            methods.iter().filter_map(move |(method, operation)| {
                operation.as_object().map(|operation| Webhook {
                    name: name.clone(),
                    method: method.clone(),
                    operation: operation.clone(),
                })
            })
        })
        .collect()
}
