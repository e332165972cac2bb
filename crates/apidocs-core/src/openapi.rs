//! OpenAPI document loading and querying.
//!
//! This module provides functionality for loading an OpenAPI (or Swagger 2)
//! document from a file or URL and exposes the resolver, materializer and
//! endpoint indexer as methods over the loaded document.
//!
//! # Examples
//!
//! ```no_run
//! use apidocs_core::openapi::ApiDocument;
//! use apidocs_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let doc = ApiDocument::from_file("openapi.yaml").await?;
//!
//! if let Some(title) = doc.title() {
//!     println!("API Title: {}", title);
//! }
//! for group in doc.endpoints_by_tags() {
//!     println!("{}: {} endpoints", group.name, group.endpoints.len());
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::borrow::Cow;
use std::path::Path;

use crate::endpoints::{self, Endpoint, TagGroup, Webhook};
use crate::reference::{self, Resolution};
use crate::schema;
use crate::Error;

// External imports (alphabetized)
use serde_json::Value as JsonValue;
use tokio::fs;

/// A loaded OpenAPI document. Immutable once constructed.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct ApiDocument {
    /// The raw JSON value of the document
    json: JsonValue,
}

impl ApiDocument {
    /// Load a document from a file path or an HTTP(S) URL (YAML or JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> crate::Result<Self> {
        let location = location.as_ref();

        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::from_url(location).await;
        }

        Self::from_file(location).await
    }

    /// Load a document from a file (YAML or JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        log::debug!("loaded {} bytes from {}", content.len(), path.display());
        Self::parse_content(&content).map_err(|e| {
            Error::document(format!(
                "Failed to parse OpenAPI document at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Fetch a document over HTTP (YAML or JSON)
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        let response = reqwest::get(url).await.map_err(|e| {
            Error::document(format!("Failed to fetch OpenAPI document from {}: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(Error::document(format!(
                "Failed to fetch OpenAPI document from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().await.map_err(|e| {
            Error::document(format!("Failed to read response from {}: {}", url, e))
        })?;

        Self::parse_content(&content).map_err(|e| {
            Error::document(format!("Failed to parse OpenAPI document from {}: {}", url, e))
        })
    }

    /// Wrap an already parsed value. The root must be a mapping.
    pub fn from_json(json: JsonValue) -> crate::Result<Self> {
        if !json.is_object() {
            return Err(Error::document("document root is not a mapping"));
        }
        Ok(Self { json })
    }

    /// Parse content as either JSON or YAML
    fn parse_content(content: &str) -> Result<Self, String> {
        let json = if let Ok(json) = serde_json::from_str::<JsonValue>(content) {
            json
        } else if let Ok(json) = serde_yaml::from_str::<JsonValue>(content) {
            json
        } else {
            return Err("content is neither valid JSON nor YAML".to_string());
        };
        Self::from_json(json).map_err(|e| e.to_string())
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// Get the top-level description of the API
    pub fn description(&self) -> Option<&str> {
        self.json.get("info")?.get("description")?.as_str()
    }

    /// Get the base URL requests are sent to
    pub fn base_url(&self) -> Option<String> {
        // OpenAPI 3.x servers
        if let Some(url) = self
            .json
            .get("servers")
            .and_then(JsonValue::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| server.get("url"))
            .and_then(JsonValue::as_str)
        {
            return Some(url.trim_end_matches('/').to_string());
        }

        // Swagger 2.0 host + basePath
        let host = self.json.get("host").and_then(JsonValue::as_str)?;
        let base_path = self
            .json
            .get("basePath")
            .and_then(JsonValue::as_str)
            .unwrap_or("");
        let scheme = match self.json.get("schemes").and_then(JsonValue::as_array) {
            Some(schemes) if schemes.iter().any(|s| s.as_str() == Some("https")) => "https",
            Some(schemes) => schemes.first().and_then(JsonValue::as_str).unwrap_or("https"),
            None => "https",
        };
        Some(format!(
            "{}://{}{}",
            scheme,
            host,
            base_path.trim_end_matches('/')
        ))
    }

    /// Resolve a `#/...` reference to an owned node (cycles become the circular marker)
    pub fn resolve_ref(&self, reference: &str) -> Option<JsonValue> {
        reference::resolve_str(&self.json, reference).map(Resolution::into_owned)
    }

    /// Follow `node`'s `$ref` chain if it has one, otherwise borrow it as is.
    ///
    /// Used for parameter, request body and response objects, which may be
    /// references into `components` themselves.
    pub fn follow<'a>(&'a self, node: &'a JsonValue) -> Option<Cow<'a, JsonValue>> {
        match node.get("$ref") {
            Some(raw) => {
                let mut visited = reference::Visited::new();
                match reference::resolve(&self.json, raw, &mut visited)? {
                    Resolution::Node(target) => Some(Cow::Borrowed(target)),
                    circular => Some(Cow::Owned(circular.into_owned())),
                }
            }
            None => Some(Cow::Borrowed(node)),
        }
    }

    /// Parameters that apply to `endpoint`, references followed.
    ///
    /// Path-item parameters come first; an operation parameter with the same
    /// `name` and `in` replaces the path-item one in place.
    pub fn parameters(&self, endpoint: &Endpoint) -> Vec<JsonValue> {
        let path_level = self
            .json
            .get("paths")
            .and_then(|paths| paths.get(endpoint.path.as_str()))
            .and_then(|item| item.get("parameters"))
            .and_then(JsonValue::as_array);
        let operation_level = endpoint
            .operation
            .get("parameters")
            .and_then(JsonValue::as_array);

        let mut merged: Vec<JsonValue> = Vec::new();
        for raw in path_level
            .into_iter()
            .flatten()
            .chain(operation_level.into_iter().flatten())
        {
            let Some(parameter) = self.follow(raw) else {
                continue;
            };
            let parameter = parameter.into_owned();
            let key = parameter_key(&parameter);
            let replaced = merged
                .iter()
                .position(|existing| key.is_some() && parameter_key(existing) == key);
            match replaced {
                Some(i) => merged[i] = parameter,
                None => merged.push(parameter),
            }
        }
        merged
    }

    /// Example for a parameter: its `example`, the first of its `examples`,
    /// or one synthesized from its schema.
    pub fn parameter_example(&self, parameter: &JsonValue) -> Option<JsonValue> {
        if let Some(example) = parameter.get("example").filter(|e| !e.is_null()) {
            return Some(example.clone());
        }
        if let Some(example) = parameter
            .get("examples")
            .and_then(JsonValue::as_object)
            .and_then(|examples| examples.values().next())
            .and_then(|example| self.follow(example))
            .and_then(|example| example.get("value").cloned())
        {
            return Some(example);
        }
        self.generate_example(parameter.get("schema")?)
    }

    /// Content type and schema of the endpoint's request body
    pub fn request_body_schema(&self, endpoint: &Endpoint) -> Option<(String, JsonValue)> {
        let body = self.follow(endpoint.operation.get("requestBody")?)?;
        media_schema(&body)
    }

    /// Declared responses by status code, references followed
    pub fn responses(&self, endpoint: &Endpoint) -> Vec<(String, JsonValue)> {
        endpoint
            .operation
            .get("responses")
            .and_then(JsonValue::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(status, response)| {
                self.follow(response)
                    .map(|response| (status.clone(), response.into_owned()))
            })
            .collect()
    }

    /// Fully dereference a schema
    pub fn resolve_schema(&self, schema: &JsonValue) -> Option<JsonValue> {
        schema::resolve_schema(&self.json, schema)
    }

    /// Synthesize an example value for a schema
    pub fn generate_example(&self, schema: &JsonValue) -> Option<JsonValue> {
        schema::generate_example(&self.json, schema)
    }

    /// Compact outline of a schema with `oneOf`/`anyOf` expanded
    pub fn outline(&self, schema: &JsonValue) -> Option<JsonValue> {
        schema::outline(&self.json, schema)
    }

    /// Endpoints grouped by tag
    pub fn endpoints_by_tags(&self) -> Vec<TagGroup> {
        endpoints::endpoints_by_tags(&self.json)
    }

    /// Webhooks, one entry per (name, method)
    pub fn webhooks(&self) -> Vec<Webhook> {
        endpoints::webhooks(&self.json)
    }
}

fn parameter_key(parameter: &JsonValue) -> Option<(&str, &str)> {
    Some((
        parameter.get("name")?.as_str()?,
        parameter.get("in")?.as_str()?,
    ))
}

/// Pick the schema of a request body or response: `application/json` if
/// declared, otherwise the first JSON-like media type, otherwise the first.
pub fn media_schema(node: &JsonValue) -> Option<(String, JsonValue)> {
    let content = node.get("content")?.as_object()?;
    let (content_type, media) = content
        .iter()
        .find(|(ct, _)| ct.as_str() == "application/json")
        .or_else(|| content.iter().find(|(ct, _)| ct.contains("json")))
        .or_else(|| content.iter().next())?;
    let schema = media.get("schema")?;
    Some((content_type.clone(), schema.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::HttpMethod;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn fixture(name: &str) -> PathBuf {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let base = manifest.parent().unwrap().parent().unwrap();
        base.join("tests/fixtures/openapi").join(name)
    }

    #[tokio::test]
    async fn test_from_file_json() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("openapi.json");
        let json_content = r#"
        {
            "openapi": "3.0.0",
            "info": {
                "title": "Test API",
                "version": "2.0.0",
                "description": "For tests"
            },
            "servers": [
                {
                    "url": "https://api.example.com/v2/"
                }
            ]
        }
        "#;
        tokio::fs::write(&file_path, json_content).await?;

        let doc = ApiDocument::from_file(&file_path).await?;
        assert_eq!(doc.title(), Some("Test API"));
        assert_eq!(doc.version(), Some("2.0.0"));
        assert_eq!(doc.description(), Some("For tests"));
        assert_eq!(doc.base_url(), Some("https://api.example.com/v2".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_from_file_yaml_fixture() -> crate::Result<()> {
        let doc = ApiDocument::from_file(fixture("bookstore.yaml")).await?;
        assert_eq!(doc.title(), Some("Bookstore API"));

        let groups = doc.endpoints_by_tags();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Authors", "Other"]);
        assert_eq!(doc.webhooks().len(), 1);

        let author = doc
            .generate_example(&json!({"$ref": "#/components/schemas/Author"}))
            .unwrap();
        assert_eq!(author["name"], json!("Ursula"));
        assert!(author["books"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_non_mapping_root() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("list.yaml");
        tokio::fs::write(&file_path, "- just\n- a list\n").await?;

        let err = ApiDocument::from_file(&file_path).await.unwrap_err();
        assert!(matches!(err, Error::Document(_)));
        assert!(err.to_string().contains("not a mapping"));
        Ok(())
    }

    #[test]
    fn test_rejects_scalar_json() {
        assert!(ApiDocument::from_json(json!("openapi")).is_err());
        assert!(ApiDocument::from_json(json!({})).is_ok());
    }

    #[test]
    fn test_swagger_v2_base_url() {
        let doc = ApiDocument::from_json(json!({
            "swagger": "2.0",
            "host": "petstore.swagger.io",
            "basePath": "/v2",
            "schemes": ["http", "https"]
        }))
        .unwrap();
        assert_eq!(
            doc.base_url(),
            Some("https://petstore.swagger.io/v2".to_string())
        );

        let doc = ApiDocument::from_json(json!({"host": "localhost:8080", "schemes": ["http"]}))
            .unwrap();
        assert_eq!(doc.base_url(), Some("http://localhost:8080".to_string()));

        let doc = ApiDocument::from_json(json!({"info": {}})).unwrap();
        assert_eq!(doc.base_url(), None);
    }

    #[test]
    fn test_follow_component_references() {
        let doc = ApiDocument::from_json(json!({
            "components": {
                "parameters": {"limit": {"name": "limit", "in": "query"}},
                "responses": {"Loop": {"$ref": "#/components/responses/Loop"}}
            }
        }))
        .unwrap();

        let inline = json!({"name": "q", "in": "query"});
        assert_eq!(doc.follow(&inline).as_deref(), Some(&inline));

        let by_ref = json!({"$ref": "#/components/parameters/limit"});
        assert_eq!(
            doc.follow(&by_ref).map(Cow::into_owned),
            Some(json!({"name": "limit", "in": "query"}))
        );

        let looping = json!({"$ref": "#/components/responses/Loop"});
        assert_eq!(
            doc.follow(&looping).map(Cow::into_owned),
            Some(reference::circular_marker())
        );

        assert!(doc.follow(&json!({"$ref": "#/nope"})).is_none());
    }

    #[test]
    fn test_parameters_request_body_and_responses() {
        let doc = ApiDocument::from_json(json!({
            "paths": {
                "/books/{id}": {
                    "parameters": [
                        {"name": "id", "in": "path", "description": "path level"},
                        {"$ref": "#/components/parameters/Trace"}
                    ],
                    "post": {
                        "parameters": [
                            {"name": "id", "in": "path", "description": "operation level"},
                            {"name": "id", "in": "query"}
                        ],
                        "requestBody": {"$ref": "#/components/requestBodies/Book"},
                        "responses": {
                            "201": {"description": "Created"},
                            "404": {"$ref": "#/components/responses/NotFound"},
                            "500": {"$ref": "#/components/responses/Missing"}
                        }
                    }
                }
            },
            "components": {
                "parameters": {
                    "Trace": {"name": "X-Trace", "in": "header", "examples": {"one": {"value": "abc"}}}
                },
                "requestBodies": {
                    "Book": {
                        "content": {
                            "text/plain": {"schema": {"type": "string"}},
                            "application/vnd.api+json": {"schema": {"type": "object"}}
                        }
                    }
                },
                "responses": {"NotFound": {"description": "Not found"}}
            }
        }))
        .unwrap();
        let endpoint = doc
            .endpoints_by_tags()
            .remove(0)
            .endpoints
            .into_iter()
            .find(|e| e.method == HttpMethod::Post)
            .unwrap();

        let parameters = doc.parameters(&endpoint);
        let described: Vec<(&str, &str)> = parameters
            .iter()
            .map(|p| (p["name"].as_str().unwrap(), p["in"].as_str().unwrap()))
            .collect();
        assert_eq!(
            described,
            vec![("id", "path"), ("X-Trace", "header"), ("id", "query")]
        );
        assert_eq!(parameters[0]["description"], json!("operation level"));
        assert_eq!(doc.parameter_example(&parameters[1]), Some(json!("abc")));
        assert_eq!(doc.parameter_example(&parameters[2]), None);

        assert_eq!(
            doc.request_body_schema(&endpoint),
            Some(("application/vnd.api+json".to_string(), json!({"type": "object"})))
        );

        let statuses: Vec<String> = doc.responses(&endpoint).into_iter().map(|(s, _)| s).collect();
        assert_eq!(statuses, vec!["201", "404"]);
    }
}
